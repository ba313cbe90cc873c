use crate::api::{Generator, OpenAIClient};
use crate::commands::{input_text, Command, CommandResult, COMMANDS};
use crate::config::PhiloConfig;
use crate::delivery::deliver;
use crate::error::{PhiloError, Result};
use crate::export::ExportFormat;
use crate::history::HistoryEntry;
use crate::prompt::ReplPrompt;
use crate::session::Session;
use crate::ui::UI;
use reedline::{
    default_emacs_keybindings, ColumnarMenu, DefaultCompleter, Emacs, KeyCode, KeyModifiers,
    MenuBuilder, Reedline, ReedlineEvent, ReedlineMenu, Signal,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Interactive loop around one [`Session`].
///
/// Requests are driven to completion one at a time on a current-thread
/// runtime, so a second generation cannot start while one is in flight.
pub struct Repl<G: Generator = OpenAIClient> {
    generator: G,
    session: Session,
    config: PhiloConfig,
    prompt: ReplPrompt,
    runtime: tokio::runtime::Runtime,
    show_spinner: bool,
}

impl<G: Generator> Repl<G> {
    pub fn new(generator: G, config: PhiloConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| PhiloError::Config(format!("Failed to create async runtime: {}", e)))?;

        let session = Session::new(config.tag.clone(), config.format);
        let prompt = ReplPrompt::new(session.tag());

        Ok(Self {
            generator,
            session,
            config,
            prompt,
            runtime,
            show_spinner: std::io::stdout().is_terminal(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_tag(&mut self, tag: Option<String>) {
        self.session.set_tag(tag);
        self.prompt.set_tag(self.session.tag());
    }

    pub fn set_format(&mut self, format: ExportFormat) {
        self.session.set_format(format);
    }

    pub fn run(&mut self, model: &str) -> Result<()> {
        UI::print_welcome(model, self.session.tag(), self.session.format());

        let mut editor = Self::build_editor();

        loop {
            match editor.read_line(&self.prompt) {
                Ok(Signal::Success(line)) => {
                    if self.handle_line(&line) == CommandResult::Exit {
                        break;
                    }
                }
                Ok(Signal::CtrlC) | Ok(Signal::CtrlD) => {
                    println!("\nExiting...");
                    UI::print_goodbye();
                    break;
                }
                #[allow(unreachable_patterns)]
                Ok(_) => continue,
                Err(err) => {
                    UI::print_error_with_hint(&PhiloError::Io(err));
                    break;
                }
            }
        }

        Ok(())
    }

    fn build_editor() -> Reedline {
        let mut completer = DefaultCompleter::with_inclusions(&['/', '-', '_']).set_min_word_len(1);
        completer.insert(COMMANDS.iter().map(|c| c.to_string()).collect());

        let completion_menu = ColumnarMenu::default().with_name("completion_menu");

        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu("completion_menu".into()),
                ReedlineEvent::MenuNext,
            ]),
        );

        Reedline::create()
            .use_bracketed_paste(true)
            .with_completer(Box::new(completer))
            .with_menu(ReedlineMenu::EngineCompleter(Box::new(completion_menu)))
            .with_edit_mode(Box::new(Emacs::new(keybindings)))
    }

    /// Dispatches one line of input. Errors are reported here and never end
    /// the session.
    pub fn handle_line(&mut self, line: &str) -> CommandResult {
        let outcome = match Command::parse(line) {
            Ok(Some(command)) => command.execute(self),
            Ok(None) => self.process_input(input_text(line)).map(|entry| {
                UI::print_concept(&entry);
                CommandResult::Continue
            }),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "Command failed");
                UI::print_error_with_hint(&e);
                CommandResult::Continue
            }
        }
    }

    /// Sends `input` to the model and records the result, showing a spinner
    /// while the request is outstanding.
    pub fn process_input(&mut self, input: &str) -> Result<HistoryEntry> {
        // Checked before the spinner starts so blank input returns at once.
        if input.trim().is_empty() {
            return self.runtime.block_on(self.session.generate(&self.generator, input));
        }

        let running = Arc::new(AtomicBool::new(true));
        let spinner = self.show_spinner.then(|| {
            let running = Arc::clone(&running);
            std::thread::spawn(move || UI::run_animation("Thinking deeply...".to_string(), running))
        });

        let result = self
            .runtime
            .block_on(self.session.generate(&self.generator, input));

        running.store(false, Ordering::SeqCst);
        if let Some(handle) = spinner {
            let _ = handle.join();
        }

        result
    }

    /// Renders the whole history and writes it to the output directory.
    /// `None` uses the session's selected format.
    pub fn export(&mut self, format: Option<ExportFormat>) -> Result<PathBuf> {
        let options = self.config.export_options();
        let document = match format {
            Some(format) => self.session.export_as(format, &options)?,
            None => self.session.export(&options)?,
        };
        deliver(&document, &self.config.output_dir)
    }

    pub fn process_single_prompt(&mut self, prompt: &str, export: bool) -> Result<()> {
        println!("φ> {}", prompt);
        let entry = self.process_input(prompt)?;
        UI::print_concept(&entry);

        if export {
            let path = self.export(None)?;
            UI::print_exported(&path, self.session.format());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    struct EchoGenerator {
        fail: bool,
        calls: Cell<usize>,
    }

    impl EchoGenerator {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                calls: Cell::new(0),
            }
        }
    }

    impl Generator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(PhiloError::Api(
                    "API request failed with status 500 Internal Server Error: boom".to_string(),
                ));
            }
            Ok(format!("Concept from {} chars", prompt.len()))
        }
    }

    fn repl(fail: bool, output_dir: PathBuf) -> Repl<EchoGenerator> {
        let config = PhiloConfig {
            output_dir,
            ..PhiloConfig::default()
        };
        let mut repl = Repl::new(EchoGenerator::new(fail), config).unwrap();
        repl.show_spinner = false;
        repl
    }

    #[test]
    fn test_generation_and_export_flow() {
        let dir = TempDir::new().unwrap();
        let mut repl = repl(false, dir.path().to_path_buf());

        assert_eq!(repl.handle_line("/tag metaphysics"), CommandResult::Continue);
        assert_eq!(repl.handle_line("Does free will exist?"), CommandResult::Continue);
        assert_eq!(repl.session().history().len(), 1);
        assert_eq!(repl.session().history().all()[0].tag.as_deref(), Some("metaphysics"));

        repl.handle_line("/export");
        let md = std::fs::read_to_string(dir.path().join("philosophy_session.md")).unwrap();
        assert!(md.contains("- metaphysics\n**Input:** Does free will exist?"));

        repl.handle_line("/format pdf");
        repl.handle_line("/export");
        let pdf = std::fs::read(dir.path().join("philosophy_session.pdf")).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_export_refused_on_empty_history() {
        let dir = TempDir::new().unwrap();
        let mut repl = repl(false, dir.path().to_path_buf());

        assert_eq!(repl.handle_line("/export pdf"), CommandResult::Continue);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_blank_input_is_not_sent() {
        let dir = TempDir::new().unwrap();
        let mut repl = repl(false, dir.path().to_path_buf());

        let result = repl.process_input("   ");
        assert!(matches!(result, Err(PhiloError::InputValidation(_))));
        assert_eq!(repl.generator.calls.get(), 0);
        assert!(repl.session().history().is_empty());
    }

    #[test]
    fn test_failure_keeps_session_running() {
        let dir = TempDir::new().unwrap();
        let mut repl = repl(true, dir.path().to_path_buf());

        assert_eq!(repl.handle_line("Is time real?"), CommandResult::Continue);
        assert!(repl.session().history().is_empty());
        assert_eq!(repl.generator.calls.get(), 1);
        assert_eq!(repl.handle_line("/quit"), CommandResult::Exit);
    }

    #[test]
    fn test_escaped_slash_reaches_model() {
        let dir = TempDir::new().unwrap();
        let mut repl = repl(false, dir.path().to_path_buf());

        assert_eq!(repl.handle_line("//s is irony a virtue?"), CommandResult::Continue);
        assert_eq!(repl.generator.calls.get(), 1);
        assert_eq!(repl.session().history().all()[0].input, "/s is irony a virtue?");
    }

    #[test]
    fn test_single_prompt_with_export() {
        let dir = TempDir::new().unwrap();
        let mut repl = repl(false, dir.path().join("out"));

        repl.process_single_prompt("What is justice?", true).unwrap();
        assert!(dir.path().join("out").join("philosophy_session.md").exists());
    }
}
