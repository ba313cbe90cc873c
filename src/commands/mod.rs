use crate::api::Generator;
use crate::error::{PhiloError, Result};
use crate::export::ExportFormat;
use crate::repl::Repl;

pub mod builtin;

/// Result of command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Continue REPL loop
    Continue,
    /// Exit REPL loop
    Exit,
}

/// Enum representing all available REPL commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    History,
    Status,
    /// `None` clears the tag.
    Tag(Option<String>),
    Format(ExportFormat),
    /// `None` exports in the session's selected format.
    Export(Option<ExportFormat>),
}

impl Command {
    /// `Ok(None)` when the line is not a command and should be sent to the model.
    /// A leading `//` escapes the slash; see [`input_text`].
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if !line.starts_with('/') || line.starts_with("//") {
            return Ok(None);
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim()).filter(|r| !r.is_empty())),
            None => (line, None),
        };

        let command = match (name.to_lowercase().as_str(), arg) {
            ("/exit" | "/quit" | "/q", None) => Command::Exit,
            ("/help", None) => Command::Help,
            ("/history", None) => Command::History,
            ("/status", None) => Command::Status,
            ("/tag", tag) => Command::Tag(tag.map(str::to_string)),
            ("/format", Some(format)) => Command::Format(format.parse()?),
            ("/format", None) => {
                return Err(PhiloError::InputValidation(
                    "usage: /format markdown|pdf".to_string(),
                ))
            }
            ("/export", format) => Command::Export(format.map(str::parse).transpose()?),
            _ => {
                return Err(PhiloError::InputValidation(format!(
                    "unknown command '{}'. Type /help to list commands",
                    line
                )))
            }
        };

        Ok(Some(command))
    }

    pub fn execute<G: Generator>(&self, repl: &mut Repl<G>) -> Result<CommandResult> {
        match self {
            Command::Exit => builtin::exit_command(repl),
            Command::Help => builtin::help_command(repl),
            Command::History => builtin::history_command(repl),
            Command::Status => builtin::status_command(repl),
            Command::Tag(tag) => builtin::tag_command(repl, tag.clone()),
            Command::Format(format) => builtin::format_command(repl, *format),
            Command::Export(format) => builtin::export_command(repl, *format),
        }
    }
}

/// Text to send to the model for a non-command line, with one slash of a
/// leading `//` removed.
pub fn input_text(line: &str) -> &str {
    line.trim_start()
        .strip_prefix("//")
        .map(|rest| &line[line.len() - rest.len() - 1..])
        .unwrap_or(line)
}

/// All available commands as strings (for autocomplete)
pub static COMMANDS: &[&str] = &[
    "/exit",
    "/quit",
    "/q",
    "/help",
    "/history",
    "/status",
    "/tag",
    "/format markdown",
    "/format pdf",
    "/export",
    "/export markdown",
    "/export pdf",
];

pub static HELP: &[(&str, &str)] = &[
    ("/tag <name>", "Attach a theme tag to new entries"),
    ("/tag", "Clear the theme tag"),
    ("/format markdown|pdf", "Choose the export format"),
    ("/export [markdown|pdf]", "Export the session history"),
    ("/history", "Show the session history, newest first"),
    ("/status", "Show the current tag and export format"),
    ("//text", "Send text that starts with / to the model"),
    ("/help", "Show this list"),
    ("/exit, /quit, /q", "Leave the session"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(Command::parse("Does free will exist?").unwrap(), None);
        assert_eq!(Command::parse("a/b").unwrap(), None);
    }

    #[test]
    fn test_double_slash_is_sent_as_input() {
        assert_eq!(Command::parse("//s is irony a virtue?").unwrap(), None);
        assert_eq!(Command::parse("  //tag").unwrap(), None);
        assert_eq!(input_text("//s is irony a virtue?"), "/s is irony a virtue?");
        assert_eq!(input_text("  //tag"), "/tag");
        assert_eq!(input_text("Is time real?"), "Is time real?");
        assert_eq!(input_text("a // b"), "a // b");
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/q").unwrap(), Some(Command::Exit));
        assert_eq!(Command::parse(" /EXIT ").unwrap(), Some(Command::Exit));
        assert_eq!(Command::parse("/history").unwrap(), Some(Command::History));
        assert_eq!(
            Command::parse("/tag  free will ").unwrap(),
            Some(Command::Tag(Some("free will".to_string())))
        );
        assert_eq!(Command::parse("/tag").unwrap(), Some(Command::Tag(None)));
        assert_eq!(
            Command::parse("/format PDF").unwrap(),
            Some(Command::Format(ExportFormat::Pdf))
        );
        assert_eq!(Command::parse("/export").unwrap(), Some(Command::Export(None)));
        assert_eq!(
            Command::parse("/export md").unwrap(),
            Some(Command::Export(Some(ExportFormat::Markdown)))
        );
    }

    #[test]
    fn test_invalid_commands() {
        assert!(Command::parse("/format").is_err());
        assert!(Command::parse("/format docx").is_err());
        assert!(Command::parse("/export html").is_err());
        assert!(Command::parse("/dance").is_err());
        assert!(Command::parse("/exit now").is_err());
    }
}
