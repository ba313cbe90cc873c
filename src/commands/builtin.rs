use super::CommandResult;
use crate::api::Generator;
use crate::error::Result;
use crate::export::ExportFormat;
use crate::repl::Repl;
use crate::ui::UI;

pub fn exit_command<G: Generator>(repl: &mut Repl<G>) -> Result<CommandResult> {
    if !repl.session().history().is_empty() {
        UI::print_info("Session history is discarded on exit. Use /export first to keep it.");
    }
    UI::print_goodbye();
    Ok(CommandResult::Exit)
}

pub fn help_command<G: Generator>(_repl: &mut Repl<G>) -> Result<CommandResult> {
    UI::print_help();
    Ok(CommandResult::Continue)
}

pub fn history_command<G: Generator>(repl: &mut Repl<G>) -> Result<CommandResult> {
    UI::display_history(repl.session().history());
    Ok(CommandResult::Continue)
}

pub fn status_command<G: Generator>(repl: &mut Repl<G>) -> Result<CommandResult> {
    let session = repl.session();
    UI::print_settings(session.tag(), session.format());
    println!("{} entries this session", session.history().len());
    Ok(CommandResult::Continue)
}

pub fn tag_command<G: Generator>(repl: &mut Repl<G>, tag: Option<String>) -> Result<CommandResult> {
    repl.set_tag(tag);
    UI::print_settings(repl.session().tag(), repl.session().format());
    Ok(CommandResult::Continue)
}

pub fn format_command<G: Generator>(
    repl: &mut Repl<G>,
    format: ExportFormat,
) -> Result<CommandResult> {
    repl.set_format(format);
    UI::print_settings(repl.session().tag(), repl.session().format());
    Ok(CommandResult::Continue)
}

pub fn export_command<G: Generator>(
    repl: &mut Repl<G>,
    format: Option<ExportFormat>,
) -> Result<CommandResult> {
    if repl.session().history().is_empty() {
        UI::print_warning("Nothing to export yet. Generate a concept first.");
        return Ok(CommandResult::Continue);
    }

    let path = repl.export(format)?;
    UI::print_exported(&path, format.unwrap_or(repl.session().format()));
    Ok(CommandResult::Continue)
}
