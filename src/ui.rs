use crate::error::PhiloError;
use crate::export::ExportFormat;
use crate::history::{HistoryEntry, HistoryStore};
use colored::Colorize;
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use std::io::{self, stdout, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Message severity levels for consistent UI feedback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessageSeverity {
    /// Recoverable issues and refused actions
    Warning,
    /// Actual failures (network, IO, rendering errors)
    Error,
    Info,
    Success,
}

impl MessageSeverity {
    pub fn prefix(&self) -> colored::ColoredString {
        match self {
            Self::Warning => "Warning:".bright_yellow().bold(),
            Self::Error => "Error:".bright_red().bold(),
            Self::Info => "Info:".bright_cyan().bold(),
            Self::Success => "Success:".bright_green().bold(),
        }
    }
}

/// Hides the cursor for as long as it lives.
struct HiddenCursorGuard;

impl HiddenCursorGuard {
    fn new() -> Self {
        let _ = execute!(stdout(), Hide);
        Self
    }
}

impl Drop for HiddenCursorGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

/// UI utilities for displaying messages, animations, and formatting
pub struct UI;

impl UI {
    pub fn print_message(severity: MessageSeverity, message: &str) {
        eprintln!("{} {}", severity.prefix(), message);
    }

    pub fn print_warning(message: &str) {
        Self::print_message(MessageSeverity::Warning, message);
    }

    pub fn print_info(message: &str) {
        Self::print_message(MessageSeverity::Info, message);
    }

    pub fn print_error_with_hint(error: &PhiloError) {
        let severity = match error {
            PhiloError::InputValidation(_) => MessageSeverity::Warning,
            _ => MessageSeverity::Error,
        };
        eprintln!("{} {}", severity.prefix(), error);
        if let Some(hint) = error.hint() {
            eprintln!("  {} {}", "Hint:".bright_cyan(), hint);
        }
    }

    pub fn print_welcome(model: &str, tag: Option<&str>, format: ExportFormat) {
        println!("{}", "🧠 AI Philosophy Assistant".bright_cyan().bold());
        println!(
            "{}",
            "Think deeply. Generate freely. Reflect authentically.".dimmed()
        );
        println!();
        println!("{} {}", "Model:".bright_green(), model);
        Self::print_settings(tag, format);
        println!();
        println!("{}", "Write an idea, argument, or paradox and press Enter.".dimmed());
        println!("{}", "Type /help to list commands.".dimmed());
        println!();
    }

    pub fn print_settings(tag: Option<&str>, format: ExportFormat) {
        println!(
            "{} {}   {} {}",
            "Tag:".bright_green(),
            crate::history::display_tag(tag),
            "Export as:".bright_green(),
            format
        );
    }

    pub fn print_help() {
        println!();
        println!("{}", "Commands".bright_cyan().bold());
        for (command, description) in crate::commands::HELP {
            println!("  {:<24} {}", command.bright_green(), description.dimmed());
        }
        println!();
    }

    pub fn print_goodbye() {
        println!("{}", "Goodbye!".bright_cyan());
    }

    pub fn print_concept(entry: &HistoryEntry) {
        println!(
            "{} {}",
            MessageSeverity::Success.prefix(),
            "Philosophical concept generated!"
        );
        println!();
        println!("{}", "🪷 Generated Concept".bright_blue().bold());
        println!("{}", entry.output);
        println!();
    }

    /// `#{n}. {timestamp}  #{tag}` for the n-th most recent entry.
    pub fn history_heading(position: usize, entry: &HistoryEntry) -> String {
        format!("{}. {}  #{}", position, entry.timestamp, entry.display_tag())
    }

    pub fn display_history(history: &HistoryStore) {
        if history.is_empty() {
            Self::print_info("No ideas generated yet. Begin your philosophical journey above.");
            return;
        }

        println!();
        println!("{}", "📜 Philosophical Idea History".bright_cyan().bold());
        println!("{}", "─".repeat(60).bright_cyan());

        for (i, entry) in history.recent_first().enumerate() {
            println!("{}", Self::history_heading(i + 1, entry).bright_yellow().bold());
            println!("{} {}", "User Input:".bold(), entry.input);
            println!("{} {}", "Generated Output:".bold(), entry.output);
            println!("{}", "─".repeat(60).bright_cyan());
        }
        println!();
    }

    pub fn print_exported(path: &Path, format: ExportFormat) {
        println!(
            "{} {} {}",
            MessageSeverity::Success.prefix(),
            format!("Session exported as {}:", format),
            path.display().to_string().bright_cyan()
        );
    }

    /// Shows a spinner until `running` is cleared.
    pub fn run_animation(action_message: String, running: Arc<AtomicBool>) {
        let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        let mut frame_idx = 0;

        let _cursor = HiddenCursorGuard::new();
        println!();

        while running.load(Ordering::SeqCst) {
            print!(
                "\r{} {}",
                frames[frame_idx].truecolor(0xFF, 0x99, 0x33),
                action_message.truecolor(0xFF, 0x99, 0x33),
            );
            let _ = io::stdout().flush();
            frame_idx = (frame_idx + 1) % frames.len();
            thread::sleep(Duration::from_millis(80));
        }

        print!("\r{}\r", " ".repeat(action_message.chars().count() + 4));
        let _ = io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_heading_uses_tag_placeholder() {
        let untagged = HistoryEntry::new("2024-01-01 10:00", "q", "a", None);
        let tagged = HistoryEntry::new("2024-01-01 10:00", "q", "a", Some("ethics".to_string()));

        assert_eq!(UI::history_heading(1, &untagged), "1. 2024-01-01 10:00  #untagged");
        assert_eq!(UI::history_heading(2, &tagged), "2. 2024-01-01 10:00  #ethics");
    }
}
