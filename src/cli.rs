use crate::export::ExportFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "philo",
    about = "An interactive AI philosophy notebook",
    long_about = "Philo turns your ideas into titled philosophical concepts using a hosted language model, keeps a history of the session, and exports it as Markdown or PDF. Nothing is kept after the session ends unless you export it.",
    version
)]
pub struct Cli {
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Generate a concept for this idea and exit (if not provided, starts interactive REPL)
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Export the session after processing --prompt
    #[arg(long, requires = "prompt")]
    pub export: bool,

    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature passed to the model
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Seconds to wait for the model before giving up
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Directory exports are written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Theme tag attached to new entries (e.g. metaphysics, ethics)
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Export format
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Replace characters the PDF font cannot show with '?' instead of failing
    #[arg(long)]
    pub substitute_unsupported: bool,

    /// Config file (defaults to ~/.philo/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}
