mod api;
mod cli;
mod commands;
mod config;
mod delivery;
mod error;
mod error_ext;
mod export;
mod history;
mod prompt;
mod repl;
mod session;
mod ui;

use api::OpenAIClient;
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use config::PhiloConfig;
use error::Result;
use repl::Repl;
use ui::UI;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    if let Err(e) = run(cli) {
        UI::print_error_with_hint(&e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = PhiloConfig::resolve(&cli)?;

    let client = match OpenAIClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{} {}", "Error:".bright_red().bold(), e);
            eprintln!();
            eprintln!("Please set your OpenAI API key:");
            eprintln!("  export OPENAI_API_KEY='your-api-key'");
            eprintln!("Or use the --api-key flag:");
            eprintln!("  philo --api-key 'your-api-key'");
            std::process::exit(1);
        }
    };

    tracing::info!(
        model = %config.model,
        timeout_secs = config.timeout_secs,
        output_dir = %config.output_dir.display(),
        "Starting session"
    );

    let model = client.model().to_string();
    let mut repl = Repl::new(client, config)?;

    if let Some(prompt) = cli.prompt {
        repl.process_single_prompt(&prompt, cli.export)?;
    } else {
        repl.run(&model)?;
    }

    Ok(())
}
