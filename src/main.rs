mod cache;
mod cli;
mod config;
mod dist;
mod git;
mod report_helpers;
mod util;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CDIST_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Dist {
            history,
            json,
            select,
        } => {
            let target = history.path.unwrap_or_else(|| PathBuf::from("."));
            dist::run(
                &target,
                json,
                history.since.as_deref(),
                select.as_deref(),
                history.config.as_deref(),
            )
        }
        Commands::Explore { history } => {
            let target = history.path.unwrap_or_else(|| PathBuf::from("."));
            dist::explore::run(&target, history.since.as_deref(), history.config.as_deref())
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "cdist", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
