use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Model {
            name,
            dir,
            run_tasks,
            all,
            raw,
        } => commands::model_command(&name, &dir, run_tasks, all, raw),
        Commands::Projects { dir } => commands::projects_command(&dir),
    }
}
