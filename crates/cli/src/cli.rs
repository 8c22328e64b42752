use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(version, about = "Model introspection for composite builds", long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a named model from a build and print it as JSON
    #[command(visible_alias = "m")]
    Model {
        /// Model name, e.g. tessera.outline
        name: String,

        /// Build root directory (where tessera.toml lives)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Run the task graph before resolving the model instead of
        /// configure-only evaluation
        #[arg(long)]
        run_tasks: bool,

        /// Fetch models for every build in the composite, root build first
        #[arg(short, long)]
        all: bool,

        /// Print compact output, one entry per line, instead of pretty JSON
        #[arg(short, long)]
        raw: bool,
    },
    /// List the projects and included builds of a build
    #[command(visible_alias = "p")]
    Projects {
        /// Build root directory (where tessera.toml lives)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}
