use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Regenerate the artifacts of a base language if needed and print its profile
    Process {
        /// Path to the language definition
        #[arg(value_name = "DEFINITION")]
        definition: PathBuf,
        /// Plugin directory holding `src` and `bin` (defaults to the definition's `src/..`)
        #[arg(short, long)]
        plugin: Option<PathBuf>,
        /// Configuration file (defaults to the per-user `basil.toml`)
        #[arg(long)]
        conf: Option<PathBuf>,
        /// Level of verbosity
        #[arg(short, long, default_value_t = false)]
        verbose: bool,
    },
    /// Report whether the artifacts of a base language are up to date
    Status {
        /// Path to the language definition
        #[arg(value_name = "DEFINITION")]
        definition: PathBuf,
        /// Plugin directory holding `src` and `bin` (defaults to the definition's `src/..`)
        #[arg(short, long)]
        plugin: Option<PathBuf>,
        /// Level of verbosity
        #[arg(short, long, default_value_t = false)]
        verbose: bool,
    },
    /// Print the profile declared by a transformation module
    Profile {
        /// Path to the transformation module, as a textual ATerm
        #[arg(value_name = "TRANSFORMATION")]
        transformation: PathBuf,
        /// Level of verbosity
        #[arg(short, long, default_value_t = false)]
        verbose: bool,
    },
}

impl Commands {
    pub fn verbose(&self) -> bool {
        match self {
            | Commands::Process { verbose, .. }
            | Commands::Status { verbose, .. }
            | Commands::Profile { verbose, .. } => *verbose,
        }
    }
}
