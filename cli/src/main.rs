use basil_cli::{Cli, run};
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    let Cli { command } = Cli::parse();
    let verbose = command.verbose();
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    match run(command) {
        | Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        | Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err.to_string().red());
            if let (true, Some(backtrace)) = (verbose, err.backtrace()) {
                eprintln!("{backtrace}");
            }
            ExitCode::FAILURE
        }
    }
}
