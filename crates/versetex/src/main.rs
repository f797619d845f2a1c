//! versetex CLI - expands `\bible{}` macros in LaTeX sources.
//!
//! Reads one document, replaces every `\bible{passage}`,
//! `\bible{passage}{wrapper}` and `\setbible{template}{wrapper}` macro, and
//! writes the result to stdout. On any error nothing is written to stdout
//! and the process exits with status 1.

mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::PreprocessArgs;
use output::Output;

/// versetex - Scripture passages for LaTeX.
#[derive(Parser)]
#[command(name = "versetex", version, about)]
struct Cli {
    #[command(flatten)]
    args: PreprocessArgs,
}

/// `--verbose` enables INFO level, otherwise use `RUST_LOG` or default to WARN.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.args.verbose))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.args.execute() {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_filter_levels() {
        // SAFETY: no other test in this crate reads RUST_LOG
        unsafe {
            std::env::remove_var("RUST_LOG");
        }
        assert_eq!(log_filter(false).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(true).max_level_hint(), Some(LevelFilter::INFO));
    }
}
