mod cli;
mod execute;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use crate::cli::{normalize_args, print_usage, CLI};

fn main() {
    let cli = match CLI::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(_) => {
            print_usage();
            std::process::exit(1);
        }
    };
    init_logging(cli.verbose);

    match execute::execute(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
