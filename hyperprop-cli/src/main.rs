mod cli;
mod driver;
mod facts;

use std::process::ExitCode;

use clap::Parser;
use hyperprop_parser::ParseError;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.chain().any(|cause| cause.is::<ParseError>()) {
                eprintln!("Error : Parsing failed");
            }

            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
