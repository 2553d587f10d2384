//! go2proto CLI
//!
//! This binary reads Go packages and writes the proto3 messages that mirror
//! their exported struct types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use clap::{CommandFactory, Parser};
use go2proto_cli::Cli;

fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(cli.log_level(&config));

    let settings = cli.settings(&config);
    if settings.inputs.is_empty() {
        eprintln!("Error: no input paths provided");
        eprintln!();
        eprintln!("{}", Cli::command().render_help());
        std::process::exit(1);
    }

    if let Err(e) = pipeline::run(&settings) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
