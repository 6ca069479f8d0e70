use clap::Parser;
use std::process::ExitCode;

use caerberus::cli::{self, Cli};
use caerberus::config::Config;
use caerberus::{handlers, logging};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return cli::report_parse_error(&e),
    };
    let operation = cli.operation();
    let config_path = cli.config.clone();

    // Defaults, then config file, then command line
    let config = Config::load(config_path.as_deref()).and_then(|mut config| {
        config.apply_overrides(operation, cli.overrides());
        config.validate()
    });
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("init config failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.log) {
        eprintln!("init logger failed: {}", e);
        return ExitCode::FAILURE;
    }

    match handlers::run(config, operation) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        // already logged by the handler
        Err(_) => ExitCode::FAILURE,
    }
}
