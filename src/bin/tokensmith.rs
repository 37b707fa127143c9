//! `tokensmith` - compile `tokens/{base,light,dark}.json` into the web
//! stylesheet and the native constant module.
//!
//! Settings come from `tokensmith.json` in the working directory when it
//! exists. Log level follows `RUST_LOG` (default `info`), written to stderr.

use std::path::Path;
use std::process::ExitCode;

use flexi_logger::{Logger, LoggerHandle};
use log::{error, info};

use tokensmith::{Config, DiagnosticOptions, Pipeline, render};

fn init_logging() -> Option<LoggerHandle> {
    Logger::try_with_env_or_str("info")
        .and_then(|logger| logger.log_to_stderr().start())
        .map_err(|err| eprintln!("failed to start logger: {err}"))
        .ok()
}

fn main() -> ExitCode {
    let _logger = init_logging();

    let config = match Config::discover(Path::new(".")) {
        Ok(config) => config,
        Err(err) => {
            error!("event=config status=failed kind={}", err.kind());
            eprintln!("{}", render(&err, &DiagnosticOptions::default()));
            return ExitCode::FAILURE;
        }
    };
    let options = config.diagnostic_options();

    match Pipeline::new(config).build() {
        Ok(report) => {
            info!("event=done status=ok");
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=done status=failed kind={}", err.kind());
            eprintln!("{}", render(&err, &options));
            ExitCode::FAILURE
        }
    }
}
