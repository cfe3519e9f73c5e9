//! `roster` command-line entry point.
//!
//! # Responsibility
//! - Load configuration, initialize logging and open the database.
//! - Print command output as JSON on stdout and failures on stderr.

mod commands;
mod config;

use clap::Parser;
use config::Arguments;
use log::{debug, error, info};
use roster_core::db::open_db;
use roster_core::{default_log_level, init_logging, init_logging_to, LogTarget};
use std::process::ExitCode;

fn main() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    if let Err(err) = config::load_env_file(&raw_args) {
        eprintln!("{err}");
        return ExitCode::from(2);
    }

    let arguments = Arguments::parse_from(raw_args);

    let level = arguments
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let logging = match arguments.log_dir.as_deref() {
        Some(dir) => init_logging(&level, dir),
        None => init_logging_to(&level, LogTarget::Stderr),
    };
    if let Err(err) = logging {
        eprintln!("{err}");
        return ExitCode::from(2);
    }

    debug!(
        "event=config_loaded module=cli status=ok explicit_env_file={} file_logging={}",
        arguments.env_file.is_some(),
        arguments.log_dir.is_some()
    );

    let mut conn = match open_db(&arguments.database) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("internal error: {err}");
            return ExitCode::from(1);
        }
    };

    match commands::run(&mut conn, arguments.command) {
        Ok(output) => {
            info!("event=cli_command module=cli status=ok");
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("{err}");
            err.exit_code()
        }
    }
}
