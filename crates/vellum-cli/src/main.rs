//! Vellum CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use vellum_cli::{
    Args,
    error_adapter::{render, to_reportables},
};

/// Falls back to `warn` for unknown level names.
fn init_logger(level: &str) -> LevelFilter {
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    log_level
}

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    let log_level = init_logger(&args.log_level);

    info!(log_level:?; "Starting Vellum");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = vellum_cli::run(&args) {
        let reportables = to_reportables(&err);
        error!(problems = reportables.len(); "Translation failed");
        for reportable in &reportables {
            error!("{}", render(reportable));
        }
        process::exit(1);
    }

    info!("Completed successfully");
}
