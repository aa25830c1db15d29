mod config;
mod console;
mod formatter;
mod input;
mod interpreter;
mod menu;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use config::Config;
use console::Console;
use input::StdinInput;
use interpreter::{Interpreter, RunState, StopReason};
use std::io;

#[derive(Parser)]
#[command(name = "upreport")]
#[command(about = "Unit process reports from openLCA inventory data.")]
#[command(
    long_about = "upreport opens an openLCA JSON-LD project (or a running openLCA IPC server), lets you review a unit process,\nand writes a markdown report that can be published to PDF, Word or HTML through pandoc.\n\nDirectories default to ./data, ./output, ./calculations and ./template and can be set with\nUPREPORT_DATA_DIR, UPREPORT_OUTPUT_DIR, UPREPORT_CALC_DIR, UPREPORT_TEMPLATE_DIR and UPREPORT_PORT."
)]
#[command(version)]
struct Cli {}

fn main() {
    Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "upreport=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(RunState::Stopped(StopReason::Failed)) => std::process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<RunState> {
    let config = Config::from_env()?;

    let mut interpreter = Interpreter::new(&config, Box::new(StdinInput), Console::stdout());
    Ok(interpreter.run())
}
