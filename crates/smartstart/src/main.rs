//! SmartStart: scene-driven recording start/stop with delays.
//!
//! Runs the automation against a simulated live-production host that is
//! driven by console commands on stdin.

mod app;
mod config;
mod console_command;
mod console_input;
mod error;
mod simulated_host;

pub(crate) use {
    app::App,
    console_command::ConsoleCommand,
    error::{AppError, Result as AppResult},
    simulated_host::SimulatedHost,
};

use crate::config::{Config, LoggingConfig};

use smartstart_core::{Automation, RecordingController};

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application entry point.
#[tokio::main]
async fn main() {
    // Logging is configured from the config file, so it has to be read first.
    let config_path = match Config::config_path() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Failed to resolve config path: {}", e);
            std::process::exit(1);
        }
    };

    let config = match Config::load_from(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging);
    info!(config_path = ?config_path, "Configuration loaded");

    let host = Arc::new(SimulatedHost::new(config.host.scenes.clone()));

    let controller = match RecordingController::new(host.clone()) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create RecordingController: {:?}", e);
            std::process::exit(1);
        }
    };

    let rules = config.recording_setting_table.to_rules();
    let automation = Arc::new(Automation::new(controller, host.clone(), rules));

    let (line_tx, line_rx) = mpsc::channel(32);
    if let Err(e) = console_input::spawn_stdin_forwarder(line_tx) {
        error!("Failed to start console input: {:?}", e);
        std::process::exit(1);
    }

    println!("SmartStart ready, type 'help' for commands");

    let app = App {
        automation,
        host,
        config,
        config_path,
        line_rx,
        transition: None,
    };

    if let Err(e) = app.run().await {
        error!(error = ?e, "App error");
        std::process::exit(1);
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
