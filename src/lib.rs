//! Company outreach tracking: which companies are overdue for contact, which
//! are due today, and what is scheduled next.

pub mod commands;
pub mod db;
pub mod error;
mod migrations;
pub mod services;
pub mod session;
pub mod state;
pub mod status;
pub mod store;
pub mod types;

use chrono::Utc;
use clap::Parser;
use serde::Serialize;

use commands::Cli;
use db::CommsDb;
use error::{ErrorPayload, ErrorType};

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize output: {}", e),
    }
}

fn startup_error(message: String) -> ErrorPayload {
    ErrorPayload {
        message,
        error_type: ErrorType::Storage,
        field: None,
        redirect_to: None,
        can_retry: true,
        recovery_suggestion: "Check the config file and data directory, then try again."
            .to_string(),
    }
}

/// Entry point for the `commtrack` binary. Returns the process exit code.
pub fn run() -> i32 {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let command = Cli::parse().command;

    let config = match state::load_config() {
        Ok(c) => c,
        Err(e) => {
            print_json(&startup_error(e));
            return 1;
        }
    };

    let db = match CommsDb::open(&config) {
        Ok(db) => db,
        Err(e) => {
            print_json(&startup_error(e.to_string()));
            return 1;
        }
    };

    let session = commands::session_from_env(&config);
    match commands::execute(&command, &db, session.as_ref(), &config, Utc::now()) {
        Ok(output) => {
            print_json(&output);
            0
        }
        Err(payload) => {
            print_json(&payload);
            1
        }
    }
}
