//! SxT CLI - authenticate against the Space and Time auth endpoint and mint
//! capability tokens with the session key.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sxt_config::Config;
use sxt_core::dirs::SxtHome;
use tracing::debug;

mod commands;
mod config_bridge;
mod theme;

use commands::login::LoginArgs;
use commands::{biscuit, keys, login, logout};
use theme::Theme;

/// SxT - Space and Time authentication client
#[derive(Parser)]
#[command(name = "sxt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a configuration file layered over the user config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, or reuse/refresh the stored session
    Login {
        #[command(flatten)]
        login: LoginArgs,

        /// Print the access token
        #[arg(long)]
        show_token: bool,
    },

    /// Mint a capability token signed by the session key
    Biscuit {
        #[command(flatten)]
        login: LoginArgs,

        /// Capability as operation:resource (repeatable)
        #[arg(short = 'c', long = "capability", required = true)]
        capabilities: Vec<String>,
    },

    /// Revoke and delete the stored session
    Logout {
        /// User id (falls back to `identity.user_id` / `SXT_USER_ID`)
        #[arg(long)]
        userid: Option<String>,
    },

    /// Manage key material
    Keys {
        #[command(subcommand)]
        command: KeyCommands,
    },
}

#[derive(Subcommand)]
enum KeyCommands {
    /// Generate a key pair and print it as base64
    Generate {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Loaded configuration and resolved home directory.
pub(crate) struct AppContext {
    pub(crate) config: Config,
    pub(crate) home: SxtHome,
}

fn run(cli: Cli) -> Result<()> {
    let resolved = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    match config_bridge::to_log_config(&resolved.config, cli.verbose) {
        Ok(log_config) => {
            if let Err(e) = sxt_telemetry::setup_logging(&log_config) {
                eprintln!("Failed to initialize logging: {e}");
            }
        },
        Err(e) => eprintln!("Invalid logging configuration: {e}"),
    }
    debug!(files = ?resolved.loaded_files, "Configuration loaded");

    let ctx = AppContext {
        config: resolved.config,
        home: SxtHome::resolve().context("could not resolve the SxT home directory")?,
    };

    match cli.command {
        Commands::Login { login, show_token } => login::run_login(&ctx, &login, show_token),
        Commands::Biscuit {
            login,
            capabilities,
        } => biscuit::run_biscuit(&ctx, &login, &capabilities),
        Commands::Logout { userid } => logout::run_logout(&ctx, userid.as_deref()),
        Commands::Keys {
            command: KeyCommands::Generate { json },
        } => keys::generate_key(json),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", Theme::error(&format!("{e:#}")));
            ExitCode::FAILURE
        },
    }
}
