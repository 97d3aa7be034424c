//! # Cartcheck App Library
//!
//! Wires the pure cart rules to the SQLite catalog and exposes them as a
//! form object and a handful of commands.
//!
//! ## Module Organization
//! ```text
//! cartcheck/
//! ├── lib.rs          ◄─── You are here (logging setup)
//! ├── main.rs         ◄─── CLI entry point
//! ├── config.rs       ◄─── Layered configuration (defaults, TOML, env)
//! ├── form.rs         ◄─── CartForm: refresh stock, validate, keep outcome
//! ├── commands.rs     ◄─── products / validate / changed
//! └── error.rs        ◄─── FormError, ConfigError, AppError
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod form;

use tracing_subscriber::EnvFilter;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ConfigError, ErrorCode, FormError};
pub use form::CartForm;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cartcheck=trace` - Show trace for cartcheck crates only
/// - Otherwise `default_filter` (from config) applies
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
