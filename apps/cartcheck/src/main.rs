//! # Cartcheck CLI
//!
//! Drives the cart validator against the local catalog.
//!
//! ## Usage
//! ```bash
//! # Catalog order and stock
//! cartcheck products
//!
//! # One quantity per product, in catalog order
//! cartcheck validate '["2", "0", "1"]'
//!
//! # Would this resubmission change anything?
//! cartcheck changed '["5", "3"]' '["3", "5"]'
//!
//! # Explicit config file
//! cartcheck --config ./cartcheck.toml products
//! ```
//!
//! ## Exit Codes
//! - `0` - success (cart accepted, or unchanged for `changed`)
//! - `1` - cart rejected, submission not valid JSON, or changed for `changed`
//! - `2` - usage, configuration, or catalog failure

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{debug, error, info};

use cartcheck::commands;
use cartcheck::{init_tracing, AppConfig, AppError, AppResult};
use cartcheck_db::Database;

enum Command {
    Products,
    Validate(String),
    Changed(String, String),
    Help,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let (config_path, command) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{}", message);
            print_usage();
            return ExitCode::from(2);
        }
    };

    if let Command::Help = command {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", AppError::from(e));
            return ExitCode::from(2);
        }
    };

    init_tracing(&config.logging.filter);
    log_config(&config);

    match run(&config, command).await {
        Ok(code) => code,
        Err(e) if e.is_user_error() => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
        Err(e) => {
            error!(code = ?e.code, "Command failed");
            eprintln!("{}", e);
            ExitCode::from(2)
        }
    }
}

/// Reports where the configuration came from. Runs after `init_tracing`:
/// the subscriber's filter is itself part of the configuration.
fn log_config(config: &AppConfig) {
    match &config.source {
        Some(path) => info!(path = %path.display(), "Loaded config file"),
        None => debug!("No config file found, using defaults"),
    }
    debug!(
        db = %config.database.path.display(),
        max_connections = config.database.max_connections,
        filter = %config.logging.filter,
        "Effective configuration"
    );
}

async fn run(config: &AppConfig, command: Command) -> AppResult<ExitCode> {
    match command {
        Command::Changed(baseline, submitted) => {
            let changed = commands::changed(&baseline, &submitted)?;
            println!("{}", if changed { "changed" } else { "unchanged" });
            Ok(exit_for(!changed))
        }
        Command::Products => {
            let db = open(config).await?;
            let products = commands::list_products(&db).await?;

            for (position, product) in products.iter().enumerate() {
                println!(
                    "{:>3}  {:<36}  {:<24}  {:>8}  stock {}",
                    position + 1,
                    product.id,
                    product.name,
                    product.price.to_string(),
                    product.quantity
                );
            }
            println!("{} products", products.len());

            db.close().await;
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate(submission) => {
            let db = open(config).await?;
            let response = commands::validate_cart(&db, &submission).await?;

            if response.valid {
                for line in &response.lines {
                    println!(
                        "{} x {} = {}",
                        line.quantity,
                        line.item.name,
                        line.line_total()
                    );
                }
                println!("Subtotal: {}", response.subtotal);
            } else {
                for message in &response.errors {
                    println!("{}", message);
                }
            }

            db.close().await;
            Ok(exit_for(response.valid))
        }
        Command::Help => Ok(ExitCode::SUCCESS),
    }
}

async fn open(config: &AppConfig) -> AppResult<Database> {
    info!(path = %config.database.path.display(), "Opening catalog");
    Ok(Database::new(config.db_config()).await?)
}

fn exit_for(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn parse_args(args: &[String]) -> Result<(Option<PathBuf>, Command), String> {
    let mut config_path = None;
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                let path = args.get(i + 1).ok_or("--config needs a path")?;
                config_path = Some(PathBuf::from(path));
                i += 1;
            }
            "--help" | "-h" => return Ok((config_path, Command::Help)),
            other => rest.push(other),
        }
        i += 1;
    }

    let command = match rest.as_slice() {
        ["products"] => Command::Products,
        ["validate", submission] => Command::Validate(submission.to_string()),
        ["changed", baseline, submitted] => {
            Command::Changed(baseline.to_string(), submitted.to_string())
        }
        [] => return Err("No command given".to_string()),
        _ => return Err(format!("Unrecognized command: {}", rest.join(" "))),
    };

    Ok((config_path, command))
}

fn print_usage() {
    println!("Cartcheck");
    println!();
    println!("Usage: cartcheck [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  products                          List catalog order and stock");
    println!("  validate <JSON>                   Validate one quantity per product");
    println!("  changed <BASELINE> <SUBMITTED>    Compare two submissions");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>    Config file (default: platform config dir)");
    println!("  -h, --help             Show this help message");
}
