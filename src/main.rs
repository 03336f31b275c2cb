use std::sync::Arc;

use tracing::{info, warn};

use cloudvault::{Config, Database, ObjectStore, WebServer};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = cloudvault::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        cloudvault::logging::init_console_only(&config.logging.level);
    }

    info!("CloudVault file storage service");

    if config.auth.jwt_secret == "change-me" {
        warn!("auth.jwt_secret is the default placeholder; set a real secret before exposing this server");
    }

    let db = match Database::open(&config.database.path).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            eprintln!("Failed to open database: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let store = match ObjectStore::new(
        &config.storage.path,
        &config.storage.public_base_url,
        &config.auth.jwt_secret,
    ) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("Failed to initialize object store: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let server = match WebServer::new(&config, db, store) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Invalid server configuration: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    if let Err(e) = server.run().await {
        eprintln!("Server error: {e}");
        return std::process::ExitCode::FAILURE;
    }

    std::process::ExitCode::SUCCESS
}
