use std::sync::Arc;

use tracing::{error, info};

use vidshelf::{Config, Database, UploadRoot, WebServer};

/// Environment variable naming the config file.
const ENV_CONFIG: &str = "VIDSHELF_CONFIG";

#[tokio::main]
async fn main() {
    let config_path = std::env::var(ENV_CONFIG).unwrap_or_else(|_| "config.toml".to_string());

    // Load configuration
    let mut config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    if let Err(e) = config.apply_env_overrides().and_then(|_| config.validate()) {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = vidshelf::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        vidshelf::logging::init_console_only(&config.logging.level);
    }

    info!("vidshelf - video upload server");

    if let Err(e) = run(config).await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> vidshelf::Result<()> {
    let db = Database::open(&config.database.url).await?;
    info!(
        "Opened {} database (schema version {})",
        Database::backend_name(),
        db.schema_version().await?
    );
    let db = Arc::new(db);

    let root = UploadRoot::new(&config.uploads.root)?;
    let server = WebServer::new(&config.server, Arc::clone(&db), root)?;
    server.run().await?;

    db.close().await;
    Ok(())
}
