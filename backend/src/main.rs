//! Roster Backend
//!
//! User registration, token authentication and profile service.

use roster::core::config::{CliArgs, Command, Config};
use roster::core::services::UserService;
use roster::db::{self, DatabaseManager, TokenRepository, UserRepository};
use roster::{api, core};

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliArgs::parse();

    // Load configuration (handles CLI args, env vars, and config file)
    let config = match Config::load(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            // Print error to stderr since logging isn't initialized yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let _logger = match core::Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return Err(e);
        }
    };

    info!("Starting Roster v{}", env!("CARGO_PKG_VERSION"));
    info!(path = ?config.database.path, "Database configuration");

    let db = Arc::new(DatabaseManager::connect(
        &config.database.path,
        config.database.connection_pool_size as u32,
        Duration::from_millis(config.database.busy_timeout),
    )?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::WaitForDb => wait_for_database(&config, &db).await,
        Command::CreateSuperuser { email, password } => {
            prepare_database(&config, &db).await?;
            create_superuser(&config, db, &email, &password).await
        }
        Command::Serve => {
            prepare_database(&config, &db).await?;
            serve(&config, db).await
        }
    }
}

async fn wait_for_database(config: &Config, db: &DatabaseManager) -> Result<()> {
    db::wait_for_db(
        db,
        Duration::from_millis(config.database.wait_interval_ms),
        config.database.wait_max_attempts,
    )
    .await?;
    Ok(())
}

/// Wait until the database answers, then bring its schema up to date
async fn prepare_database(config: &Config, db: &Arc<DatabaseManager>) -> Result<()> {
    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating directory: {:?}", parent);
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
    }

    wait_for_database(config, db).await?;

    info!("Running database migrations...");
    let migrator = db.clone();
    tokio::task::spawn_blocking(move || migrator.migrate()).await??;
    info!("Database initialized successfully");

    Ok(())
}

async fn create_superuser(
    config: &Config,
    db: Arc<DatabaseManager>,
    email: &str,
    password: &str,
) -> Result<()> {
    let service = UserService::new(
        Arc::new(UserRepository::new(db.clone())),
        Arc::new(TokenRepository::new(db)),
        config.security.bcrypt_cost,
        config.security.password_min_length,
    )?;

    let user = service.create_superuser(email, password).await?;
    info!(user_id = %user.id, email = %user.email, "Superuser created");

    Ok(())
}

async fn serve(config: &Config, db: Arc<DatabaseManager>) -> Result<()> {
    let server_url = format!("http://{}:{}", config.server.host, config.server.port);
    let server = api::ApiServer::new(config, db)?;

    info!(url = %server_url, "Server ready - starting to serve requests");

    // Blocks until a shutdown signal arrives
    server.serve().await?;

    Ok(())
}
