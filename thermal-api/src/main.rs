//! thermal-api - read-only thermal imagery REST API
//!
//! Serves dataset discovery, mosaic metadata, enriched camera positions,
//! coverage estimates and signed links to imagery.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thermal_common::config::{resolve_root_folder, ConfigSource, TomlConfig, ROOT_ENV_VAR};
use thermal_common::db::SqliteRecordStore;
use thermal_common::signing::UrlSigner;
use thermal_api::db::connect_readonly;
use thermal_api::{build_router, AppState, FsObjectStore};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "thermal-api", version, about = "Read-only thermal imagery REST API")]
struct Args {
    /// Root folder holding the record store and the object bucket
    #[arg(long)]
    root: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, env = "THERMAL_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, config_source) = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }

    // RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting thermal-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config_source {
        ConfigSource::File(path) => info!("Loaded config from {}", path.display()),
        ConfigSource::Defaults => warn!("No config file found, using compiled defaults"),
    }

    let root_folder = resolve_root_folder(
        args.root.as_deref(),
        ROOT_ENV_VAR,
        config.root_folder.as_deref(),
    );
    info!("Root folder: {}", root_folder.display());

    let db_path = config.database_path(&root_folder);
    info!("Record store: {}", db_path.display());

    let pool = match connect_readonly(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to record store (read-only)");
            pool
        }
        Err(e) => {
            error!("Failed to connect to record store: {}", e);
            return Err(e);
        }
    };

    let secret = match config.resolve_signing_secret() {
        Some(secret) => secret,
        None => {
            warn!("No signing secret configured; issued URLs will not survive a restart");
            UrlSigner::generate_secret()
        }
    };
    let signer = UrlSigner::new(secret, config.base_url());

    let object_root = config.object_root_path(&root_folder);
    info!("Object store: {}", object_root.display());
    let objects = FsObjectStore::new(
        object_root,
        signer,
        Duration::from_secs(config.url_expiry_secs),
    );

    info!(
        "Coverage sensor profile: {} (fov {}°, overlap {})",
        config.sensor.label(),
        config.sensor.fov_degrees,
        config.sensor.overlap_factor
    );

    let state = AppState::new(SqliteRecordStore::new(pool), objects, config.sensor.clone());
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address {}:{}",
                config.bind_address, config.port
            )
        })?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("thermal-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
