//! # Coupon Vault
//!
//! Issues and redeems single-use numeric coupons. Each coupon is a JSON record
//! keyed by its 12-digit serial number; redemption requires the 5-digit
//! passcode chosen at issuance and succeeds at most once.
//!
//! ## Architecture
//! ```text
//! Client → POST /coupons (issue)  ─┐
//!        → PUT  /coupons (redeem) ─┴→ Coupon Vault → Redis (records)
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use coupon_common::Locale;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod coupons;
mod routes;
mod state;
mod store;

use config::{AppConfig, StoreBackend};
use state::AppState;
use store::{CouponStore, MemoryStore, RedisStore};

/// Coupon Vault - single-use coupon issuance and redemption
#[derive(Parser, Debug)]
#[command(name = "coupon-vault")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/coupon-vault.toml")]
    config: String,

    /// Redis URL (overrides config)
    #[arg(long, env = "REDIS_URL")]
    redis_url: Option<String>,

    /// Listen address (overrides config)
    #[arg(short, long, env = "LISTEN_ADDR")]
    listen: Option<String>,

    /// Secret mixed into passcode hashes (overrides config)
    #[arg(long, env = "SALT", hide_env_values = true)]
    salt: Option<String>,

    /// Message language: zh, ja or en (overrides config)
    #[arg(long, env = "COUPON_LOCALE")]
    locale: Option<Locale>,

    /// Store backend (overrides config)
    #[arg(long, value_enum)]
    store: Option<StoreBackend>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up SALT and friends from a local .env before clap reads the environment
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level, args.json_logs)?;

    info!("🎟️ Starting Coupon Vault v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load(&args.config, &args)?;
    info!(
        locale = %config.locale,
        backend = ?config.store.backend,
        "📋 Configuration loaded"
    );

    match config.store.backend {
        StoreBackend::Redis => {
            let store = RedisStore::connect(&config.redis_url, config.store.key_prefix.clone())
                .await?;
            info!("✅ Redis connected: {}", config.redis_url);
            serve(config, store).await
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; coupons are lost on restart");
            serve(config, MemoryStore::new()).await
        }
    }
}

/// Bind the listener and run the HTTP server until Ctrl+C
async fn serve<S>(config: AppConfig, store: S) -> Result<()>
where
    S: CouponStore + Clone + Sync + 'static,
{
    let listen_addr = config.listen_addr.clone();
    let app = routes::create_router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", listen_addr))?;
    info!("🚀 Coupon Vault listening on {}", listen_addr);

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("🛑 Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Server error")?;

    info!("👋 Coupon Vault shutdown complete");
    Ok(())
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init();
    }

    Ok(())
}
