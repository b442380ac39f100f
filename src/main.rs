use em_inventory::app::{AppState, build_router};
use em_inventory::config::{self, database};
use em_inventory::core::{auth, seed};
use em_inventory::errors::Result;
use dotenvy::dotenv;
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Makes sure the directory of a file-backed `SQLite` URL exists.
fn ensure_sqlite_dir(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or_default();
    match std::path::Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)?,
        _ => {}
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received.");
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the main application configuration
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!("Successfully processed application configuration.");

    // 4. Initialize database
    ensure_sqlite_dir(&database::get_database_url())?;
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| app_config.server.bind_addr.clone());
    let state = AppState::new(db, app_config);

    // 5. Seed initial stock and the development account
    seed::seed_initial_data(&*state.db, &state.hub, &state.config.seed)
        .await
        .inspect_err(|e| error!("Failed to seed initial data: {}", e))?;

    match config::users::get_dev_user() {
        Some(dev) => {
            auth::ensure_dev_user(&*state.db, &dev)
                .await
                .inspect_err(|e| error!("Failed to create development user: {}", e))?;
        }
        None => warn!("DEV_USER_EMAIL/DEV_USER_PASSWORD not set; no bootstrap account"),
    }

    let purged = auth::purge_expired_sessions(&*state.db).await?;
    if purged > 0 {
        info!(purged, "Removed expired sessions.");
    }

    // 6. Serve
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", bind_addr, e))?;
    info!(addr = %bind_addr, "Listening.");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
