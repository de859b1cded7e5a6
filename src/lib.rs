pub mod calendar; // Date cursor, strips and month grids
pub mod config;
pub mod db;
pub mod insight; // External insight text with fallback
pub mod models;
pub mod scheduling; // Booking, status machine, client reconciliation
pub mod session; // Session-scoped agenda context

use chrono::Local;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::AgendaSettings;
use crate::session::{AgendaSession, SessionError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Install the global subscriber. `RUST_LOG` wins over the default filter.
pub fn init_tracing() {
    // A second call (tests, embedding hosts) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Open the owner's agenda, load it and print today's view as JSON.
pub async fn run() -> Result<(), AppError> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let db_path = config::database_path();
    let conn = db::open_database(&db_path)?;
    let owner_id = config::owner_id_from_env();
    tracing::info!(owner_id = %owner_id, path = %db_path.display(), "database ready");

    let session = AgendaSession::open(
        conn,
        owner_id,
        AgendaSettings::default(),
        Local::now().date_naive(),
    );
    session.load().await?;

    let view = session.current_view().await?;
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
