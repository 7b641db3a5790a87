//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! cb-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CONTACTS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Embedded at compile time from `crates/api/migrations/`.

use contact_book_api::db;

use super::{CommandError, database_url};

/// Run contact database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to contacts database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running contacts migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Contacts migrations complete!");
    Ok(())
}
