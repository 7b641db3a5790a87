//! Seed the contacts table from a JSON file.
//!
//! The file holds a JSON array in the same shape the bulk-create endpoint
//! accepts:
//!
//! ```json
//! [
//!   {"firstName": "Geoff", "lastName": "Choy", "phoneNumber": "000"},
//!   {"firstName": "Ann"}
//! ]
//! ```

use std::path::Path;

use tracing::info;

use contact_book_api::db::{self, ContactStore, PgContactStore};
use contact_book_api::models::NewContact;

use super::{CommandError, database_url};

/// Seed contacts from a JSON file.
///
/// # Arguments
///
/// * `file_path` - Path to the JSON seed file
/// * `reset` - If true, delete every existing contact first
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry has a
/// blank first name, or database operations fail.
pub async fn contacts(file_path: &str, reset: bool) -> Result<(), CommandError> {
    // Read and validate before connecting to the database
    let content = tokio::fs::read_to_string(Path::new(file_path))
        .await
        .map_err(|source| CommandError::Io {
            path: file_path.to_string(),
            source,
        })?;
    let batch = parse_seed(&content)?;
    info!(path = %file_path, contacts = batch.len(), "Parsed seed file");

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    let store = PgContactStore::new(pool);
    info!("Connected to database");

    if reset {
        let removed = store.delete_all().await?;
        info!(removed, "Cleared existing contacts");
    }

    let saved = store.save_all(batch).await?;
    info!(inserted = saved.len(), "Seeding complete!");

    Ok(())
}

/// Parse and validate the seed file contents.
fn parse_seed(content: &str) -> Result<Vec<NewContact>, CommandError> {
    let batch: Vec<NewContact> =
        serde_json::from_str(content).map_err(|e| CommandError::InvalidSeed(e.to_string()))?;

    batch
        .into_iter()
        .enumerate()
        .map(|(index, contact)| {
            contact.validated().ok_or_else(|| {
                CommandError::InvalidSeed(format!("entry {index} has a blank firstName"))
            })
        })
        .collect()
}
