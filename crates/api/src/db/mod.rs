//! Contact persistence.
//!
//! # Database: `contacts` schema
//!
//! ## Tables
//!
//! - `customer` - Contact records (first name, last name, phone number)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p contact-book-cli -- migrate
//! ```
//!
//! # Stores
//!
//! Handlers only see the [`ContactStore`] trait. Two implementations exist:
//! [`PgContactStore`] for `PostgreSQL` and [`InMemoryContactStore`] for local
//! development and tests.

pub mod contacts;
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use contact_book_core::ContactId;

use crate::models::{Contact, ContactUpdate, NewContact};

pub use contacts::PgContactStore;
pub use memory::InMemoryContactStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Storage for contact records.
///
/// `first_name` is not unique: name lookups return every match ordered by id.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Every stored contact, ordered by id.
    async fn find_all(&self) -> Result<Vec<Contact>, RepositoryError>;

    /// Look up a single contact by id.
    async fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>, RepositoryError>;

    /// All contacts with the given first name, ordered by id.
    async fn find_by_first_name(&self, first_name: &str) -> Result<Vec<Contact>, RepositoryError>;

    /// All contacts matching both names, ordered by id.
    async fn find_by_first_and_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Contact>, RepositoryError>;

    /// Insert a contact and return it with its assigned id.
    async fn save(&self, contact: NewContact) -> Result<Contact, RepositoryError>;

    /// Insert many contacts. Either all are stored or none are.
    async fn save_all(&self, contacts: Vec<NewContact>) -> Result<Vec<Contact>, RepositoryError>;

    /// Apply a partial update to an existing contact and return the result.
    ///
    /// Returns `RepositoryError::NotFound` if the contact no longer exists.
    async fn update(&self, id: ContactId, update: &ContactUpdate)
    -> Result<Contact, RepositoryError>;

    /// Remove a contact.
    ///
    /// Returns `RepositoryError::NotFound` if the contact no longer exists.
    async fn delete(&self, id: ContactId) -> Result<(), RepositoryError>;

    /// Remove every contact, returning how many were removed.
    async fn delete_all(&self) -> Result<u64, RepositoryError>;

    /// Check that the backing storage is reachable.
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    /// First contact with the given first name, if any.
    async fn find_first_by_first_name(
        &self,
        first_name: &str,
    ) -> Result<Option<Contact>, RepositoryError> {
        Ok(self.find_by_first_name(first_name).await?.into_iter().next())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
