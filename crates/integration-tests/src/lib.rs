//! Integration tests for the contact book.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the API against a migrated database
//! cargo run -p contact-book-cli -- migrate
//! cargo run -p contact-book-api
//!
//! # Run integration tests (they are ignored by default)
//! cargo test -p contact-book-integration-tests -- --ignored --test-threads=1
//! ```
//!
//! Tests share one database, so they reset it and must run single-threaded.
//!
//! # Environment Variables
//!
//! - `CONTACTS_TEST_URL` - Base URL of the contacts collection
//!   (default: `http://localhost:8080/api/contacts`)

use reqwest::{Client, Response};
use serde_json::Value;

use contact_book_api::models::Contact;

/// Shared client and collection URL for a running API.
pub struct TestContext {
    pub client: Client,
    pub contacts_url: String,
}

impl TestContext {
    /// Build a context from `CONTACTS_TEST_URL`.
    #[must_use]
    pub fn from_env() -> Self {
        let contacts_url = std::env::var("CONTACTS_TEST_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api/contacts".to_string());

        Self {
            client: Client::new(),
            contacts_url: contacts_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL for a path below the contacts collection.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.contacts_url)
    }

    /// Delete every contact.
    ///
    /// # Panics
    ///
    /// Panics if the server is unreachable or the reset fails.
    pub async fn reset(&self) {
        let resp = self
            .client
            .post(self.url("/reset"))
            .send()
            .await
            .expect("Failed to reset contacts");
        assert!(resp.status().is_success());
    }

    /// Create a contact from a JSON body and return the response.
    ///
    /// # Panics
    ///
    /// Panics if the server is unreachable.
    pub async fn create(&self, body: &Value) -> Response {
        self.client
            .post(&self.contacts_url)
            .json(body)
            .send()
            .await
            .expect("Failed to create contact")
    }

    /// Fetch every contact.
    ///
    /// # Panics
    ///
    /// Panics if the server is unreachable or returns invalid JSON.
    pub async fn list(&self) -> Vec<Contact> {
        self.client
            .get(&self.contacts_url)
            .send()
            .await
            .expect("Failed to list contacts")
            .json()
            .await
            .expect("Invalid contact list")
    }
}
