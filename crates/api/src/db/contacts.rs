//! `PostgreSQL` contact store.
//!
//! Queries are checked at runtime (`query_as` + `FromRow`) so the crate builds
//! without a live database or an offline query cache.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use contact_book_core::ContactId;

use super::{ContactStore, RepositoryError};
use crate::models::{Contact, ContactUpdate, NewContact};

const SELECT_COLUMNS: &str = "SELECT id, first_name, last_name, phone_number FROM contacts.customer";

/// Raw row from `contacts.customer`.
#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: ContactId,
    first_name: String,
    last_name: Option<String>,
    phone_number: Option<String>,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            phone_number: row.phone_number,
        }
    }
}

/// Contact store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgContactStore {
    pool: PgPool,
}

impl PgContactStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn find_all(&self) -> Result<Vec<Contact>, RepositoryError> {
        let rows = sqlx::query_as::<_, ContactRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>, RepositoryError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Contact::from))
    }

    async fn find_by_first_name(&self, first_name: &str) -> Result<Vec<Contact>, RepositoryError> {
        let rows = sqlx::query_as::<_, ContactRow>(&format!(
            "{SELECT_COLUMNS} WHERE first_name = $1 ORDER BY id"
        ))
        .bind(first_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn find_by_first_and_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Contact>, RepositoryError> {
        let rows = sqlx::query_as::<_, ContactRow>(&format!(
            "{SELECT_COLUMNS} WHERE first_name = $1 AND last_name = $2 ORDER BY id"
        ))
        .bind(first_name)
        .bind(last_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn find_first_by_first_name(
        &self,
        first_name: &str,
    ) -> Result<Option<Contact>, RepositoryError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "{SELECT_COLUMNS} WHERE first_name = $1 ORDER BY id LIMIT 1"
        ))
        .bind(first_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Contact::from))
    }

    #[instrument(skip(self, contact), fields(first_name = %contact.first_name))]
    async fn save(&self, contact: NewContact) -> Result<Contact, RepositoryError> {
        let row = sqlx::query_as::<_, ContactRow>(
            r"
            INSERT INTO contacts.customer (first_name, last_name, phone_number)
            VALUES ($1, $2, $3)
            RETURNING id, first_name, last_name, phone_number
            ",
        )
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.phone_number)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(contact_id = %row.id, "Contact created");
        Ok(row.into())
    }

    #[instrument(skip(self, contacts), fields(count = contacts.len()))]
    async fn save_all(&self, contacts: Vec<NewContact>) -> Result<Vec<Contact>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(contacts.len());

        for contact in contacts {
            let row = sqlx::query_as::<_, ContactRow>(
                r"
                INSERT INTO contacts.customer (first_name, last_name, phone_number)
                VALUES ($1, $2, $3)
                RETURNING id, first_name, last_name, phone_number
                ",
            )
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.phone_number)
            .fetch_one(&mut *tx)
            .await?;

            saved.push(Contact::from(row));
        }

        tx.commit().await?;

        tracing::info!(count = saved.len(), "Contacts bulk created");
        Ok(saved)
    }

    #[instrument(skip(self, update), fields(contact_id = %id))]
    async fn update(
        &self,
        id: ContactId,
        update: &ContactUpdate,
    ) -> Result<Contact, RepositoryError> {
        // COALESCE keeps the stored value for every field the update leaves out
        let row = sqlx::query_as::<_, ContactRow>(
            r"
            UPDATE contacts.customer
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone_number = COALESCE($4, phone_number)
            WHERE id = $1
            RETURNING id, first_name, last_name, phone_number
            ",
        )
        .bind(id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.phone_number)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Err(RepositoryError::NotFound);
        };

        tracing::info!("Contact updated");
        Ok(row.into())
    }

    #[instrument(skip(self), fields(contact_id = %id))]
    async fn delete(&self, id: ContactId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM contacts.customer WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::info!("Contact deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM contacts.customer")
            .execute(&self.pool)
            .await?;

        tracing::info!(count = result.rows_affected(), "All contacts deleted");
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
