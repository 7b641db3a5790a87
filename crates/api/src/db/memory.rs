//! In-memory contact store.
//!
//! Backs the API when `CONTACTS_STORAGE=memory` and in the router tests.
//! Contents are lost when the process exits.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use contact_book_core::ContactId;

use super::{ContactStore, RepositoryError};
use crate::models::{Contact, ContactUpdate, NewContact};

#[derive(Debug)]
struct Inner {
    next_id: i64,
    contacts: BTreeMap<ContactId, Contact>,
}

impl Inner {
    fn insert(&mut self, contact: NewContact) -> Contact {
        let id = ContactId::new(self.next_id);
        self.next_id += 1;

        let contact = contact.into_contact(id);
        self.contacts.insert(id, contact.clone());
        contact
    }
}

/// Contact store held in process memory.
///
/// Ids start at 1 and are never reused, even after `delete_all`.
#[derive(Debug)]
pub struct InMemoryContactStore {
    inner: RwLock<Inner>,
}

impl InMemoryContactStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                contacts: BTreeMap::new(),
            }),
        }
    }
}

impl Default for InMemoryContactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn find_all(&self) -> Result<Vec<Contact>, RepositoryError> {
        Ok(self.inner.read().await.contacts.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>, RepositoryError> {
        Ok(self.inner.read().await.contacts.get(&id).cloned())
    }

    async fn find_by_first_name(&self, first_name: &str) -> Result<Vec<Contact>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .contacts
            .values()
            .filter(|c| c.first_name == first_name)
            .cloned()
            .collect())
    }

    async fn find_by_first_and_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Contact>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .contacts
            .values()
            .filter(|c| c.first_name == first_name && c.last_name.as_deref() == Some(last_name))
            .cloned()
            .collect())
    }

    async fn save(&self, contact: NewContact) -> Result<Contact, RepositoryError> {
        let contact = self.inner.write().await.insert(contact);
        tracing::info!(contact_id = %contact.id, "Contact created");
        Ok(contact)
    }

    async fn save_all(&self, contacts: Vec<NewContact>) -> Result<Vec<Contact>, RepositoryError> {
        let mut inner = self.inner.write().await;
        let saved: Vec<Contact> = contacts.into_iter().map(|c| inner.insert(c)).collect();
        tracing::info!(count = saved.len(), "Contacts bulk created");
        Ok(saved)
    }

    async fn update(
        &self,
        id: ContactId,
        update: &ContactUpdate,
    ) -> Result<Contact, RepositoryError> {
        let mut inner = self.inner.write().await;
        let contact = inner
            .contacts
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;

        contact.apply(update);
        tracing::info!(contact_id = %id, "Contact updated");
        Ok(contact.clone())
    }

    async fn delete(&self, id: ContactId) -> Result<(), RepositoryError> {
        self.inner
            .write()
            .await
            .contacts
            .remove(&id)
            .ok_or(RepositoryError::NotFound)?;

        tracing::info!(contact_id = %id, "Contact deleted");
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let mut inner = self.inner.write().await;
        let removed = inner.contacts.len() as u64;
        inner.contacts.clear();

        tracing::info!(count = removed, "All contacts deleted");
        Ok(removed)
    }
}
