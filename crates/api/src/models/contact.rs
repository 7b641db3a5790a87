//! Contact domain types.
//!
//! These types are shared by the store and the HTTP layer. The JSON shape uses
//! camelCase field names (`firstName`, `lastName`, `phoneNumber`).

use serde::{Deserialize, Serialize};

use contact_book_core::{ContactId, is_blank, non_blank};

/// A stored contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Store-assigned ID, never reassigned.
    pub id: ContactId,
    /// First name. Not unique.
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

impl Contact {
    /// Apply a partial update in place.
    ///
    /// Only fields present in `update` are overwritten.
    pub fn apply(&mut self, update: &ContactUpdate) {
        if let Some(first_name) = &update.first_name {
            first_name.clone_into(&mut self.first_name);
        }
        if let Some(last_name) = &update.last_name {
            self.last_name = Some(last_name.clone());
        }
        if let Some(phone_number) = &update.phone_number {
            self.phone_number = Some(phone_number.clone());
        }
    }
}

/// A contact that has not been stored yet.
///
/// Deserializes from the same JSON shape as [`Contact`]; a client-supplied
/// `id` is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl NewContact {
    /// Create a new contact with only a first name.
    #[must_use]
    pub fn new(first_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: None,
            phone_number: None,
        }
    }

    /// Set the last name.
    #[must_use]
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Set the phone number.
    #[must_use]
    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Check the required first name and drop blank optional fields.
    ///
    /// Returns `None` when `first_name` is blank.
    #[must_use]
    pub fn validated(self) -> Option<Self> {
        if is_blank(&self.first_name) {
            return None;
        }
        Some(Self {
            first_name: self.first_name,
            last_name: non_blank(self.last_name),
            phone_number: non_blank(self.phone_number),
        })
    }

    /// Attach a store-assigned ID.
    #[must_use]
    pub fn into_contact(self, id: ContactId) -> Contact {
        Contact {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
        }
    }
}

/// Partial update instruction passed to the store.
///
/// Blank values are dropped at construction, so `None` always means
/// "leave the stored value alone".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

impl ContactUpdate {
    /// Build an update from raw optional inputs, discarding blank values.
    #[must_use]
    pub fn new(
        first_name: Option<String>,
        last_name: Option<String>,
        phone_number: Option<String>,
    ) -> Self {
        Self {
            first_name: non_blank(first_name),
            last_name: non_blank(last_name),
            phone_number: non_blank(phone_number),
        }
    }

    /// Returns `true` if applying this update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.phone_number.is_none()
    }
}
