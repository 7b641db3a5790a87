//! Core types for the contact book.

pub mod field;
pub mod id;

pub use field::{is_blank, non_blank};
pub use id::*;
