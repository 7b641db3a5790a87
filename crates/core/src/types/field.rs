//! Text field normalization.
//!
//! Contact fields arrive from query strings and JSON bodies where "not supplied"
//! can mean absent, `null`, or an empty string. These helpers collapse all three
//! into `None` so partial updates only ever see real values.

/// Returns `true` if the value is empty or whitespace only.
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Keep a value only if it is present and not blank.
///
/// The value itself is returned untouched (no trimming).
///
/// ```
/// use contact_book_core::non_blank;
///
/// assert_eq!(non_blank(Some("Choy".to_string())), Some("Choy".to_string()));
/// assert_eq!(non_blank(Some("   ".to_string())), None);
/// assert_eq!(non_blank(None), None);
/// ```
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !is_blank(v))
}
