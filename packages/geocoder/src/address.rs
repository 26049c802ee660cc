//! Address form handling.
//!
//! The add-by-address screen collects six free-text fields. They are joined
//! into one comma-separated query: empty fields are skipped and runs of
//! whitespace inside a field collapse to a single space.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Regex for runs of whitespace (including tabs/newlines from pasted text).
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// The six address fields of the add-by-address form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressForm {
    /// Street name (e.g., "Rua Sete de Setembro").
    pub street: String,
    /// House number.
    pub number: String,
    /// Neighborhood / district.
    pub neighborhood: String,
    /// City name.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Country name.
    pub country: String,
}

impl AddressForm {
    /// Field values in query order.
    fn fields(&self) -> [&str; 6] {
        [
            &self.street,
            &self.number,
            &self.neighborhood,
            &self.city,
            &self.state,
            &self.country,
        ]
    }

    /// Builds the one-line geocoding query.
    ///
    /// Returns `None` when every field is blank.
    #[must_use]
    pub fn to_query(&self) -> Option<String> {
        let parts: Vec<String> = self
            .fields()
            .iter()
            .map(|field| clean_field(field))
            .filter(|field| !field.is_empty())
            .collect();

        if parts.is_empty() {
            return None;
        }

        Some(parts.join(", "))
    }
}

fn clean_field(raw: &str) -> String {
    WHITESPACE_RE.replace_all(raw.trim(), " ").into_owned()
}
