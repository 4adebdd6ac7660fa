use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use productapp_kernel::settings::DecimalSeparator;

/// A product row as persisted by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier, immutable once created
    pub id: i64,
    /// Display name of the product
    pub name: String,
    /// Unit price
    pub price: Decimal,
    /// Free-form description
    pub description: String,
}

impl Product {
    pub fn from_draft(id: i64, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            price: draft.price,
            description: draft.description,
        }
    }
}

/// Product fields before the store has assigned an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
    pub description: String,
}

/// Form payload for create and edit submissions.
///
/// `price` stays textual so it can be parsed with the configured separator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
}

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub error: String,
}

impl ProductForm {
    /// Validate the form, collecting every field error rather than stopping at the first.
    pub fn validate(&self, separator: DecimalSeparator) -> Result<ProductDraft, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FieldError {
                field: "name",
                error: "required".to_string(),
            });
        }

        let description = self.description.trim();
        if description.is_empty() {
            errors.push(FieldError {
                field: "description",
                error: "required".to_string(),
            });
        }

        let price = match parse_price(&self.price, separator) {
            Ok(price) => Some(price),
            Err(err) => {
                errors.push(FieldError {
                    field: "price",
                    error: err.to_string(),
                });
                None
            }
        };

        match price {
            Some(price) if errors.is_empty() => Ok(ProductDraft {
                name: name.to_string(),
                price,
                description: description.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("required")]
    Missing,
    #[error("'{0}' is not a valid amount")]
    Invalid(String),
}

/// Parse a submitted price using an explicit separator policy.
///
/// With [`DecimalSeparator::Comma`] spaces (including no-break spaces) are
/// accepted as digit grouping, so `1 234,50` parses. A point is never accepted
/// under the comma policy and vice versa.
pub fn parse_price(raw: &str, separator: DecimalSeparator) -> Result<Decimal, PriceError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(PriceError::Missing);
    }

    let normalized = match separator {
        DecimalSeparator::Point => {
            if raw.contains(',') {
                return Err(PriceError::Invalid(raw.to_string()));
            }
            raw.to_string()
        }
        DecimalSeparator::Comma => {
            if raw.contains('.') {
                return Err(PriceError::Invalid(raw.to_string()));
            }
            raw.chars()
                .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
                .map(|c| if c == ',' { '.' } else { c })
                .collect()
        }
    };

    Decimal::from_str(&normalized).map_err(|_| PriceError::Invalid(raw.to_string()))
}
