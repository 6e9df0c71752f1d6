// 📦 Product Record - the only entity the registry holds
//
// A Product is created once by the store and never edited afterwards.
// Input normalization (trimming, decimal separator) happens here so that the
// store only ever sees clean values.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the store (starts at 1, never reused)
pub type ProductId = u64;

// ============================================================================
// PRODUCT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Assigned by the store in insertion order - NEVER changes
    pub id: ProductId,

    /// Trimmed, never blank
    pub name: String,

    /// Always finite and > 0
    pub price: f64,

    /// Trimmed, never blank
    pub category: String,
}

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// Why an add was rejected. Checked in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    BlankName,
    BlankCategory,
    /// Price text did not parse to a finite number
    InvalidPrice(String),
    /// Price parsed but was zero or negative
    NonPositivePrice(f64),
}

impl ValidationError {
    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::BlankName => "name",
            ValidationError::BlankCategory => "category",
            ValidationError::InvalidPrice(_) | ValidationError::NonPositivePrice(_) => "price",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::BlankName => write!(f, "name: must not be blank"),
            ValidationError::BlankCategory => write!(f, "category: must not be blank"),
            ValidationError::InvalidPrice(raw) => {
                write!(f, "price: '{}' is not a number", raw)
            }
            ValidationError::NonPositivePrice(value) => {
                write!(f, "price: {} must be greater than zero", value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// PRICE PARSING
// ============================================================================

/// Parse user-entered price text.
///
/// Accepts `.` or `,` as the decimal separator ("1,50" == "1.50").
/// More than one separator, empty text, or non-finite values are rejected.
/// The sign is checked here too, so a returned price is always usable.
pub fn parse_price(raw: &str) -> Result<f64, ValidationError> {
    let normalized = raw.trim().replace(',', ".");

    let value = normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::InvalidPrice(raw.to_string()))?;

    if value <= 0.0 {
        return Err(ValidationError::NonPositivePrice(value));
    }

    Ok(value)
}

// ============================================================================
// INPUT FORMS
// ============================================================================

/// Price as it arrives from an outer surface: typed text or a JSON number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    /// Raw text handed to `parse_price`
    pub fn as_raw(&self) -> String {
        match self {
            PriceInput::Number(n) => n.to_string(),
            PriceInput::Text(s) => s.clone(),
        }
    }
}

/// The three arguments of an add, deserializable from a request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: PriceInput,
    pub category: String,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_dot_and_comma() {
        assert_eq!(parse_price("1.50"), Ok(1.5));
        assert_eq!(parse_price("1,50"), Ok(1.5));
        assert_eq!(parse_price("25"), Ok(25.0));
    }

    #[test]
    fn test_parse_price_trims_whitespace() {
        assert_eq!(parse_price("  3,25 "), Ok(3.25));
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        assert_eq!(
            parse_price("abc"),
            Err(ValidationError::InvalidPrice("abc".to_string()))
        );
        assert_eq!(
            parse_price(""),
            Err(ValidationError::InvalidPrice(String::new()))
        );
        // Two separators never parse
        assert!(matches!(parse_price("1,000.50"), Err(ValidationError::InvalidPrice(_))));
        assert!(matches!(parse_price("1.2.3"), Err(ValidationError::InvalidPrice(_))));
    }

    #[test]
    fn test_parse_price_rejects_non_finite() {
        assert!(matches!(parse_price("inf"), Err(ValidationError::InvalidPrice(_))));
        assert!(matches!(parse_price("NaN"), Err(ValidationError::InvalidPrice(_))));
    }

    #[test]
    fn test_parse_price_rejects_non_positive() {
        assert_eq!(parse_price("0"), Err(ValidationError::NonPositivePrice(0.0)));
        assert_eq!(parse_price("-5"), Err(ValidationError::NonPositivePrice(-5.0)));
    }

    #[test]
    fn test_validation_error_fields() {
        assert_eq!(ValidationError::BlankName.field(), "name");
        assert_eq!(ValidationError::BlankCategory.field(), "category");
        assert_eq!(ValidationError::NonPositivePrice(0.0).field(), "price");
        assert_eq!(
            ValidationError::InvalidPrice("x".to_string()).to_string(),
            "price: 'x' is not a number"
        );
    }

    #[test]
    fn test_product_input_accepts_text_or_number() {
        let text: ProductInput =
            serde_json::from_str(r#"{"name":"Pen","price":"1,50","category":"Office"}"#).unwrap();
        assert_eq!(text.price, PriceInput::Text("1,50".to_string()));
        assert_eq!(parse_price(&text.price.as_raw()), Ok(1.5));

        let number: ProductInput =
            serde_json::from_str(r#"{"name":"Pen","price":2.5,"category":"Office"}"#).unwrap();
        assert_eq!(number.price, PriceInput::Number(2.5));
        assert_eq!(parse_price(&number.price.as_raw()), Ok(2.5));
    }

    #[test]
    fn test_product_serializes_flat() {
        let product = Product {
            id: 1,
            name: "Chair".to_string(),
            price: 25.0,
            category: "Furniture".to_string(),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "name": "Chair", "price": 25.0, "category": "Furniture"})
        );
    }
}
