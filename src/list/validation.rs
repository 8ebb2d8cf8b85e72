//! Input validation for add/edit
//!
//! An `ItemDraft` can only be built from input that passes every rule, so list
//! operations that take a draft never see an invalid name or quantity.

use serde::Serialize;
use thiserror::Error;

use crate::consts::*;

/// A single field-level validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Item name is required")]
    NameRequired,
    #[error("Item name must be at least {min} characters", min = NAME_MIN_LEN)]
    NameTooShort,
    #[error("Item name must be at most {max} characters", max = NAME_MAX_LEN)]
    NameTooLong,
    #[error("Quantity must be a number")]
    QuantityNotNumber,
    #[error("Quantity must be at least {min}", min = QUANTITY_MIN)]
    QuantityTooSmall,
    #[error("Quantity must be less than {limit}", limit = QUANTITY_MAX + 1)]
    QuantityTooLarge,
}

impl Serialize for FieldError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Field-level errors from one add/edit attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub name: Option<FieldError>,
    pub quantity: Option<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.name, self.quantity) {
            (Some(name), Some(quantity)) => write!(f, "{name}; {quantity}"),
            (Some(err), None) | (None, Some(err)) => write!(f, "{err}"),
            (None, None) => f.write_str("no validation errors"),
        }
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate and trim an item name
pub fn validate_name(raw: &str) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::NameRequired);
    }
    let len = trimmed.chars().count();
    if len < NAME_MIN_LEN {
        return Err(FieldError::NameTooShort);
    }
    if len > NAME_MAX_LEN {
        return Err(FieldError::NameTooLong);
    }
    Ok(trimmed.to_string())
}

/// Range-check a numeric quantity
pub fn validate_quantity(quantity: i64) -> Result<u32, FieldError> {
    if quantity < i64::from(QUANTITY_MIN) {
        return Err(FieldError::QuantityTooSmall);
    }
    if quantity > i64::from(QUANTITY_MAX) {
        return Err(FieldError::QuantityTooLarge);
    }
    // Bounds checked above
    Ok(quantity as u32)
}

/// Parse quantity text typed into a form field
pub fn parse_quantity(raw: &str) -> Result<u32, FieldError> {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(n) => validate_quantity(n),
        Err(_) => {
            // Integer overflow on an all-digit string is still "too large", not "not a number"
            let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                if trimmed.starts_with('-') {
                    Err(FieldError::QuantityTooSmall)
                } else {
                    Err(FieldError::QuantityTooLarge)
                }
            } else {
                Err(FieldError::QuantityNotNumber)
            }
        }
    }
}

/// A validated name/quantity pair, ready to add or apply as an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    name: String,
    quantity: u32,
}

impl ItemDraft {
    /// Validate a name and numeric quantity, reporting every failing field
    pub fn new(name: &str, quantity: i64) -> Result<Self, ValidationErrors> {
        Self::collect(validate_name(name), validate_quantity(quantity))
    }

    /// Validate raw form text
    pub fn parse(name: &str, quantity: &str) -> Result<Self, ValidationErrors> {
        Self::collect(validate_name(name), parse_quantity(quantity))
    }

    fn collect(
        name: Result<String, FieldError>,
        quantity: Result<u32, FieldError>,
    ) -> Result<Self, ValidationErrors> {
        match (name, quantity) {
            (Ok(name), Ok(quantity)) => Ok(Self { name, quantity }),
            (name, quantity) => Err(ValidationErrors {
                name: name.err(),
                quantity: quantity.err(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub(crate) fn into_parts(self) -> (String, u32) {
        (self.name, self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_name("   "), Err(FieldError::NameRequired));
        assert_eq!(validate_name(" a "), Err(FieldError::NameTooShort));
        assert_eq!(validate_name("  eggs \n").as_deref(), Ok("eggs"));
        assert_eq!(validate_name(&"x".repeat(50)).map(|n| n.len()), Ok(50));
        assert_eq!(validate_name(&"x".repeat(51)), Err(FieldError::NameTooLong));
        // Characters, not bytes
        assert!(validate_name("äö").is_ok());
    }

    #[test]
    fn test_quantity_rules() {
        assert_eq!(validate_quantity(0), Err(FieldError::QuantityTooSmall));
        assert_eq!(validate_quantity(-3), Err(FieldError::QuantityTooSmall));
        assert_eq!(validate_quantity(1), Ok(1));
        assert_eq!(validate_quantity(9999), Ok(9999));
        assert_eq!(validate_quantity(10000), Err(FieldError::QuantityTooLarge));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(""), Err(FieldError::QuantityNotNumber));
        assert_eq!(parse_quantity("abc"), Err(FieldError::QuantityNotNumber));
        assert_eq!(parse_quantity(" 12 "), Ok(12));
        assert_eq!(
            parse_quantity("99999999999999999999999"),
            Err(FieldError::QuantityTooLarge)
        );
        assert_eq!(parse_quantity("-0"), Err(FieldError::QuantityTooSmall));
    }

    #[test]
    fn test_draft_reports_both_fields() {
        let err = ItemDraft::parse("a", "0").unwrap_err();
        assert_eq!(err.name, Some(FieldError::NameTooShort));
        assert_eq!(err.quantity, Some(FieldError::QuantityTooSmall));
        assert_eq!(
            err.to_string(),
            "Item name must be at least 2 characters; Quantity must be at least 1"
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            FieldError::QuantityTooLarge.to_string(),
            "Quantity must be less than 10000"
        );
        assert_eq!(
            FieldError::NameTooLong.to_string(),
            "Item name must be at most 50 characters"
        );
    }
}
