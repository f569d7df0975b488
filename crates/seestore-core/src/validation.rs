//! # Validation Module
//!
//! Input validation for values arriving from the register UI.
//!
//! These checks run before any persistence call (error class "validation"
//! in the register's taxonomy): a failure is surfaced inline and nothing
//! is written. The database constraints behind them are a second line of
//! defense, not the first.

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name: required, at most 200 characters.
pub fn validate_product_name(nome: &str) -> ValidationResult<()> {
    let nome = nome.trim();

    if nome.is_empty() {
        return Err(ValidationError::Required {
            field: "nome".to_string(),
        });
    }

    if nome.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "nome".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a customer name for inline quick-create: required only.
pub fn validate_customer_name(nome: &str) -> ValidationResult<()> {
    if nome.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "nome".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// May be empty; what an empty query lists is the caller's decision (the
/// catalog shows every active product, the customer lookup shows nothing).
/// Bounded to keep LIKE patterns sane. Returns the trimmed query.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "busca".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity: strictly positive, bounded.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantidade".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantidade".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a sale price in centavos: strictly positive.
///
/// Used by the ad-hoc product registrar, which refuses free items.
pub fn validate_sale_price_centavos(centavos: i64) -> ValidationResult<()> {
    if centavos <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "preco_venda".to_string(),
        });
    }

    Ok(())
}

/// Validates a cost price in centavos: non-negative, zero allowed.
pub fn validate_cost_price_centavos(centavos: i64) -> ValidationResult<()> {
    if centavos < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "preco_custo".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount amount in centavos.
///
/// Non-negative only. Deliberately NOT bounded by the line total: the
/// discount gate preserves the original behaviour of allowing a discount
/// larger than the line, which yields a negative subtotal.
pub fn validate_discount_centavos(centavos: i64) -> ValidationResult<()> {
    if centavos < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "desconto".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Café Torrado 500g").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_sale_price() {
        assert!(validate_sale_price_centavos(750).is_ok());
        assert!(validate_sale_price_centavos(0).is_err());
        assert!(validate_sale_price_centavos(-100).is_err());
    }

    #[test]
    fn test_validate_cost_price_allows_zero() {
        assert!(validate_cost_price_centavos(0).is_ok());
        assert!(validate_cost_price_centavos(-1).is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount_centavos(0).is_ok());
        // Larger than any plausible line total is still accepted here;
        // the negative-subtotal consequence is owned by the cart.
        assert!(validate_discount_centavos(10_000_000).is_ok());
        assert!(validate_discount_centavos(-1).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  café  ").unwrap(), "café");
        assert!(validate_search_query(&"x".repeat(200)).is_err());
    }
}
