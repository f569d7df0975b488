//! # Checkout Error Type
//!
//! Unified error type the register UI receives.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in seeStore                               │
//! │                                                                         │
//! │  CoreError (cart / validation)  ──┐                                    │
//! │                                   ├──► CheckoutError { code, message } │
//! │  DbError (repositories)        ──┘          │                          │
//! │                                             ▼                          │
//! │                               serialized to the register UI:           │
//! │                               { "code": "INSUFFICIENT_STOCK",          │
//! │                                 "message": "Estoque insuficiente..." } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The message is already in the operator's language (pt-BR); the code is
//! what the UI switches on.

use serde::Serialize;

use seestore_core::CoreError;
use seestore_db::DbError;

/// Machine-readable error codes for the register UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product, customer or sale not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Stock gate rejected the operation
    InsufficientStock,

    /// Wrong discount password
    DiscountDenied,

    /// Cart precondition failed (empty, too large, line missing)
    CartError,

    /// Finalization precondition failed (no payment, no cashier, ...)
    SaleError,

    /// Anything else
    Internal,
}

/// Error returned from checkout operations.
///
/// ## Serialization
/// ```json
/// { "code": "DISCOUNT_DENIED", "message": "Senha de desconto incorreta" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutError {
    pub code: ErrorCode,
    pub message: String,
}

impl CheckoutError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CheckoutError {
            code,
            message: message.into(),
        }
    }

    /// Finalization precondition failure.
    pub fn sale(message: impl Into<String>) -> Self {
        CheckoutError::new(ErrorCode::SaleError, message)
    }

    /// Cart precondition failure.
    pub fn cart(message: impl Into<String>) -> Self {
        CheckoutError::new(ErrorCode::CartError, message)
    }
}

impl std::fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for CheckoutError {}

impl From<CoreError> for CheckoutError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::IncorrectDiscountPassword => ErrorCode::DiscountDenied,
            CoreError::LineNotFound(_) | CoreError::CartTooLarge { .. } => ErrorCode::CartError,
            CoreError::QuantityTooLarge { .. } | CoreError::Validation(_) => {
                ErrorCode::ValidationError
            }
        };
        CheckoutError::new(code, err.to_string())
    }
}

impl From<DbError> for CheckoutError {
    fn from(err: DbError) -> Self {
        let code = match &err {
            DbError::NotFound { .. } => ErrorCode::NotFound,
            _ => ErrorCode::DatabaseError,
        };
        CheckoutError::new(code, err.to_string())
    }
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

// =============================================================================
// Unit Tests
// =============================================================================
