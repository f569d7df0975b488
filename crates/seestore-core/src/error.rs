//! # Error Types
//!
//! Domain-specific error types for seestore-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  seestore-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  seestore-db errors                                                     │
//! │  └── DbError          - Persistence failures                            │
//! │                                                                         │
//! │  seestore-pdv errors                                                    │
//! │  └── CheckoutError    - What the register UI sees (serialized)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → CheckoutError → client   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, quantities, id)
//! 3. Errors are enum variants, never String
//! 4. Each variant maps to one user-facing notice at the register

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the cart and discount gate.
///
/// None of these is fatal: each is surfaced as a dismissible notice at the
/// register and leaves the cart exactly as it was.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Not enough stock to add or raise a line, and the store does not
    /// allow negative stock.
    #[error("Estoque insuficiente para \"{nome}\": disponível {disponivel}")]
    InsufficientStock { nome: String, disponivel: i64 },

    /// The referenced product has no line in the cart.
    #[error("Produto {0} não está no carrinho")]
    LineNotFound(String),

    /// The shared discount password did not match.
    ///
    /// This is a shared PIN, not per-user authorization; any cashier who
    /// knows it may apply any discount.
    #[error("Senha para desconto inválida")]
    IncorrectDiscountPassword,

    /// Cart already holds the maximum number of distinct lines.
    #[error("O carrinho não pode ter mais de {max} itens")]
    CartTooLarge { max: usize },

    /// Requested quantity exceeds the per-line maximum.
    #[error("Quantidade {requested} excede o máximo permitido ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validação: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before any persistence call.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} é obrigatório")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} deve ter no máximo {max} caracteres")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} deve ser maior que zero")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} não pode ser negativo")]
    MustNotBeNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} deve estar entre {min} e {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. malformed UUID).
    #[error("{field} tem formato inválido: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
