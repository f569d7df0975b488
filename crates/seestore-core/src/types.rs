//! # Domain Types
//!
//! Core domain types used throughout seeStore.
//!
//! ## Naming
//! Struct and enum names are English; field names mirror the Portuguese
//! column names of the store schema (`nome`, `codigo_interno`,
//! `estoque_atual`, ...) so rows map onto these records without renaming
//! and the web client keeps the vocabulary it already uses.
//!
//! ## Dual-Key Identity Pattern
//! Entities carry:
//! - `id`: UUID v4, immutable, used for relations
//! - a business identifier where one exists (`codigo_interno` on products,
//!   `numero_venda` on sales) that humans read on screens and receipts
//!
//! All monetary fields are integer centavos (`*_centavos: i64`); accessor
//! methods expose them as [`Money`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the cashier and on receipts.
    pub nome: String,

    /// Internal code typed or scanned at the register.
    pub codigo_interno: String,

    /// Barcode (EAN-13 etc.), when the product has one.
    pub codigo_barras: Option<String>,

    /// Unit cost in centavos.
    pub preco_custo_centavos: i64,

    /// Unit sale price in centavos.
    pub preco_venda_centavos: i64,

    /// Current stock level. May go negative only when the store setting
    /// `estoque_permitir_negativo` allows it.
    pub estoque_atual: i64,

    /// Threshold below which the product shows as low stock.
    pub estoque_minimo: i64,

    /// Unit of measure ("UN", "KG", ...).
    pub unidade_medida: String,

    /// Soft-delete flag.
    pub ativo: bool,

    /// True for products synthesized at the register for uncatalogued
    /// sales; filtered out of normal catalog views.
    pub produto_temporario: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as Money.
    #[inline]
    pub fn preco_venda(&self) -> Money {
        Money::from_centavos(self.preco_venda_centavos)
    }

    /// Returns the cost price as Money.
    #[inline]
    pub fn preco_custo(&self) -> Money {
        Money::from_centavos(self.preco_custo_centavos)
    }

    /// Whether the product is at or below its minimum stock threshold.
    #[inline]
    pub fn estoque_baixo(&self) -> bool {
        self.estoque_atual <= self.estoque_minimo
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A store customer, optionally associated with a sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub nome: String,
    pub cpf: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub ativo: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
///
/// Wire values match the `forma_pagamento` column: `dinheiro`,
/// `cartao_debito`, `cartao_credito`, `pix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Dinheiro,
    CartaoDebito,
    CartaoCredito,
    Pix,
}

impl PaymentMethod {
    /// Upper-case label printed on receipts.
    pub fn receipt_label(&self) -> &'static str {
        match self {
            PaymentMethod::Dinheiro => "DINHEIRO",
            PaymentMethod::CartaoDebito => "CARTÃO DE DÉBITO",
            PaymentMethod::CartaoCredito => "CARTÃO DE CRÉDITO",
            PaymentMethod::Pix => "PIX",
        }
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale transaction.
///
/// Sales are created already finalized; cancellation is the only later
/// status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Finalizada,
    Cancelada,
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Finalizada
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A persisted sale header.
///
/// Immutable after creation except for `status`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// Sequential human-readable number, assigned by the database.
    pub numero_venda: i64,
    pub cliente_id: Option<String>,
    /// Cashier who registered the sale.
    pub usuario_id: String,
    /// Sum of quantidade × preco_unitario across line items.
    pub subtotal_centavos: i64,
    /// Sum of per-item discounts.
    pub desconto_centavos: i64,
    /// Sum of line subtotals (subtotal − desconto).
    pub total_centavos: i64,
    pub forma_pagamento: PaymentMethod,
    pub status: SaleStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_centavos(self.subtotal_centavos)
    }

    #[inline]
    pub fn desconto(&self) -> Money {
        Money::from_centavos(self.desconto_centavos)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_centavos(self.total_centavos)
    }
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// A line item of a persisted sale.
/// Uses the snapshot pattern: the unit price is the price at time of sale,
/// never re-read from the catalog. Created once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleLineItem {
    pub id: String,
    pub venda_id: String,
    pub produto_id: String,
    pub quantidade: i64,
    /// Unit price in centavos at time of sale (frozen).
    pub preco_unitario_centavos: i64,
    /// Discount applied to this line.
    pub desconto_item_centavos: i64,
    /// quantidade × preco_unitario − desconto_item.
    pub subtotal_centavos: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleLineItem {
    #[inline]
    pub fn preco_unitario(&self) -> Money {
        Money::from_centavos(self.preco_unitario_centavos)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_centavos(self.subtotal_centavos)
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// Direction of a stock ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Entrada,
    Saida,
}

/// An append-only stock ledger entry.
///
/// The product's `estoque_atual` is a separately maintained running total;
/// keeping the two consistent is the writer's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockMovement {
    pub id: String,
    pub produto_id: String,
    pub tipo_movimentacao: MovementKind,
    pub quantidade: i64,
    pub valor_unitario_centavos: Option<i64>,
    pub valor_total_centavos: Option<i64>,
    pub observacao: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Company Profile
// =============================================================================

/// The store's own identity, printed at the top of every receipt.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CompanyProfile {
    pub id: String,
    pub nome: String,
    pub cnpj: Option<String>,
    pub endereco: Option<String>,
    pub telefone: Option<String>,
}

impl Default for CompanyProfile {
    /// Fallback used when the `empresa` table has no row yet.
    fn default() -> Self {
        CompanyProfile {
            id: String::new(),
            nome: "seeStore".to_string(),
            cnpj: None,
            endereco: None,
            telefone: None,
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A store user (cashier, manager, admin).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: String,
    pub email: String,
    pub nome: String,
    /// Role as a plain string ("admin", "caixa", ...); access control
    /// beyond the login gate is out of scope here.
    pub tipo_usuario: String,
    pub username: Option<String>,
    pub matricula: Option<String>,
    /// Argon2 password hash. Never serialized out of the process.
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub senha_hash: String,
    pub ativo: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_wire_values() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CartaoDebito).unwrap(),
            "\"cartao_debito\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Pix).unwrap(),
            "\"pix\""
        );
    }

    #[test]
    fn test_payment_method_receipt_labels() {
        assert_eq!(PaymentMethod::Dinheiro.receipt_label(), "DINHEIRO");
        assert_eq!(
            PaymentMethod::CartaoCredito.receipt_label(),
            "CARTÃO DE CRÉDITO"
        );
    }

    #[test]
    fn test_sale_status_default() {
        assert_eq!(SaleStatus::default(), SaleStatus::Finalizada);
    }

    #[test]
    fn test_product_low_stock() {
        let mut product = Product {
            id: "1".into(),
            nome: "Café".into(),
            codigo_interno: "100".into(),
            codigo_barras: None,
            preco_custo_centavos: 300,
            preco_venda_centavos: 500,
            estoque_atual: 5,
            estoque_minimo: 5,
            unidade_medida: "UN".into(),
            ativo: true,
            produto_temporario: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(product.estoque_baixo());
        product.estoque_atual = 6;
        assert!(!product.estoque_baixo());
    }

    #[test]
    fn test_user_password_hash_not_serialized() {
        let user = User {
            id: "u1".into(),
            email: "caixa@seestore.com".into(),
            nome: "Caixa".into(),
            tipo_usuario: "caixa".into(),
            username: None,
            matricula: None,
            senha_hash: "$argon2id$secret".into(),
            ativo: true,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("senha_hash"));
    }
}
