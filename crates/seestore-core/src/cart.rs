//! # Cart Accumulator
//!
//! In-memory state of an in-progress sale at the register.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Operations                                    │
//! │                                                                         │
//! │  Register Action            Cart Change                                 │
//! │  ───────────────            ───────────                                 │
//! │  Scan / pick product ─────► add_unit()        (stock-gated)            │
//! │  Change quantity ─────────► set_quantity()    (0 removes the line)     │
//! │  Remove line ─────────────► remove()          (unconditional)          │
//! │  Apply item discount ─────► DiscountGate::apply()  (password-gated)    │
//! │  Finalize sale ───────────► snapshot() + clear()                       │
//! │                                                                         │
//! │  Every mutation recomputes the affected line's subtotal; totals are    │
//! │  always derived from the lines, never cached.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Semantics
//! Stock checks compare against the live catalog figure passed in by the
//! caller. There is no reservation: two registers selling the same product
//! would race, which is accepted for this single-register design.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_discount_centavos, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One product entry in the in-progress sale.
///
/// The unit price is frozen at add time: a catalog price change after the
/// product entered the cart does not reprice the line.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub produto_id: String,

    /// Name at time of adding (frozen), printed on the receipt.
    pub nome: String,

    /// Internal code at time of adding (frozen).
    pub codigo_interno: String,

    /// Unit price in centavos at time of adding (frozen).
    pub preco_venda_centavos: i64,

    /// Quantity, always ≥ 1 (a quantity of 0 removes the line instead).
    pub quantidade: i64,

    /// Accumulated per-item discount in centavos, ≥ 0.
    pub desconto_item_centavos: i64,

    /// quantidade × preco − desconto. Recomputed on every mutation,
    /// never independently assigned.
    pub subtotal_centavos: i64,

    /// Carried so the finalizer can tell ad-hoc items apart.
    pub produto_temporario: bool,
}

impl CartLine {
    /// Creates a line from a catalog product at the given quantity.
    fn from_product(product: &Product, quantidade: i64) -> Self {
        let mut line = CartLine {
            produto_id: product.id.clone(),
            nome: product.nome.clone(),
            codigo_interno: product.codigo_interno.clone(),
            preco_venda_centavos: product.preco_venda_centavos,
            quantidade,
            desconto_item_centavos: 0,
            subtotal_centavos: 0,
            produto_temporario: product.produto_temporario,
        };
        line.recompute();
        line
    }

    /// Re-derives the subtotal from quantity, price and discount.
    #[inline]
    fn recompute(&mut self) {
        self.subtotal_centavos =
            self.preco_venda_centavos * self.quantidade - self.desconto_item_centavos;
    }

    #[inline]
    pub fn preco_venda(&self) -> Money {
        Money::from_centavos(self.preco_venda_centavos)
    }

    #[inline]
    pub fn desconto_item(&self) -> Money {
        Money::from_centavos(self.desconto_item_centavos)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_centavos(self.subtotal_centavos)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The register's cart: an ordered collection of lines, unique per product.
///
/// ## Invariants
/// - At most [`MAX_CART_ITEMS`] distinct lines
/// - Quantity per line between 1 and [`MAX_ITEM_QUANTITY`]
/// - Line subtotals are recomputed on every mutation
///
/// ## Lifecycle
/// Created empty when the register opens; mutated by add / set_quantity /
/// remove / discount; cleared on successful finalization; abandoned with
/// no persistence when the operator navigates away.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,

    /// When the cart was created or last cleared.
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds one unit of a catalog product.
    ///
    /// ## Behaviour
    /// - Stock gate: when negative stock is disallowed, a product with
    ///   `estoque_atual <= 0` is rejected outright, and raising an existing
    ///   line is rejected once its quantity reaches the catalog stock
    ///   figure. When negative stock is allowed, no gate applies.
    /// - Product already in cart: quantity + 1, subtotal recomputed.
    /// - Otherwise: new line with quantity 1, subtotal = price, discount 0.
    pub fn add_unit(&mut self, product: &Product, allow_negative_stock: bool) -> CoreResult<()> {
        if !allow_negative_stock && product.estoque_atual <= 0 {
            return Err(CoreError::InsufficientStock {
                nome: product.nome.clone(),
                disponivel: product.estoque_atual,
            });
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.produto_id == product.id) {
            if !allow_negative_stock && line.quantidade >= product.estoque_atual {
                return Err(CoreError::InsufficientStock {
                    nome: product.nome.clone(),
                    disponivel: product.estoque_atual,
                });
            }
            if line.quantidade + 1 > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: line.quantidade + 1,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantidade += 1;
            line.recompute();
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.lines.push(CartLine::from_product(product, 1));
        Ok(())
    }

    /// Inserts a new line at the requested quantity.
    ///
    /// Used by the ad-hoc registrar, whose freshly created product cannot
    /// already be in the cart and bypasses the stock gate (its stock was
    /// just synthesized).
    pub fn add_line(&mut self, product: &Product, quantidade: i64) -> CoreResult<()> {
        validate_quantity(quantidade)?;

        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.lines.push(CartLine::from_product(product, quantidade));
        Ok(())
    }

    /// Sets a line's quantity.
    ///
    /// ## Behaviour
    /// - `quantidade <= 0` removes the line (equivalent to [`Cart::remove`])
    /// - With `stock_limit = Some(s)`, quantities above `s` are rejected;
    ///   callers pass `None` when the store allows negative stock
    /// - Subtotal recomputed as price × qty − existing discount
    pub fn set_quantity(
        &mut self,
        produto_id: &str,
        quantidade: i64,
        stock_limit: Option<i64>,
    ) -> CoreResult<()> {
        if quantidade <= 0 {
            self.remove(produto_id);
            return Ok(());
        }

        if quantidade > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantidade,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.produto_id == produto_id)
            .ok_or_else(|| CoreError::LineNotFound(produto_id.to_string()))?;

        if let Some(limit) = stock_limit {
            if quantidade > limit {
                return Err(CoreError::InsufficientStock {
                    nome: line.nome.clone(),
                    disponivel: limit,
                });
            }
        }

        line.quantidade = quantidade;
        line.recompute();
        Ok(())
    }

    /// Removes a line unconditionally. Removing an absent product is a
    /// no-op, matching the register's delete button.
    pub fn remove(&mut self, produto_id: &str) {
        self.lines.retain(|l| l.produto_id != produto_id);
    }

    /// Sets a line's discount and recomputes its subtotal.
    ///
    /// The amount is not clamped to the line total: a discount larger than
    /// quantity × price produces a negative subtotal. That is the observed
    /// register behaviour and is covered by tests.
    pub fn apply_discount(&mut self, produto_id: &str, desconto: Money) -> CoreResult<()> {
        validate_discount_centavos(desconto.centavos())?;

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.produto_id == produto_id)
            .ok_or_else(|| CoreError::LineNotFound(produto_id.to_string()))?;

        line.desconto_item_centavos = desconto.centavos();
        line.recompute();
        Ok(())
    }

    /// Clears all lines, starting a fresh cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// The lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantidade).sum()
    }

    /// Sum of quantity × price across lines, before discounts.
    pub fn subtotal(&self) -> Money {
        Money::from_centavos(
            self.lines
                .iter()
                .map(|l| l.preco_venda_centavos * l.quantidade)
                .sum(),
        )
    }

    /// Sum of per-item discounts.
    pub fn total_discount(&self) -> Money {
        Money::from_centavos(self.lines.iter().map(|l| l.desconto_item_centavos).sum())
    }

    /// Grand total: sum of line subtotals. Pure, no side effects.
    pub fn total(&self) -> Money {
        Money::from_centavos(self.lines.iter().map(|l| l.subtotal_centavos).sum())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

// =============================================================================
// Discount Gate
// =============================================================================

/// Password gate in front of per-item discounts.
///
/// The secret is a fixed shared PIN loaded from store settings
/// (`pdv_senha_desconto`), compared verbatim. This is deliberately not a
/// per-user permission check; see the register documentation.
#[derive(Debug, Clone)]
pub struct DiscountGate {
    secret: String,
}

impl DiscountGate {
    pub fn new(secret: impl Into<String>) -> Self {
        DiscountGate {
            secret: secret.into(),
        }
    }

    /// Applies a discount to a cart line after checking the password.
    ///
    /// A wrong password fails with [`CoreError::IncorrectDiscountPassword`]
    /// and leaves every line untouched.
    pub fn apply(
        &self,
        cart: &mut Cart,
        produto_id: &str,
        desconto: Money,
        senha: &str,
    ) -> CoreResult<()> {
        if senha != self.secret {
            return Err(CoreError::IncorrectDiscountPassword);
        }

        cart.apply_discount(produto_id, desconto)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str, preco_centavos: i64, estoque: i64) -> Product {
        Product {
            id: id.to_string(),
            nome: format!("Produto {}", id),
            codigo_interno: format!("10{}", id),
            codigo_barras: None,
            preco_custo_centavos: preco_centavos / 2,
            preco_venda_centavos: preco_centavos,
            estoque_atual: estoque,
            estoque_minimo: 0,
            unidade_medida: "UN".to_string(),
            ativo: true,
            produto_temporario: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_unit_new_line() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 10);

        cart.add_unit(&product, false).unwrap();

        assert_eq!(cart.line_count(), 1);
        let line = &cart.lines()[0];
        assert_eq!(line.quantidade, 1);
        assert_eq!(line.subtotal_centavos, 500);
        assert_eq!(line.desconto_item_centavos, 0);
    }

    #[test]
    fn test_add_unit_same_product_increments() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 10);

        cart.add_unit(&product, false).unwrap();
        cart.add_unit(&product, false).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantidade, 2);
        assert_eq!(cart.total().centavos(), 1000);
    }

    #[test]
    fn test_add_unit_rejects_out_of_stock() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 0);

        let err = cart.add_unit(&product, false).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_unit_negative_stock_allowed() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 0);

        // With the store setting enabled the same product is accepted.
        cart.add_unit(&product, true).unwrap();
        cart.add_unit(&product, true).unwrap();
        assert_eq!(cart.lines()[0].quantidade, 2);
    }

    #[test]
    fn test_add_unit_caps_at_catalog_stock() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 2);

        cart.add_unit(&product, false).unwrap();
        cart.add_unit(&product, false).unwrap();
        let err = cart.add_unit(&product, false).unwrap_err();

        assert!(matches!(
            err,
            CoreError::InsufficientStock { disponivel: 2, .. }
        ));
        assert_eq!(cart.lines()[0].quantidade, 2);
    }

    #[test]
    fn test_set_quantity_recomputes_subtotal_keeping_discount() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 10);

        cart.add_unit(&product, false).unwrap();
        cart.apply_discount("1", Money::from_centavos(100)).unwrap();
        cart.set_quantity("1", 3, Some(10)).unwrap();

        // 3 × 500 − 100
        assert_eq!(cart.lines()[0].subtotal_centavos, 1400);
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 10);

        cart.add_unit(&product, false).unwrap();
        cart.set_quantity("1", 0, Some(10)).unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_respects_stock_limit() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 4);

        cart.add_unit(&product, false).unwrap();
        let err = cart.set_quantity("1", 5, Some(4)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock { disponivel: 4, .. }
        ));

        // No limit (negative stock allowed): anything goes.
        cart.set_quantity("1", 50, None).unwrap();
        assert_eq!(cart.lines()[0].quantidade, 50);
    }

    #[test]
    fn test_remove_is_unconditional() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 10);

        cart.add_unit(&product, false).unwrap();
        cart.remove("1");
        assert!(cart.is_empty());

        // Removing something absent is a silent no-op.
        cart.remove("ghost");
    }

    #[test]
    fn test_totals_track_every_mutation() {
        let mut cart = Cart::new();
        let coffee = test_product("1", 500, 10);
        let sugar = test_product("2", 350, 10);

        cart.add_unit(&coffee, false).unwrap();
        cart.add_unit(&coffee, false).unwrap();
        cart.add_unit(&sugar, false).unwrap();
        cart.apply_discount("1", Money::from_centavos(100)).unwrap();

        assert_eq!(cart.subtotal().centavos(), 1350);
        assert_eq!(cart.total_discount().centavos(), 100);
        assert_eq!(cart.total().centavos(), 1250);

        cart.set_quantity("2", 3, Some(10)).unwrap();
        assert_eq!(cart.subtotal().centavos(), 2050);
        assert_eq!(cart.total().centavos(), 1950);

        cart.remove("1");
        assert_eq!(cart.total().centavos(), 1050);
    }

    #[test]
    fn test_discount_gate_wrong_password_changes_nothing() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 10);
        cart.add_unit(&product, false).unwrap();

        let gate = DiscountGate::new("abacate");
        let err = gate
            .apply(&mut cart, "1", Money::from_centavos(100), "banana")
            .unwrap_err();

        assert!(matches!(err, CoreError::IncorrectDiscountPassword));
        assert_eq!(cart.lines()[0].desconto_item_centavos, 0);
        assert_eq!(cart.lines()[0].subtotal_centavos, 500);
    }

    #[test]
    fn test_discount_gate_correct_password_sets_exact_amount() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 10);
        cart.add_unit(&product, false).unwrap();
        cart.add_unit(&product, false).unwrap();

        let gate = DiscountGate::new("abacate");
        gate.apply(&mut cart, "1", Money::from_centavos(150), "abacate")
            .unwrap();

        assert_eq!(cart.lines()[0].desconto_item_centavos, 150);
        assert_eq!(cart.lines()[0].subtotal_centavos, 850);
    }

    #[test]
    fn test_discount_beyond_line_total_goes_negative() {
        // Current register behaviour: the discount is not clamped, so the
        // line subtotal can go negative. Documented, possibly unintended.
        let mut cart = Cart::new();
        let product = test_product("1", 500, 10);
        cart.add_unit(&product, false).unwrap();

        let gate = DiscountGate::new("abacate");
        gate.apply(&mut cart, "1", Money::from_centavos(700), "abacate")
            .unwrap();

        assert_eq!(cart.lines()[0].subtotal_centavos, -200);
        assert_eq!(cart.total().centavos(), -200);
    }

    #[test]
    fn test_discount_on_missing_line() {
        let mut cart = Cart::new();
        let gate = DiscountGate::new("abacate");
        let err = gate
            .apply(&mut cart, "ghost", Money::from_centavos(50), "abacate")
            .unwrap_err();
        assert!(matches!(err, CoreError::LineNotFound(_)));
    }

    #[test]
    fn test_add_line_at_requested_quantity() {
        let mut cart = Cart::new();
        let product = test_product("9", 750, 1);

        cart.add_line(&product, 3).unwrap();

        assert_eq!(cart.lines()[0].quantidade, 3);
        assert_eq!(cart.lines()[0].subtotal_centavos, 2250);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 10);
        cart.add_unit(&product, false).unwrap();

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total().centavos(), 0);
    }

    #[test]
    fn test_price_frozen_at_add_time() {
        let mut cart = Cart::new();
        let mut product = test_product("1", 500, 10);

        cart.add_unit(&product, false).unwrap();

        // Catalog price change after adding does not reprice the line.
        product.preco_venda_centavos = 900;
        cart.add_unit(&product, false).unwrap();

        assert_eq!(cart.lines()[0].preco_venda_centavos, 500);
        assert_eq!(cart.total().centavos(), 1000);
    }
}
