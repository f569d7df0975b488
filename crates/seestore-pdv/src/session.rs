//! # Checkout Session
//!
//! State of one register between login and logout: the cart, the selected
//! customer and payment method, and the settings snapshot the session
//! operates under.
//!
//! ## Thread Safety
//! The session is shared by concurrent UI calls, so mutable state lives
//! behind std `Mutex`es. Locks are held only for the synchronous cart
//! mutation, never across an `.await`.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Session Lifecycle                           │
//! │                                                                         │
//! │  operator logs in                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CheckoutSession::start(db, cashier)                                   │
//! │       │  loads the settings snapshot (stock policy, discount           │
//! │       │  password, customer requirement)                               │
//! │       ▼                                                                 │
//! │  add_by_code / search + add_product / set_quantity / remove            │
//! │  apply_discount (password-gated)                                       │
//! │  register_adhoc (item not in catalog)                                  │
//! │  select_customer / select_payment                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  finalize() ──► persisted sale + receipt text, cart reset              │
//! │                                                                         │
//! │  Abandoning the session loses the cart; nothing is persisted before    │
//! │  finalize().                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::AtomicBool;
use std::sync::Mutex;

use tracing::{debug, info};

use seestore_core::{Cart, CartLine, Customer, DiscountGate, Money, PaymentMethod, Product};
use seestore_db::{AuthUser, Database, RegisterSettings};

use crate::adhoc::TemporaryProductRegistrar;
use crate::catalog::Catalog;
use crate::error::{CheckoutError, CheckoutResult, ErrorCode};

/// Totals snapshot for the register display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: Money,
    pub desconto: Money,
    pub total: Money,
    pub quantidade_itens: i64,
}

/// One register's in-progress sale.
pub struct CheckoutSession {
    pub(crate) db: Database,
    pub(crate) settings: RegisterSettings,
    pub(crate) cashier: AuthUser,
    pub(crate) cart: Mutex<Cart>,
    pub(crate) customer: Mutex<Option<Customer>>,
    pub(crate) payment: Mutex<Option<PaymentMethod>>,

    /// Double-click guard around finalize().
    pub(crate) finalizing: AtomicBool,
}

impl CheckoutSession {
    /// Opens a session for a logged-in cashier, loading the settings
    /// snapshot it will operate under.
    pub async fn start(db: Database, cashier: AuthUser) -> CheckoutResult<Self> {
        let settings = RegisterSettings::load(&db.settings()).await?;

        info!(
            cashier = %cashier.nome,
            estoque_permitir_negativo = settings.estoque_permitir_negativo,
            baixa_estoque_na_venda = settings.baixa_estoque_na_venda,
            "Checkout session started"
        );

        Ok(CheckoutSession {
            db,
            settings,
            cashier,
            cart: Mutex::new(Cart::new()),
            customer: Mutex::new(None),
            payment: Mutex::new(None),
            finalizing: AtomicBool::new(false),
        })
    }

    /// The catalog facade bound to this session's database.
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.db.clone())
    }

    /// Looks a product up by code and adds one unit to the cart.
    ///
    /// `Ok(None)` means the code matched nothing; the register offers the
    /// ad-hoc registration dialog in that case.
    pub async fn add_by_code(&self, code: &str) -> CheckoutResult<Option<Product>> {
        let Some(product) = self.db.products().find_by_code(code).await? else {
            return Ok(None);
        };

        self.add_product(&product)?;
        Ok(Some(product))
    }

    /// Adds one unit of an already-fetched product.
    pub fn add_product(&self, product: &Product) -> CheckoutResult<()> {
        let mut cart = self.cart.lock().unwrap();
        cart.add_unit(product, self.settings.estoque_permitir_negativo)?;
        debug!(produto = %product.nome, "Unit added to cart");
        Ok(())
    }

    /// Sets a line's quantity; 0 or less removes the line.
    ///
    /// The stock ceiling is the catalog's current figure, re-read here so
    /// a concurrent stock change is respected.
    pub async fn set_quantity(&self, produto_id: &str, quantidade: i64) -> CheckoutResult<()> {
        let stock_limit = if self.settings.estoque_permitir_negativo || quantidade <= 0 {
            None
        } else {
            Some(self.db.products().get_by_id(produto_id).await?.estoque_atual)
        };

        let mut cart = self.cart.lock().unwrap();
        cart.set_quantity(produto_id, quantidade, stock_limit)?;
        Ok(())
    }

    /// Removes a line unconditionally.
    pub fn remove(&self, produto_id: &str) {
        self.cart.lock().unwrap().remove(produto_id);
    }

    /// Applies a per-item discount after checking the shared password.
    pub fn apply_discount(
        &self,
        produto_id: &str,
        desconto: Money,
        senha: &str,
    ) -> CheckoutResult<()> {
        let gate = DiscountGate::new(self.settings.senha_desconto.clone());
        let mut cart = self.cart.lock().unwrap();
        gate.apply(&mut cart, produto_id, desconto, senha)?;
        info!(produto_id = %produto_id, desconto = %desconto, "Discount applied");
        Ok(())
    }

    /// Registers an ad-hoc product and adds it to the cart at the given
    /// quantity. The cost price is optional and defaults to zero.
    pub async fn register_adhoc(
        &self,
        nome: &str,
        preco_venda: Money,
        preco_custo: Option<Money>,
        quantidade: i64,
    ) -> CheckoutResult<Product> {
        let registrar = TemporaryProductRegistrar::new(self.db.clone());
        let product = registrar.register(nome, preco_venda, preco_custo).await?;

        let mut cart = self.cart.lock().unwrap();
        cart.add_line(&product, quantidade)?;
        Ok(product)
    }

    /// Attaches a customer to the open sale (or detaches with `None`).
    pub fn select_customer(&self, customer: Option<Customer>) {
        *self.customer.lock().unwrap() = customer;
    }

    /// Creates a customer on the spot and attaches them to the open sale.
    pub async fn quick_create_customer(
        &self,
        nome: &str,
        cpf: Option<&str>,
        telefone: Option<&str>,
    ) -> CheckoutResult<Customer> {
        seestore_core::validation::validate_customer_name(nome)
            .map_err(seestore_core::CoreError::from)?;

        let customer = self.db.customers().quick_create(nome, cpf, telefone).await?;
        self.select_customer(Some(customer.clone()));
        Ok(customer)
    }

    /// Selects the payment method.
    pub fn select_payment(&self, payment: PaymentMethod) {
        *self.payment.lock().unwrap() = Some(payment);
    }

    /// Current cart lines, cloned for display.
    pub fn lines(&self) -> Vec<CartLine> {
        self.cart.lock().unwrap().lines().to_vec()
    }

    /// Current totals for the register display.
    pub fn totals(&self) -> CartTotals {
        let cart = self.cart.lock().unwrap();
        CartTotals {
            subtotal: cart.subtotal(),
            desconto: cart.total_discount(),
            total: cart.total(),
            quantidade_itens: cart.total_quantity(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cart.lock().unwrap().is_empty()
    }

    /// The settings snapshot this session runs under.
    pub fn settings(&self) -> &RegisterSettings {
        &self.settings
    }

    /// Clears the cart and selections without persisting anything.
    pub fn reset(&self) {
        self.cart.lock().unwrap().clear();
        *self.customer.lock().unwrap() = None;
        *self.payment.lock().unwrap() = None;
    }

    /// Finalization preconditions shared with [`finalize`](Self::finalize).
    pub(crate) fn check_preconditions(&self) -> CheckoutResult<()> {
        if self.cart.lock().unwrap().is_empty() {
            return Err(CheckoutError::cart("Carrinho vazio"));
        }
        if self.payment.lock().unwrap().is_none() {
            return Err(CheckoutError::sale("Selecione a forma de pagamento"));
        }
        if !self.settings.venda_sem_cadastro && self.customer.lock().unwrap().is_none() {
            return Err(CheckoutError::new(
                ErrorCode::SaleError,
                "Cliente obrigatório para finalizar a venda",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use seestore_db::DbConfig;

    pub(crate) fn test_cashier() -> AuthUser {
        AuthUser {
            id: "user-1".to_string(),
            email: "caixa@loja.com".to_string(),
            nome: "Operador de Caixa".to_string(),
            tipo_usuario: "caixa".to_string(),
        }
    }

    async fn session_with_product(estoque: i64) -> (CheckoutSession, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .create("Café Torrado 500g", "1001", None, 250, 500, estoque, 0, "UN", false)
            .await
            .unwrap();
        let session = CheckoutSession::start(db, test_cashier()).await.unwrap();
        (session, product)
    }

    #[tokio::test]
    async fn test_add_by_code_and_totals() {
        let (session, _) = session_with_product(10).await;

        let hit = session.add_by_code("1001").await.unwrap();
        assert!(hit.is_some());
        session.add_by_code("1001").await.unwrap();

        let totals = session.totals();
        assert_eq!(totals.subtotal.centavos(), 1000);
        assert_eq!(totals.total.centavos(), 1000);
        assert_eq!(totals.quantidade_itens, 2);

        assert!(session.add_by_code("9999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stock_gate_follows_session_settings() {
        let (session, product) = session_with_product(1).await;

        session.add_product(&product).unwrap();
        let err = session.add_product(&product).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        // With negative stock allowed, the same cart keeps growing.
        let db = session.db.clone();
        db.settings()
            .set_bool(
                seestore_db::repository::settings::KEY_ESTOQUE_PERMITIR_NEGATIVO,
                true,
            )
            .await
            .unwrap();
        let relaxed = CheckoutSession::start(db, test_cashier()).await.unwrap();
        relaxed.add_product(&product).unwrap();
        relaxed.add_product(&product).unwrap();
        relaxed.add_product(&product).unwrap();
        assert_eq!(relaxed.totals().quantidade_itens, 3);
    }

    #[tokio::test]
    async fn test_set_quantity_zero_removes() {
        let (session, product) = session_with_product(10).await;
        session.add_product(&product).unwrap();

        session.set_quantity(&product.id, 0).await.unwrap();
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_discount_requires_password() {
        let (session, product) = session_with_product(10).await;
        session.add_product(&product).unwrap();

        let err = session
            .apply_discount(&product.id, Money::from_centavos(100), "errada")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DiscountDenied);
        assert_eq!(session.totals().total.centavos(), 500);

        session
            .apply_discount(&product.id, Money::from_centavos(100), "abacate")
            .unwrap();
        assert_eq!(session.totals().total.centavos(), 400);
    }

    #[tokio::test]
    async fn test_quick_create_customer_attaches() {
        let (session, _) = session_with_product(10).await;

        let customer = session
            .quick_create_customer("maria da silva", None, None)
            .await
            .unwrap();

        assert_eq!(customer.nome, "MARIA DA SILVA");
        assert!(session.customer.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_preconditions() {
        let (session, product) = session_with_product(10).await;

        let err = session.check_preconditions().unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        session.add_product(&product).unwrap();
        let err = session.check_preconditions().unwrap_err();
        assert_eq!(err.code, ErrorCode::SaleError);

        session.select_payment(PaymentMethod::Dinheiro);
        session.check_preconditions().unwrap();
    }
}
