//! # Ad-hoc Product Registrar
//!
//! Registers an item that is not in the catalog, mid-sale, so the sale can
//! proceed without leaving the register.
//!
//! ## Registration Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              "Produto Avulso" Registration                              │
//! │                                                                         │
//! │  operator types name + price (cost is optional, defaults to zero)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate name, price and cost                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT produtos                                                        │
//! │    nome upper-cased, estoque_atual = 1, estoque_minimo = 0,            │
//! │    unidade 'UN', produto_temporario = 1, generated codigo_interno      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT movimentacao_estoque ('entrada', qty 1, valued at cost,         │
//! │    'Entrada automática - Produto temporário')                           │
//! │       │  ledger failure is logged, NOT rolled back: the product        │
//! │       │  already exists and the sale in front of the customer wins     │
//! │       ▼                                                                 │
//! │  product returned to the cart session                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Temporary products are excluded from catalog search forever after; only
//! the sale that created them references them.

use tracing::{debug, warn};

use seestore_core::validation::{
    validate_cost_price_centavos, validate_product_name, validate_sale_price_centavos,
};
use seestore_core::{CoreError, MovementKind, Money, Product};
use seestore_db::Database;

use crate::error::{CheckoutError, CheckoutResult, ErrorCode};

/// Internal codes are generated in this range, mirroring the codes a
/// human would never type for a real catalog item.
const CODE_MIN: u64 = 100;
const CODE_MAX: u64 = 100_000;

/// Attempts before giving up on a free internal code.
const CODE_ATTEMPTS: u32 = 5;

/// Ledger note attached to the automatic entry movement.
const ENTRY_NOTE: &str = "Entrada automática - Produto temporário";

/// Registers ad-hoc ("avulso") products during a sale.
#[derive(Debug, Clone)]
pub struct TemporaryProductRegistrar {
    db: Database,
}

impl TemporaryProductRegistrar {
    pub fn new(db: Database) -> Self {
        TemporaryProductRegistrar { db }
    }

    /// Creates the temporary product and its entry movement.
    ///
    /// The returned product is ready to be added to the cart; it is
    /// persisted so the sale's line item has a real product to reference.
    /// An omitted cost is stored as zero, and the entry movement is valued
    /// at that cost.
    pub async fn register(
        &self,
        nome: &str,
        preco_venda: Money,
        preco_custo: Option<Money>,
    ) -> CheckoutResult<Product> {
        validate_product_name(nome).map_err(CoreError::from)?;
        validate_sale_price_centavos(preco_venda.centavos()).map_err(CoreError::from)?;
        let preco_custo = preco_custo.unwrap_or(Money::zero());
        validate_cost_price_centavos(preco_custo.centavos()).map_err(CoreError::from)?;

        let nome = nome.trim().to_uppercase();

        // The generated code can collide with an existing one; the UNIQUE
        // index catches that and we retry with the next derived code.
        let mut last_err = None;
        let mut product = None;
        for attempt in 0..CODE_ATTEMPTS {
            let codigo = generate_internal_code(attempt);
            match self
                .db
                .products()
                .create(
                    &nome,
                    &codigo,
                    None,
                    preco_custo.centavos(),
                    preco_venda.centavos(),
                    1,
                    0,
                    "UN",
                    true,
                )
                .await
            {
                Ok(p) => {
                    product = Some(p);
                    break;
                }
                Err(e @ seestore_db::DbError::UniqueViolation { .. }) => {
                    debug!(codigo = %codigo, "Generated code already taken, retrying");
                    last_err = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }
        let Some(product) = product else {
            return Err(last_err.map(Into::into).unwrap_or_else(|| {
                CheckoutError::new(
                    ErrorCode::Internal,
                    "não foi possível gerar código interno para o produto avulso",
                )
            }));
        };

        debug!(
            id = %product.id,
            nome = %product.nome,
            codigo_interno = %product.codigo_interno,
            "Temporary product registered"
        );

        // Ledger entry for the synthesized unit of stock. Deliberately not
        // rolled back on failure: the product row already committed and the
        // open sale takes precedence over ledger completeness.
        if let Err(e) = self
            .db
            .stock()
            .record(
                &product.id,
                MovementKind::Entrada,
                1,
                Some(preco_custo.centavos()),
                Some(ENTRY_NOTE),
            )
            .await
        {
            warn!(
                produto_id = %product.id,
                error = %e,
                "Failed to record entry movement for temporary product"
            );
        }

        Ok(product)
    }
}

/// Derives a pseudo-random internal code from the clock, offset per
/// attempt so collisions resolve without a dedicated RNG.
fn generate_internal_code(attempt: u32) -> String {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default() as u64;
    let code = CODE_MIN + (nanos.wrapping_add(attempt as u64 * 7919)) % (CODE_MAX - CODE_MIN);
    code.to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
