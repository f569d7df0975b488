//! # Sale Repository
//!
//! Persistence for sale headers and line items.
//!
//! ## Write Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Write Sequence                                  │
//! │                                                                         │
//! │  create_sale(header)                                                   │
//! │       │  assigns numero_venda = MAX(numero_venda) + 1                  │
//! │       ▼                                                                 │
//! │  insert_items(venda_id, items)                                         │
//! │       │  one insert per item, NOT wrapped in a transaction             │
//! │       ▼                                                                 │
//! │  done                                                                   │
//! │                                                                         │
//! │  The header and items are deliberately not atomic: a crash between     │
//! │  the two steps leaves a header without items, matching the behaviour   │
//! │  the store has operated with. A fix would wrap both in one             │
//! │  transaction; see the finalizer documentation.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::changes::{ChangeFeed, ChangeKind};
use crate::error::{DbError, DbResult};
use seestore_core::{PaymentMethod, Sale, SaleLineItem, SaleStatus};

const SALE_COLUMNS: &str = "id, numero_venda, cliente_id, usuario_id, \
     subtotal_centavos, desconto_centavos, total_centavos, forma_pagamento, \
     status, created_at";

const ITEM_COLUMNS: &str = "id, venda_id, produto_id, quantidade, \
     preco_unitario_centavos, desconto_item_centavos, subtotal_centavos, created_at";

/// Header fields for a new sale; id, number and timestamp are assigned
/// at insert time.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub cliente_id: Option<String>,
    pub usuario_id: String,
    pub subtotal_centavos: i64,
    pub desconto_centavos: i64,
    pub total_centavos: i64,
    pub forma_pagamento: PaymentMethod,
}

/// One line item for a new sale.
#[derive(Debug, Clone)]
pub struct NewSaleItem {
    pub produto_id: String,
    pub quantidade: i64,
    pub preco_unitario_centavos: i64,
    pub desconto_item_centavos: i64,
    pub subtotal_centavos: i64,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
    changes: ChangeFeed,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool, changes: ChangeFeed) -> Self {
        SaleRepository { pool, changes }
    }

    /// Inserts the sale header, assigning the sequential sale number
    /// inside the insert itself.
    ///
    /// ## Sale number
    /// `numero_venda` comes from `MAX(numero_venda) + 1` evaluated in the
    /// same statement. With one register writing sales this cannot race;
    /// the UNIQUE index turns a hypothetical collision into an error
    /// instead of a duplicate number.
    pub async fn create_sale(&self, new: NewSale) -> DbResult<Sale> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO vendas (id, numero_venda, cliente_id, usuario_id, \
             subtotal_centavos, desconto_centavos, total_centavos, forma_pagamento, \
             status, created_at) \
             VALUES (?1, (SELECT COALESCE(MAX(numero_venda), 0) + 1 FROM vendas), \
             ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&id)
        .bind(&new.cliente_id)
        .bind(&new.usuario_id)
        .bind(new.subtotal_centavos)
        .bind(new.desconto_centavos)
        .bind(new.total_centavos)
        .bind(new.forma_pagamento)
        .bind(SaleStatus::Finalizada)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let sale = self.get_by_id(&id).await?;

        debug!(
            id = %sale.id,
            numero_venda = sale.numero_venda,
            total_centavos = sale.total_centavos,
            "Sale header inserted"
        );
        self.changes.publish("vendas", ChangeKind::Insert, &sale.id);
        Ok(sale)
    }

    /// Inserts the sale's line items, one statement per item.
    ///
    /// Not transactional with the header on purpose (see module docs).
    pub async fn insert_items(&self, venda_id: &str, items: &[NewSaleItem]) -> DbResult<()> {
        let now = Utc::now();

        for item in items {
            sqlx::query(
                "INSERT INTO itens_venda (id, venda_id, produto_id, quantidade, \
                 preco_unitario_centavos, desconto_item_centavos, subtotal_centavos, \
                 created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(venda_id)
            .bind(&item.produto_id)
            .bind(item.quantidade)
            .bind(item.preco_unitario_centavos)
            .bind(item.desconto_item_centavos)
            .bind(item.subtotal_centavos)
            .bind(now)
            .execute(&self.pool)
            .await?;
        }

        debug!(venda_id = %venda_id, count = items.len(), "Sale items inserted");
        Ok(())
    }

    /// Fetches a sale header by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Sale> {
        sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM vendas WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("venda", id))
    }

    /// Fetches the line items of a sale, in insertion order.
    pub async fn get_items(&self, venda_id: &str) -> DbResult<Vec<SaleLineItem>> {
        let items = sqlx::query_as::<_, SaleLineItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM itens_venda WHERE venda_id = ?1 ORDER BY rowid"
        ))
        .bind(venda_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists the most recent sales, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM vendas ORDER BY created_at DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Marks a sale as cancelled. The items and the original totals are
    /// kept; cancellation is a status change, not a deletion.
    pub async fn cancel(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE vendas SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(SaleStatus::Cancelada)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("venda", id));
        }

        self.changes.publish("vendas", ChangeKind::Update, id);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn header(total: i64) -> NewSale {
        NewSale {
            cliente_id: None,
            usuario_id: "user-1".to_string(),
            subtotal_centavos: total,
            desconto_centavos: 0,
            total_centavos: total,
            forma_pagamento: PaymentMethod::Dinheiro,
        }
    }

    #[tokio::test]
    async fn test_sale_numbers_are_sequential() {
        let db = test_db().await;

        let first = db.sales().create_sale(header(1000)).await.unwrap();
        let second = db.sales().create_sale(header(2000)).await.unwrap();

        assert_eq!(first.numero_venda, 1);
        assert_eq!(second.numero_venda, 2);
        assert_eq!(first.status, SaleStatus::Finalizada);
    }

    #[tokio::test]
    async fn test_items_round_trip() {
        let db = test_db().await;
        let product = db
            .products()
            .create("Café", "1001", None, 250, 500, 10, 0, "UN", false)
            .await
            .unwrap();

        let sale = db.sales().create_sale(header(1000)).await.unwrap();
        db.sales()
            .insert_items(
                &sale.id,
                &[NewSaleItem {
                    produto_id: product.id.clone(),
                    quantidade: 2,
                    preco_unitario_centavos: 500,
                    desconto_item_centavos: 0,
                    subtotal_centavos: 1000,
                }],
            )
            .await
            .unwrap();

        let items = db.sales().get_items(&sale.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantidade, 2);
        assert_eq!(items[0].subtotal_centavos, 1000);
    }

    #[tokio::test]
    async fn test_cancel_keeps_items() {
        let db = test_db().await;
        let sale = db.sales().create_sale(header(500)).await.unwrap();

        db.sales().cancel(&sale.id).await.unwrap();

        let reloaded = db.sales().get_by_id(&sale.id).await.unwrap();
        assert_eq!(reloaded.status, SaleStatus::Cancelada);
        assert_eq!(reloaded.total_centavos, 500);
    }

    #[tokio::test]
    async fn test_unknown_sale_is_not_found() {
        let db = test_db().await;
        let err = db.sales().get_by_id("ghost").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
