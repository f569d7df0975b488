//! # Stock Movement Repository
//!
//! Append-only stock ledger.
//!
//! Movements record what happened (`entrada` / `saida` and a quantity);
//! the product's `estoque_atual` running total is adjusted separately via
//! [`crate::repository::product::ProductRepository::adjust_stock`]. The
//! two writes are not atomic, so a reconciliation report can disagree
//! with the running total after a crash; the ledger is the audit trail,
//! not the source of truth for availability.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::changes::{ChangeFeed, ChangeKind};
use crate::error::DbResult;
use seestore_core::{MovementKind, StockMovement};

const MOVEMENT_COLUMNS: &str = "id, produto_id, tipo_movimentacao, quantidade, \
     valor_unitario_centavos, valor_total_centavos, observacao, created_at";

/// Repository for the stock movement ledger.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
    changes: ChangeFeed,
}

impl StockRepository {
    pub fn new(pool: SqlitePool, changes: ChangeFeed) -> Self {
        StockRepository { pool, changes }
    }

    /// Appends a movement to the ledger.
    pub async fn record(
        &self,
        produto_id: &str,
        tipo: MovementKind,
        quantidade: i64,
        valor_unitario_centavos: Option<i64>,
        observacao: Option<&str>,
    ) -> DbResult<StockMovement> {
        let movement = StockMovement {
            id: Uuid::new_v4().to_string(),
            produto_id: produto_id.to_string(),
            tipo_movimentacao: tipo,
            quantidade,
            valor_unitario_centavos,
            valor_total_centavos: valor_unitario_centavos.map(|v| v * quantidade),
            observacao: observacao.map(|o| o.to_string()),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO movimentacao_estoque (id, produto_id, tipo_movimentacao, \
             quantidade, valor_unitario_centavos, valor_total_centavos, observacao, \
             created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&movement.id)
        .bind(&movement.produto_id)
        .bind(movement.tipo_movimentacao)
        .bind(movement.quantidade)
        .bind(movement.valor_unitario_centavos)
        .bind(movement.valor_total_centavos)
        .bind(&movement.observacao)
        .bind(movement.created_at)
        .execute(&self.pool)
        .await?;

        debug!(
            produto_id = %movement.produto_id,
            tipo = ?movement.tipo_movimentacao,
            quantidade = movement.quantidade,
            "Stock movement recorded"
        );
        self.changes
            .publish("movimentacao_estoque", ChangeKind::Insert, &movement.id);
        Ok(movement)
    }

    /// Lists a product's movements, newest first.
    pub async fn list_for_product(
        &self,
        produto_id: &str,
        limit: u32,
    ) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movimentacao_estoque \
             WHERE produto_id = ?1 \
             ORDER BY created_at DESC, rowid DESC \
             LIMIT ?2"
        ))
        .bind(produto_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_record_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .create("Café", "1001", None, 250, 500, 10, 0, "UN", false)
            .await
            .unwrap();

        db.stock()
            .record(&product.id, MovementKind::Entrada, 10, Some(250), None)
            .await
            .unwrap();
        db.stock()
            .record(
                &product.id,
                MovementKind::Saida,
                2,
                None,
                Some("Venda nº 000001"),
            )
            .await
            .unwrap();

        let movements = db.stock().list_for_product(&product.id, 10).await.unwrap();
        assert_eq!(movements.len(), 2);
        assert_eq!(movements[0].tipo_movimentacao, MovementKind::Saida);
        assert_eq!(movements[0].observacao.as_deref(), Some("Venda nº 000001"));
        assert_eq!(movements[1].valor_total_centavos, Some(2500));
    }

    #[tokio::test]
    async fn test_ledger_rejects_unknown_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .stock()
            .record("ghost", MovementKind::Entrada, 1, None, None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            crate::error::DbError::ForeignKeyViolation { .. }
        ));
    }
}
