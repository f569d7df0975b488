//! # Product Repository
//!
//! Catalog access for the register.
//!
//! ## Lookup vs Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two Read Paths                                       │
//! │                                                                         │
//! │  Scanner / code field ──► find_by_code()                               │
//! │     exact match on codigo_interno OR codigo_barras, active only        │
//! │                                                                         │
//! │  Search box ──► search()                                                │
//! │     case-insensitive substring over nome, codigo_interno,              │
//! │     codigo_barras; active, non-temporary products only                 │
//! │     (ad-hoc items from past sales never resurface in search)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::changes::{ChangeFeed, ChangeKind};
use crate::error::{DbError, DbResult};
use seestore_core::Product;

/// Every read goes through the same column list so FromRow decoding
/// stays in one place.
const PRODUCT_COLUMNS: &str = "id, nome, codigo_interno, codigo_barras, \
     preco_custo_centavos, preco_venda_centavos, estoque_atual, estoque_minimo, \
     unidade_medida, ativo, produto_temporario, created_at, updated_at";

/// Repository for catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let hit = repo.find_by_code("7891000100103").await?;
/// let list = repo.search("café", 20).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    changes: ChangeFeed,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool, changes: ChangeFeed) -> Self {
        ProductRepository { pool, changes }
    }

    /// Exact lookup by internal code or barcode, active products only.
    ///
    /// Returns `Ok(None)` when nothing matches; the register shows its own
    /// "produto não encontrado" message for that case.
    pub async fn find_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }

        debug!(code = %code, "Looking up product by code");

        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM produtos \
             WHERE (codigo_interno = ?1 OR codigo_barras = ?1) AND ativo = 1 \
             LIMIT 1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Case-insensitive substring search over name, internal code and
    /// barcode. Temporary (ad-hoc) products are excluded so they never
    /// resurface after the sale that created them.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit, "Searching products");

        if query.is_empty() {
            return self.list_active(limit).await;
        }

        // LIKE is case-insensitive for ASCII in SQLite; the catalog scale
        // of a single store does not warrant FTS here.
        let pattern = format!("%{}%", query);

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM produtos \
             WHERE (nome LIKE ?1 OR codigo_interno LIKE ?1 OR codigo_barras LIKE ?1) \
             AND ativo = 1 AND produto_temporario = 0 \
             ORDER BY nome \
             LIMIT ?2"
        ))
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists active, non-temporary products ordered by name.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM produtos \
             WHERE ativo = 1 AND produto_temporario = 0 \
             ORDER BY nome \
             LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Total number of products, including inactive and temporary.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM produtos")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Fetches a product by id, including inactive and temporary ones.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM produtos WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("produto", id))
    }

    /// Inserts a product. The id and timestamps must already be set
    /// (see [`ProductRepository::create`] for the usual path).
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO produtos (id, nome, codigo_interno, codigo_barras, \
             preco_custo_centavos, preco_venda_centavos, estoque_atual, estoque_minimo, \
             unidade_medida, ativo, produto_temporario, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(&product.id)
        .bind(&product.nome)
        .bind(&product.codigo_interno)
        .bind(&product.codigo_barras)
        .bind(product.preco_custo_centavos)
        .bind(product.preco_venda_centavos)
        .bind(product.estoque_atual)
        .bind(product.estoque_minimo)
        .bind(&product.unidade_medida)
        .bind(product.ativo)
        .bind(product.produto_temporario)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(id = %product.id, nome = %product.nome, "Product inserted");
        self.changes.publish("produtos", ChangeKind::Insert, &product.id);
        Ok(())
    }

    /// Creates a product from the given fields, generating id and
    /// timestamps, and returns the stored record.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        nome: &str,
        codigo_interno: &str,
        codigo_barras: Option<&str>,
        preco_custo_centavos: i64,
        preco_venda_centavos: i64,
        estoque_atual: i64,
        estoque_minimo: i64,
        unidade_medida: &str,
        produto_temporario: bool,
    ) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            nome: nome.to_string(),
            codigo_interno: codigo_interno.to_string(),
            codigo_barras: codigo_barras.map(|c| c.to_string()),
            preco_custo_centavos,
            preco_venda_centavos,
            estoque_atual,
            estoque_minimo,
            unidade_medida: unidade_medida.to_string(),
            ativo: true,
            produto_temporario,
            created_at: now,
            updated_at: now,
        };

        self.insert(&product).await?;
        Ok(product)
    }

    /// Updates the mutable fields of a product.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE produtos SET nome = ?2, codigo_barras = ?3, \
             preco_custo_centavos = ?4, preco_venda_centavos = ?5, \
             estoque_atual = ?6, estoque_minimo = ?7, unidade_medida = ?8, \
             ativo = ?9, updated_at = ?10 \
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.nome)
        .bind(&product.codigo_barras)
        .bind(product.preco_custo_centavos)
        .bind(product.preco_venda_centavos)
        .bind(product.estoque_atual)
        .bind(product.estoque_minimo)
        .bind(&product.unidade_medida)
        .bind(product.ativo)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("produto", &product.id));
        }

        self.changes.publish("produtos", ChangeKind::Update, &product.id);
        Ok(())
    }

    /// Adjusts stock by a signed delta (negative = deduction).
    ///
    /// The caller decides whether negative stock is acceptable; this method
    /// applies the arithmetic unconditionally and records nothing in the
    /// ledger (see [`crate::repository::stock::StockRepository`] for that).
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<i64> {
        let result = sqlx::query(
            "UPDATE produtos SET estoque_atual = estoque_atual + ?2, updated_at = ?3 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(delta)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("produto", id));
        }

        let estoque: i64 =
            sqlx::query_scalar("SELECT estoque_atual FROM produtos WHERE id = ?1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        debug!(id = %id, delta, estoque, "Stock adjusted");
        self.changes.publish("produtos", ChangeKind::Update, id);
        Ok(estoque)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, nome: &str, codigo: &str, barras: Option<&str>) {
        db.products()
            .create(nome, codigo, barras, 250, 500, 10, 2, "UN", false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_find_by_internal_code_and_barcode() {
        let db = test_db().await;
        seed_product(&db, "Café Torrado 500g", "1001", Some("7891000100103")).await;

        let by_code = db.products().find_by_code("1001").await.unwrap().unwrap();
        assert_eq!(by_code.nome, "Café Torrado 500g");

        let by_barcode = db
            .products()
            .find_by_code("7891000100103")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_barcode.id, by_code.id);

        assert!(db.products().find_by_code("9999").await.unwrap().is_none());
        assert!(db.products().find_by_code("  ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_code_skips_inactive() {
        let db = test_db().await;
        seed_product(&db, "Produto Desativado", "2001", None).await;

        let mut product = db.products().find_by_code("2001").await.unwrap().unwrap();
        product.ativo = false;
        db.products().update(&product).await.unwrap();

        assert!(db.products().find_by_code("2001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_matches_name_substring() {
        let db = test_db().await;
        seed_product(&db, "Café Torrado 500g", "1001", None).await;
        seed_product(&db, "Açúcar Cristal 1kg", "1002", None).await;

        let hits = db.products().search("torrado", 20).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].codigo_interno, "1001");

        // Empty query lists the active catalog.
        let all = db.products().search("", 20).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_search_excludes_temporary_products() {
        let db = test_db().await;
        db.products()
            .create("PRODUTO AVULSO", "54321", None, 0, 700, 1, 0, "UN", true)
            .await
            .unwrap();

        assert!(db.products().search("AVULSO", 20).await.unwrap().is_empty());

        // But exact code lookup still finds it while the sale is open.
        assert!(db
            .products()
            .find_by_code("54321")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_duplicate_internal_code_rejected() {
        let db = test_db().await;
        seed_product(&db, "Primeiro", "1001", None).await;

        let err = db
            .products()
            .create("Segundo", "1001", None, 0, 100, 0, 0, "UN", false)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            crate::error::DbError::UniqueViolation { .. }
        ));
    }

    #[tokio::test]
    async fn test_adjust_stock() {
        let db = test_db().await;
        seed_product(&db, "Café", "1001", None).await;
        let product = db.products().find_by_code("1001").await.unwrap().unwrap();

        let estoque = db.products().adjust_stock(&product.id, -3).await.unwrap();
        assert_eq!(estoque, 7);

        // Deduction below zero is applied as-is; policy lives upstream.
        let estoque = db.products().adjust_stock(&product.id, -10).await.unwrap();
        assert_eq!(estoque, -3);
    }

    #[tokio::test]
    async fn test_insert_publishes_change() {
        let db = test_db().await;
        let mut sub = db.changes().subscribe("produtos");

        seed_product(&db, "Café", "1001", None).await;

        let change = sub.next().await.unwrap();
        assert_eq!(change.table, "produtos");
    }
}
