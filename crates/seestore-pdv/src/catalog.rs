//! # Catalog Facade
//!
//! The register's two read paths into the catalog: exact code lookup for
//! the scanner field and substring search for the search box. Input
//! validation happens here so repositories only ever see clean queries.

use tracing::debug;

use seestore_core::validation::validate_search_query;
use seestore_core::Product;
use seestore_db::Database;

use crate::error::CheckoutResult;

/// Default number of rows the search box shows.
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Read-only catalog access for the register.
#[derive(Debug, Clone)]
pub struct Catalog {
    db: Database,
}

impl Catalog {
    pub fn new(db: Database) -> Self {
        Catalog { db }
    }

    /// Exact lookup by internal code or barcode.
    ///
    /// `Ok(None)` means "no such product"; the register decides whether
    /// that opens the ad-hoc registration dialog.
    pub async fn lookup(&self, code: &str) -> CheckoutResult<Option<Product>> {
        let product = self.db.products().find_by_code(code).await?;
        debug!(code = %code, found = product.is_some(), "Catalog lookup");
        Ok(product)
    }

    /// Substring search over name, internal code and barcode.
    pub async fn search(&self, query: &str) -> CheckoutResult<Vec<Product>> {
        let query = validate_search_query(query).map_err(seestore_core::CoreError::from)?;
        Ok(self
            .db
            .products()
            .search(&query, DEFAULT_SEARCH_LIMIT)
            .await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use seestore_db::DbConfig;

    #[tokio::test]
    async fn test_lookup_and_search() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
            .create("Café Torrado 500g", "1001", Some("7891000100103"), 250, 500, 10, 0, "UN", false)
            .await
            .unwrap();
        let catalog = Catalog::new(db);

        assert!(catalog.lookup("1001").await.unwrap().is_some());
        assert!(catalog.lookup("9999").await.unwrap().is_none());

        let hits = catalog.search("  torrado  ").await.unwrap();
        assert_eq!(hits.len(), 1);

        let too_long = "x".repeat(101);
        assert!(catalog.search(&too_long).await.is_err());
    }
}
