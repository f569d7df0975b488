//! # Company Repository
//!
//! The store's own identity (`empresa` table). At most one row is expected;
//! when the table is empty the default profile keeps receipts printable.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use seestore_core::CompanyProfile;

/// Repository for the store's company profile.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

impl CompanyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CompanyRepository { pool }
    }

    /// Returns the stored profile, or the default one when the table is
    /// still empty.
    pub async fn get(&self) -> DbResult<CompanyProfile> {
        let profile = sqlx::query_as::<_, CompanyProfile>(
            "SELECT id, nome, cnpj, endereco, telefone FROM empresa LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile.unwrap_or_default())
    }

    /// Inserts or replaces the single profile row.
    pub async fn save(&self, profile: &CompanyProfile) -> DbResult<CompanyProfile> {
        let mut profile = profile.clone();
        if profile.id.is_empty() {
            profile.id = Uuid::new_v4().to_string();
        }

        sqlx::query("DELETE FROM empresa")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "INSERT INTO empresa (id, nome, cnpj, endereco, telefone) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&profile.id)
        .bind(&profile.nome)
        .bind(&profile.cnpj)
        .bind(&profile.endereco)
        .bind(&profile.telefone)
        .execute(&self.pool)
        .await?;

        debug!(nome = %profile.nome, "Company profile saved");
        Ok(profile)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use seestore_core::CompanyProfile;

    #[tokio::test]
    async fn test_default_profile_when_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let profile = db.company().get().await.unwrap();
        assert_eq!(profile.nome, "seeStore");
    }

    #[tokio::test]
    async fn test_save_replaces_single_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.company()
            .save(&CompanyProfile {
                id: String::new(),
                nome: "Mercado Bom Preço".to_string(),
                cnpj: Some("00.000.000/0001-00".to_string()),
                endereco: None,
                telefone: None,
            })
            .await
            .unwrap();
        db.company()
            .save(&CompanyProfile {
                id: String::new(),
                nome: "Mercado Renomeado".to_string(),
                cnpj: None,
                endereco: None,
                telefone: None,
            })
            .await
            .unwrap();

        let profile = db.company().get().await.unwrap();
        assert_eq!(profile.nome, "Mercado Renomeado");
    }
}
