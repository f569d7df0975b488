//! # Customer Repository
//!
//! Customer search and the register's quick-create path.
//!
//! The register only ever needs two things from customers: find one to
//! attach to a sale, and create one on the spot when the buyer is not in
//! the base yet. Full customer management lives outside the register.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::changes::{ChangeFeed, ChangeKind};
use crate::error::{DbError, DbResult};
use seestore_core::Customer;

const CUSTOMER_COLUMNS: &str = "id, nome, cpf, telefone, email, ativo, created_at";

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
    changes: ChangeFeed,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool, changes: ChangeFeed) -> Self {
        CustomerRepository { pool, changes }
    }

    /// Case-insensitive substring search over name and CPF, active only.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Customer>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", query);

        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM clientes \
             WHERE (nome LIKE ?1 OR cpf LIKE ?1) AND ativo = 1 \
             ORDER BY nome \
             LIMIT ?2"
        ))
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Fetches a customer by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Customer> {
        sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM clientes WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("cliente", id))
    }

    /// Quick-create for the register: name upper-cased, everything else
    /// optional, immediately usable on the open sale.
    pub async fn quick_create(
        &self,
        nome: &str,
        cpf: Option<&str>,
        telefone: Option<&str>,
    ) -> DbResult<Customer> {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            nome: nome.trim().to_uppercase(),
            cpf: cpf.map(|c| c.to_string()),
            telefone: telefone.map(|t| t.to_string()),
            email: None,
            ativo: true,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO clientes (id, nome, cpf, telefone, email, ativo, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&customer.id)
        .bind(&customer.nome)
        .bind(&customer.cpf)
        .bind(&customer.telefone)
        .bind(&customer.email)
        .bind(customer.ativo)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        debug!(id = %customer.id, nome = %customer.nome, "Customer created");
        self.changes.publish("clientes", ChangeKind::Insert, &customer.id);
        Ok(customer)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_quick_create_uppercases_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let customer = db
            .customers()
            .quick_create("  maria da silva ", Some("123.456.789-00"), None)
            .await
            .unwrap();

        assert_eq!(customer.nome, "MARIA DA SILVA");
        assert!(customer.ativo);
    }

    #[tokio::test]
    async fn test_search_by_name_and_cpf() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.customers()
            .quick_create("Maria da Silva", Some("123.456.789-00"), None)
            .await
            .unwrap();
        db.customers()
            .quick_create("João Pereira", None, None)
            .await
            .unwrap();

        let by_name = db.customers().search("maria", 10).await.unwrap();
        assert_eq!(by_name.len(), 1);

        let by_cpf = db.customers().search("456.789", 10).await.unwrap();
        assert_eq!(by_cpf.len(), 1);
        assert_eq!(by_cpf[0].nome, "MARIA DA SILVA");

        assert!(db.customers().search("", 10).await.unwrap().is_empty());
    }
}
