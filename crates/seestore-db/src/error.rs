//! # Database Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← adds the entity / constraint context          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CheckoutError (seestore-pdv) ← serialized for the register UI         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// `fetch_one` returned no rows, or the id does not exist.
    #[error("{entity} não encontrado: {id}")]
    NotFound { entity: String, id: String },

    /// UNIQUE index violation, e.g. a duplicate internal product code.
    #[error("valor duplicado em {field}: '{value}'")]
    UniqueViolation { field: String, value: String },

    /// Referenced row does not exist (e.g. a sale item pointing at a
    /// product that was never inserted).
    #[error("violação de chave estrangeira: {message}")]
    ForeignKeyViolation { message: String },

    /// Database file could not be opened or the pool could not connect.
    #[error("falha de conexão: {0}")]
    ConnectionFailed(String),

    /// An embedded migration failed to apply.
    #[error("falha na migração: {0}")]
    MigrationFailed(String),

    /// Runtime SQL error.
    #[error("falha na consulta: {0}")]
    QueryFailed(String),

    /// All pool connections are in use.
    #[error("pool de conexões esgotado")]
    PoolExhausted,

    /// Anything sqlx reports that does not fit the categories above.
    #[error("erro interno do banco de dados: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Maps sqlx errors onto the categories above.
///
/// SQLite reports constraint failures only through the message text, so the
/// UNIQUE / FOREIGN KEY classification is a substring match.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "registro".to_string(),
                id: "desconhecido".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("desconhecido")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "desconhecido".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool fechado".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
