//! # User Repository
//!
//! Users and the login check.
//!
//! ## Authentication Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 authenticate(identificador, senha)                      │
//! │                                                                         │
//! │  lookup by email, username or matricula (active users only)             │
//! │       │                                                                 │
//! │       ├── no user ──────────► { success: false, message }              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  argon2 verify against senha_hash                                      │
//! │       │                                                                 │
//! │       ├── mismatch ─────────► { success: false, message }              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  { success: true, user: { id, email, nome, tipo_usuario } }            │
//! │                                                                         │
//! │  Unknown identifier and wrong password return the same message, so     │
//! │  the login form cannot be used to probe which accounts exist.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use seestore_core::User;

const USER_COLUMNS: &str =
    "id, email, nome, tipo_usuario, username, matricula, senha_hash, ativo";

/// The user fields exposed after a successful login. Never carries the
/// password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub nome: String,
    pub tipo_usuario: String,
}

/// Outcome of an authentication attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: Option<AuthUser>,
    pub message: Option<String>,
}

impl AuthResponse {
    fn denied() -> Self {
        AuthResponse {
            success: false,
            user: None,
            message: Some("Email ou senha incorretos".to_string()),
        }
    }
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Checks credentials and returns the login outcome.
    ///
    /// The identifier matches the user's email, username or matricula.
    /// Failures are reported in-band via `success: false`; an `Err` means
    /// the database itself failed, not that the password was wrong.
    pub async fn authenticate(&self, identificador: &str, senha: &str) -> DbResult<AuthResponse> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM usuarios \
             WHERE (email = ?1 OR username = ?1 OR matricula = ?1) AND ativo = 1"
        ))
        .bind(identificador.trim())
        .fetch_optional(&self.pool)
        .await?;

        let Some(user) = user else {
            debug!(identificador = %identificador, "Login attempt for unknown identifier");
            return Ok(AuthResponse::denied());
        };

        if !verify_password(senha, &user.senha_hash) {
            warn!(identificador = %identificador, "Login attempt with wrong password");
            return Ok(AuthResponse::denied());
        }

        debug!(identificador = %identificador, "Login succeeded");
        Ok(AuthResponse {
            success: true,
            user: Some(AuthUser {
                id: user.id,
                email: user.email,
                nome: user.nome,
                tipo_usuario: user.tipo_usuario,
            }),
            message: None,
        })
    }

    /// Creates a user, hashing the password with argon2.
    ///
    /// `username` and `matricula` are optional login aliases;
    /// [`authenticate`](Self::authenticate) accepts either in place of the
    /// email.
    pub async fn create(
        &self,
        email: &str,
        nome: &str,
        tipo_usuario: &str,
        username: Option<&str>,
        matricula: Option<&str>,
        senha: &str,
    ) -> DbResult<User> {
        let senha_hash = hash_password(senha)?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.trim().to_string(),
            nome: nome.to_string(),
            tipo_usuario: tipo_usuario.to_string(),
            username: username.map(|u| u.trim().to_string()),
            matricula: matricula.map(|m| m.trim().to_string()),
            senha_hash,
            ativo: true,
        };

        sqlx::query(
            "INSERT INTO usuarios (id, email, nome, tipo_usuario, username, matricula, \
             senha_hash, ativo) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.nome)
        .bind(&user.tipo_usuario)
        .bind(&user.username)
        .bind(&user.matricula)
        .bind(&user.senha_hash)
        .bind(user.ativo)
        .execute(&self.pool)
        .await?;

        debug!(email = %user.email, "User created");
        Ok(user)
    }

    /// Fetches a user by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM usuarios WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("usuario", id))
    }
}

// =============================================================================
// Password hashing
// =============================================================================

/// Hashes a password with argon2id and a fresh random salt.
pub fn hash_password(senha: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(senha.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("falha ao gerar hash de senha: {e}")))?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored argon2 hash. A malformed stored
/// hash counts as a mismatch.
fn verify_password(senha: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        warn!("Stored password hash is malformed");
        return false;
    };
    Argon2::default()
        .verify_password(senha.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_authenticate_happy_path() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users()
            .create("caixa@loja.com", "Operador de Caixa", "caixa", None, None, "segredo123")
            .await
            .unwrap();

        let response = db
            .users()
            .authenticate("caixa@loja.com", "segredo123")
            .await
            .unwrap();

        assert!(response.success);
        let user = response.user.unwrap();
        assert_eq!(user.email, "caixa@loja.com");
        assert_eq!(user.tipo_usuario, "caixa");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_identical() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users()
            .create("caixa@loja.com", "Operador", "caixa", None, None, "segredo123")
            .await
            .unwrap();

        let wrong_pass = db
            .users()
            .authenticate("caixa@loja.com", "errada")
            .await
            .unwrap();
        let unknown = db
            .users()
            .authenticate("ninguem@loja.com", "segredo123")
            .await
            .unwrap();

        assert!(!wrong_pass.success);
        assert!(!unknown.success);
        assert_eq!(wrong_pass.message, unknown.message);
    }

    #[tokio::test]
    async fn test_authenticate_by_username_or_matricula() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users()
            .create(
                "caixa@loja.com",
                "Operador de Caixa",
                "caixa",
                Some("caixa01"),
                Some("0042"),
                "segredo123",
            )
            .await
            .unwrap();

        for identificador in ["caixa@loja.com", "caixa01", "0042"] {
            let response = db
                .users()
                .authenticate(identificador, "segredo123")
                .await
                .unwrap();
            assert!(response.success, "login via {identificador} should work");
            assert_eq!(response.user.unwrap().email, "caixa@loja.com");
        }

        // The alias still goes through the password check.
        let denied = db.users().authenticate("caixa01", "errada").await.unwrap();
        assert!(!denied.success);
    }

    #[tokio::test]
    async fn test_auth_user_omits_hash() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users()
            .create("caixa@loja.com", "Operador", "caixa", None, None, "segredo123")
            .await
            .unwrap();

        let response = db
            .users()
            .authenticate("caixa@loja.com", "segredo123")
            .await
            .unwrap();

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("senha_hash"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_hash_round_trip() {
        let hash = hash_password("abacate").unwrap();
        assert!(verify_password("abacate", &hash));
        assert!(!verify_password("banana", &hash));
        assert!(!verify_password("abacate", "not-a-hash"));
    }
}
