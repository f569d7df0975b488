//! # Settings Repository
//!
//! Key/value store configuration backing register behaviour.
//!
//! ## Keys
//! ```text
//! ┌──────────────────────────────┬──────────┬───────────────────────────────┐
//! │ chave                        │ default  │ effect                        │
//! ├──────────────────────────────┼──────────┼───────────────────────────────┤
//! │ venda_sem_cadastro           │ true     │ allow sales with no customer  │
//! │ estoque_permitir_negativo    │ false    │ disable the stock gate        │
//! │ baixa_estoque_na_venda       │ false    │ deduct stock when finalizing  │
//! │ pdv_senha_desconto           │ abacate  │ shared discount password      │
//! └──────────────────────────────┴──────────┴───────────────────────────────┘
//! ```
//!
//! Absent keys fall back to the defaults above; the table starts empty.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

// Setting keys. Kept as constants so typos fail at compile time.
pub const KEY_VENDA_SEM_CADASTRO: &str = "venda_sem_cadastro";
pub const KEY_ESTOQUE_PERMITIR_NEGATIVO: &str = "estoque_permitir_negativo";
pub const KEY_BAIXA_ESTOQUE_NA_VENDA: &str = "baixa_estoque_na_venda";
pub const KEY_PDV_SENHA_DESCONTO: &str = "pdv_senha_desconto";

/// Default shared discount password, used until the store sets its own.
pub const DEFAULT_SENHA_DESCONTO: &str = "abacate";

/// Repository for the `configuracoes` key/value table.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Reads a raw setting value. `Ok(None)` when the key was never set.
    pub async fn get_string(&self, chave: &str) -> DbResult<Option<String>> {
        let valor: Option<String> =
            sqlx::query_scalar("SELECT valor FROM configuracoes WHERE chave = ?1")
                .bind(chave)
                .fetch_optional(&self.pool)
                .await?;

        Ok(valor)
    }

    /// Writes a setting, inserting or overwriting.
    pub async fn set_string(&self, chave: &str, valor: &str) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO configuracoes (chave, valor, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(chave) DO UPDATE SET valor = excluded.valor, \
             updated_at = excluded.updated_at",
        )
        .bind(chave)
        .bind(valor)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(chave = %chave, "Setting updated");
        Ok(())
    }

    /// Reads a boolean setting; absent or unparseable values fall back to
    /// the given default.
    pub async fn get_bool(&self, chave: &str, default: bool) -> DbResult<bool> {
        Ok(match self.get_string(chave).await?.as_deref() {
            Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            _ => default,
        })
    }

    /// Writes a boolean setting as `"true"` / `"false"`.
    pub async fn set_bool(&self, chave: &str, valor: bool) -> DbResult<()> {
        self.set_string(chave, if valor { "true" } else { "false" })
            .await
    }
}

// =============================================================================
// Register settings snapshot
// =============================================================================

/// The settings the register reads when a checkout session starts.
///
/// Loaded once per session, not per keystroke; a settings change mid-sale
/// applies from the next sale on.
#[derive(Debug, Clone)]
pub struct RegisterSettings {
    /// Sales may be finalized with no customer attached.
    pub venda_sem_cadastro: bool,

    /// Disables the stock gate in the cart.
    pub estoque_permitir_negativo: bool,

    /// When true, finalizing a sale deducts stock and writes `saida`
    /// ledger entries for each non-temporary line.
    pub baixa_estoque_na_venda: bool,

    /// Shared password unlocking per-item discounts.
    pub senha_desconto: String,
}

impl RegisterSettings {
    /// Loads the snapshot, applying defaults for unset keys.
    pub async fn load(repo: &SettingsRepository) -> DbResult<Self> {
        Ok(RegisterSettings {
            venda_sem_cadastro: repo.get_bool(KEY_VENDA_SEM_CADASTRO, true).await?,
            estoque_permitir_negativo: repo
                .get_bool(KEY_ESTOQUE_PERMITIR_NEGATIVO, false)
                .await?,
            baixa_estoque_na_venda: repo.get_bool(KEY_BAIXA_ESTOQUE_NA_VENDA, false).await?,
            senha_desconto: repo
                .get_string(KEY_PDV_SENHA_DESCONTO)
                .await?
                .unwrap_or_else(|| DEFAULT_SENHA_DESCONTO.to_string()),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
