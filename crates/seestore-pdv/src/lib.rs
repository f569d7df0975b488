//! # seestore-pdv: Checkout Register Workflow for seeStore
//!
//! This crate orchestrates the sale transaction workflow, from scanning the
//! first product to handing over the receipt.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        seeStore Register Flow                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 seestore-pdv (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │  session  │  │   adhoc   │  │ finalize  │  │   │
//! │  │   │  lookup   │─►│   cart    │◄─│ registrar │  │  + receipt│  │   │
//! │  │   │  search   │  │  customer │  │           │  │           │  │   │
//! │  │   └───────────┘  │  payment  │──────────────────►          │  │   │
//! │  │                  └───────────┘                 └───────────┘  │   │
//! │  └──────────┬───────────────────────────────────────────┬────────┘   │
//! │             │ pure logic                                │ SQL        │
//! │             ▼                                           ▼            │
//! │       seestore-core                               seestore-db        │
//! │       (Cart, Money, Receipt)                      (repositories)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`] - The checkout session: cart, customer, payment
//! - [`catalog`] - Catalog lookup and search facade
//! - [`adhoc`] - Ad-hoc ("produto avulso") registration mid-sale
//! - [`finalize`] - Sale persistence and receipt assembly
//! - [`error`] - The error type the register UI receives
//!
//! ## Usage
//!
//! ```rust,ignore
//! use seestore_db::{Database, DbConfig};
//! use seestore_pdv::session::CheckoutSession;
//! use seestore_core::PaymentMethod;
//!
//! let db = Database::new(DbConfig::new("./seestore.db")).await?;
//! let login = db.users().authenticate("caixa@loja.com", "caixa123").await?;
//! let session = CheckoutSession::start(db, login.user.unwrap()).await?;
//!
//! session.add_by_code("7891000100103").await?;
//! session.select_payment(PaymentMethod::Dinheiro);
//! let done = session.finalize().await?;
//! println!("{}", done.receipt_text);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod adhoc;
pub mod catalog;
pub mod error;
pub mod finalize;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use adhoc::TemporaryProductRegistrar;
pub use catalog::Catalog;
pub use error::{CheckoutError, CheckoutResult, ErrorCode};
pub use finalize::FinalizedSale;
pub use session::{CartTotals, CheckoutSession};
