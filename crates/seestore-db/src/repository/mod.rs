//! # Repository Module
//!
//! Database repository implementations for seeStore.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  Repositories keep all SQL behind a typed API.                          │
//! │                                                                         │
//! │  Register workflow                                                      │
//! │       │                                                                 │
//! │       │  db.products().find_by_code("7891000100103")                   │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── find_by_code(&self, code)                                          │
//! │  ├── search(&self, query, limit)                                        │
//! │  ├── insert(&self, product)                                             │
//! │  └── adjust_stock(&self, id, delta)                                     │
//! │       │                                                                 │
//! │       │  SQL, parsed into seestore-core types at this boundary          │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Rows are decoded into typed records here; nothing above this layer    │
//! │  ever sees raw rows or untyped JSON.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`company::CompanyRepository`] - Store identity for receipts
//! - [`product::ProductRepository`] - Catalog lookup, search and stock
//! - [`sale::SaleRepository`] - Sale headers and line items
//! - [`customer::CustomerRepository`] - Customer search and quick-create
//! - [`stock::StockRepository`] - Append-only stock ledger
//! - [`settings::SettingsRepository`] - Key/value store configuration
//! - [`user::UserRepository`] - Users and password authentication

pub mod company;
pub mod customer;
pub mod product;
pub mod sale;
pub mod settings;
pub mod stock;
pub mod user;
