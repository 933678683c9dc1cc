//! # Index Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! SQLite database. It is the single source of truth for all index state.
//!
//! ## Architectural Principles
//!
//! - **Adapter Layer:** This crate encapsulates all database-specific logic.
//!   It provides a clean, abstract API to the rest of the application, hiding
//!   the underlying SQL and schema details.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses a
//!   connection pool (`SqlitePool`) for concurrent database access.
//! - **No Business Logic:** The repository only issues logical reads, writes
//!   and deletes. Index construction rules live in the `engine` crate.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: A utility to apply database migrations, ensuring the schema is up-to-date.
//! - `DbRepository`: The main struct that holds the connection pool and provides all
//!   the high-level data access methods (e.g., `upsert_compositions`).
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::{CandidateRow, ConstituentRow, DbRepository, PairedCloseRow};
