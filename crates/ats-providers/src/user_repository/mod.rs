//! User repository adapters
//!
//! Three backends implement the [`UserRepository`] port:
//!
//! - [`MongoUserRepository`] - document store; owns manual primary-key
//!   allocation with bounded optimistic retry
//! - [`SqlUserRepository`] - relational store; delegates id allocation to
//!   the engine's auto-increment
//! - [`MemoryUserRepository`] - in-process store for tests and ephemeral
//!   deployments
//!
//! Whatever the id-allocation model, the adapters present identical
//! external behavior: lowercase normalization, `Ok(None)` not-found
//! semantics and sparse-patch updates.
//!
//! [`UserRepository`]: ats_domain::UserRepository

mod memory;
mod mongo;
mod sql;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use ats_domain::{Result, UserRepository};

pub use memory::MemoryUserRepository;
pub use mongo::MongoUserRepository;
pub use sql::SqlUserRepository;

/// Supported persistence backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// MongoDB document store
    Mongo,
    /// Relational store via SQLite
    Sql,
    /// In-process store, not persisted
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mongo => write!(f, "mongo"),
            Self::Sql => write!(f, "sql"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Configuration for the persistence backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Selected backend
    pub backend: BackendKind,
    /// Connection URL (e.g. "mongodb://localhost:27017" or
    /// "sqlite://auth.db?mode=rwc"); unused by the memory backend
    #[serde(default)]
    pub url: String,
    /// Database name; only meaningful for the document store
    #[serde(default)]
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            url: String::new(),
            name: "auth".into(),
        }
    }
}

/// Create the repository selected by configuration
///
/// This is the single composition point for backend polymorphism: callers
/// receive a `dyn UserRepository` and stay agnostic of the storage family.
pub async fn create_user_repository(config: &DatabaseConfig) -> Result<Arc<dyn UserRepository>> {
    tracing::info!(backend = %config.backend, "creating user repository");
    match config.backend {
        BackendKind::Mongo => Ok(Arc::new(
            MongoUserRepository::connect(&config.url, &config.name).await?,
        )),
        BackendKind::Sql => Ok(Arc::new(SqlUserRepository::connect(&config.url).await?)),
        BackendKind::Memory => Ok(Arc::new(MemoryUserRepository::new())),
    }
}
