//! Provider implementations for the Auth Token Service
//!
//! Adapters implementing the domain ports:
//!
//! - **user_repository** - persistence adapters for the [`UserRepository`]
//!   port: MongoDB document store, SQL relational store, and an in-memory
//!   store for tests and ephemeral deployments
//! - **mailer** - [`RecoveryMailer`] implementations
//!
//! Backend selection is driven by configuration through
//! [`user_repository::create_user_repository`].
//!
//! [`UserRepository`]: ats_domain::UserRepository
//! [`RecoveryMailer`]: ats_domain::RecoveryMailer

pub mod constants;
pub mod mailer;
pub mod user_repository;

pub use mailer::NullMailer;
pub use user_repository::{
    create_user_repository, BackendKind, DatabaseConfig, MemoryUserRepository,
    MongoUserRepository, SqlUserRepository,
};
