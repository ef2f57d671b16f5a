//! Domain layer for the Auth Token Service
//!
//! Defines the core types shared by every other layer:
//!
//! - **entities** - the persisted `User` record and its projections
//! - **value_objects** - response shapes consumed by the transport layer
//! - **error** - the domain error taxonomy with HTTP status classes
//! - **ports** - boundary contracts implemented by provider adapters
//!
//! This crate is a pure library: no I/O, no backend clients, no runtime.
//! Providers and infrastructure depend on it, never the other way around.

pub mod entities;
pub mod error;
pub mod ports;
pub mod value_objects;

// Re-export commonly used types for convenience
pub use entities::{User, UserInfo, UserPatch};
pub use error::{Error, Result};
pub use ports::{RecoveryMailer, UserRepository, SAVE_FAILED};
pub use value_objects::{
    AccessTokenResponse, ErrorResponse, ExchangeCodeResponse, IdResponse, TokenPairResponse,
};
