//! Infrastructure layer for the Auth Token Service
//!
//! Hosts the credential and token lifecycle service plus the ambient
//! concerns around it:
//!
//! - **auth** - `AuthService`, password hashing, RS256 token signing and
//!   verification, recovery-code generation
//! - **config** - figment-based configuration loading (defaults, TOML
//!   file, `ATS__`-prefixed environment variables)
//! - **logging** - tracing subscriber setup
//! - **bootstrap** - composition root building the service from
//!   configuration

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod logging;

#[cfg(test)]
mod tests;

pub use auth::{AuthService, Claims, SigningKeys};
pub use bootstrap::build_auth_service;
pub use config::{AppConfig, ConfigLoader, KeysConfig, LoggingConfig, MailConfig};
pub use logging::init_logging;
