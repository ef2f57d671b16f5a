//! Credential and token lifecycle
//!
//! - `service` - the `AuthService` orchestration (account creation,
//!   authentication, token issuance/refresh/validation, profile update,
//!   recovery-code lifecycle)
//! - `password` - bcrypt hashing and verification
//! - `keys` - RSA key material read fresh from PEM files on every call
//! - `claims` - the signed token claim set
//! - `recovery` - opaque one-time code generation

pub mod claims;
pub mod keys;
pub mod password;
pub mod recovery;
pub mod service;

pub use claims::Claims;
pub use keys::SigningKeys;
pub use password::{hash_password, verify_password};
pub use recovery::generate_code;
pub use service::AuthService;
