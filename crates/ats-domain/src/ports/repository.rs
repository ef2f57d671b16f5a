//! User persistence port
//!
//! The capability set any storage adapter must satisfy. The design tension
//! to preserve: adapters may allocate identifiers very differently (manual
//! next-id with retry vs. engine auto-increment), but their observable
//! behavior - not-found semantics, lowercase normalization, sparse patch
//! updates - must be byte-for-byte identical so the service layer stays
//! backend-agnostic.

use async_trait::async_trait;

use crate::entities::{User, UserPatch};
use crate::error::Result;

/// Sentinel returned by [`UserRepository::save`] when id allocation or
/// insertion ultimately fails after retries
pub const SAVE_FAILED: i64 = -1;

/// Persistence boundary for user records
///
/// Lookup methods return `Ok(None)` when no record matches; an `Err` is
/// reserved for genuine access failures (timeout, disconnect, decode
/// error). Callers rely on this distinction - "does this username already
/// exist?" is an expected branch of business logic, not an error path.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Assign a new identifier and store the record
    ///
    /// Normalizes the username to lowercase in place, writes the assigned
    /// id back onto the record and returns it. Returns [`SAVE_FAILED`]
    /// (never an error) when allocation or insertion ultimately fails.
    async fn save(&self, user: &mut User) -> i64;

    /// Look up a user by username, case-insensitively
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Look up a user by email, case-insensitively
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Look up a user by id
    async fn get(&self, id: i64) -> Result<Option<User>>;

    /// Return every record, or an empty collection
    async fn get_all(&self) -> Result<Vec<User>>;

    /// Apply only the `Some` fields of the patch to the stored record
    async fn update(&self, patch: &UserPatch) -> Result<()>;

    /// Set the recovery code and clear the resetting code
    async fn set_recovery_code(&self, id: i64, code: &str) -> Result<()>;

    /// Extract the recovery code for a user id
    ///
    /// Fails when the record is absent.
    async fn get_recovery_code(&self, id: i64) -> Result<String>;

    /// Set the resetting code and clear the recovery code
    async fn set_resetting_code(&self, id: i64, code: &str) -> Result<()>;

    /// Extract the resetting code for a user id
    ///
    /// Fails when the record is absent.
    async fn get_resetting_code(&self, id: i64) -> Result<String>;

    /// Update the password hash and clear the resetting code
    async fn reset_password(&self, id: i64, password_hash: &str) -> Result<()>;

    /// Delete a user by id
    async fn delete_by_id(&self, id: i64) -> Result<()>;
}
