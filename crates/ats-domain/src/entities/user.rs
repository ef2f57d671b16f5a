//! User entity and its projections
//!
//! `User` is the persisted record. `UserInfo` is the read projection handed
//! to callers other than the account holder - it never carries the password
//! or recovery fields. `UserPatch` is the sparse update payload: `None`
//! means "leave unchanged", which removes the ambiguity of empty-string
//! sentinels (an explicit `Some("")` clears the field).

use serde::{Deserialize, Serialize};

/// Persisted user record
///
/// Invariants upheld by the persistence adapters:
/// - `username` is lowercased on write and on every lookup
/// - at most one of `recovery_code` / `resetting_code` is non-empty;
///   setting one always clears the other
/// - `password` only ever stores the hashed credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend-assigned identifier, never reused after deletion
    #[serde(default)]
    pub id: i64,
    /// Unique login name, stored lowercase
    pub username: String,
    /// Given name
    #[serde(default)]
    pub first_name: String,
    /// Family name
    #[serde(default)]
    pub last_name: String,
    /// Contact address, lowercased for lookups
    #[serde(default)]
    pub email: String,
    /// Hashed credential
    #[serde(default)]
    pub password: String,
    /// Opaque invite code set at creation
    #[serde(default)]
    pub invite_code: String,
    /// One-time code issued when a recovery flow starts
    #[serde(default)]
    pub recovery_code: String,
    /// One-time code exchanged from a recovery code
    #[serde(default)]
    pub resetting_code: String,
}

/// Read projection of a user record
///
/// The only representation returned to third parties. Never includes the
/// password or recovery fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// User identifier
    pub id: i64,
    /// Login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact address
    pub email: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Sparse update payload for a user record
///
/// `None` fields are left untouched by the persistence adapters. The
/// service layer rejects patches carrying `username` or `password` - a
/// profile update must not silently change login credentials. `password`
/// is still part of the port contract because the reset flow applies it
/// through the same sparse-patch path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    /// Identifier of the record to patch
    pub id: i64,
    /// New login name (rejected by the service layer)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New contact address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New hashed credential (rejected by the service layer)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserPatch {
    /// True when no field would be modified by this patch
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
    }
}
