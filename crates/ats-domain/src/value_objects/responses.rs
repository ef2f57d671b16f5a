//! Public response shapes
//!
//! These are the exact wire shapes the transport layer serializes. Field
//! names are part of the external contract, hence the camelCase renames.

use serde::{Deserialize, Serialize};

/// Error response `{error}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

/// Creation response `{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResponse {
    /// Identifier assigned to the created record
    pub id: i64,
}

/// Token pair issued by basic authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    /// Short-lived signed credential (one hour)
    pub access_token: String,
    /// Long-lived signed credential (one year)
    pub refresh_token: String,
}

/// Single access token issued by a refresh call
///
/// Refresh never rotates the refresh token, so this shape deliberately has
/// no refresh field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    /// Newly minted access token
    pub access_token: String,
}

/// Resetting code returned when a recovery code is exchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeCodeResponse {
    /// One-time code authorizing exactly one password change
    pub code: String,
}
