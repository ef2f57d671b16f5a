//! Signed token claims
//!
//! Both token kinds share one flat claim set: the subject is the username,
//! `userId` is present only on access tokens, and `exp` is a unix
//! timestamp. The wire names are part of the token contract.

use chrono::{Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use ats_domain::User;

use crate::constants::{ACCESS_TOKEN_TTL_SECS, REFRESH_TOKEN_TTL_MONTHS};

/// Claim set embedded in issued tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username the token was issued for
    pub sub: String,
    /// User identifier; only present on access tokens
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Expiry as a unix timestamp
    pub exp: i64,
}

impl Claims {
    /// Claims for a one-hour access token
    pub fn access(user: &User) -> Self {
        let expiry = Utc::now() + Duration::seconds(ACCESS_TOKEN_TTL_SECS);
        Self {
            sub: user.username.clone(),
            user_id: Some(user.id),
            exp: expiry.timestamp(),
        }
    }

    /// Claims for a one-year refresh token
    pub fn refresh(user: &User) -> Self {
        let expiry = Utc::now() + Months::new(REFRESH_TOKEN_TTL_MONTHS);
        Self {
            sub: user.username.clone(),
            user_id: None,
            exp: expiry.timestamp(),
        }
    }
}
