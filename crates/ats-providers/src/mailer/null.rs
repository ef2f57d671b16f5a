//! Null mailer provider
//!
//! A [`RecoveryMailer`] implementation that logs the dispatch and drops it.
//! Useful for tests and deployments where delivery is wired up elsewhere.
//!
//! [`RecoveryMailer`]: ats_domain::RecoveryMailer

use async_trait::async_trait;
use tracing::info;

use ats_domain::RecoveryMailer;

/// Mailer that doesn't deliver anything
#[derive(Debug, Clone, Default)]
pub struct NullMailer;

impl NullMailer {
    /// Create a new null mailer
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RecoveryMailer for NullMailer {
    async fn send_recovery_code(&self, email: &str, _code: &str) {
        // The code itself is never logged.
        info!("recovery code dispatch requested for {}", email);
    }
}
