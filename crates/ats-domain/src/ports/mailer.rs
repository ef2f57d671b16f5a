//! Recovery-code dispatch port
//!
//! Outbound email delivery is an external collaborator. The core only
//! hands over `(email, code)`; delivery outcome is not surfaced back into
//! the error taxonomy, so the port is fire-and-forget.

use async_trait::async_trait;

/// Outbound dispatch of recovery codes
#[async_trait]
pub trait RecoveryMailer: Send + Sync {
    /// Dispatch a recovery code to the given address
    ///
    /// Implementations log delivery failures themselves; the caller never
    /// observes them.
    async fn send_recovery_code(&self, email: &str, code: &str);
}
