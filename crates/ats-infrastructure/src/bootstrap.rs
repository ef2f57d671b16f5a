//! Composition root
//!
//! Builds the credential and token service from configuration: the
//! repository is selected by the configured backend kind, key material is
//! bound to the configured PEM paths, and mail dispatch defaults to the
//! null provider until a delivery integration is wired in by the host
//! process.

use std::sync::Arc;

use ats_domain::Result;
use ats_providers::{create_user_repository, NullMailer};

use crate::auth::{AuthService, SigningKeys};
use crate::config::AppConfig;

/// Build an [`AuthService`] from loaded configuration
pub async fn build_auth_service(config: &AppConfig) -> Result<AuthService> {
    let users = create_user_repository(&config.database).await?;
    let keys = SigningKeys::new(
        &config.keys.private_key_path,
        &config.keys.public_key_path,
    );
    Ok(AuthService::new(users, keys, Arc::new(NullMailer::new())))
}
