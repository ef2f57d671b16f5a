//! Credential and token lifecycle service
//!
//! The only component with business rules. Stateless between calls: every
//! operation re-derives state from the persistence port, and the only
//! "session" state lives inside the signed tokens themselves.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Header};
use tracing::{debug, warn};

use ats_domain::{
    AccessTokenResponse, Error, ExchangeCodeResponse, RecoveryMailer, Result, TokenPairResponse,
    User, UserInfo, UserPatch, UserRepository,
};

use super::claims::Claims;
use super::keys::SigningKeys;
use super::password::{hash_password, verify_password};
use super::recovery::generate_code;

/// Authentication and token service
///
/// Orchestrates account creation, authentication, token
/// issuance/refresh/validation, profile updates and the recovery-code
/// lifecycle over an injected [`UserRepository`] and [`SigningKeys`].
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    keys: SigningKeys,
    mailer: Arc<dyn RecoveryMailer>,
}

impl AuthService {
    /// Create a new service over the given collaborators
    pub fn new(
        users: Arc<dyn UserRepository>,
        keys: SigningKeys,
        mailer: Arc<dyn RecoveryMailer>,
    ) -> Self {
        Self {
            users,
            keys,
            mailer,
        }
    }

    /// Create a new user account
    ///
    /// Checks username uniqueness through the port, hashes the password in
    /// place, persists the record and writes the allocated id back onto it.
    pub async fn create_user(&self, user: &mut User) -> Result<()> {
        debug!("creating user");

        if self.users.get_by_username(&user.username).await?.is_some() {
            warn!("username {} already exists", user.username);
            return Err(Error::validation("Username already exists"));
        }

        user.password = hash_password(&user.password)?;

        let id = self.users.save(user).await;
        if id < 0 {
            return Err(Error::internal("Cannot save user"));
        }
        user.id = id;
        Ok(())
    }

    /// Apply a sparse profile update, authorized by an access token
    ///
    /// The token's subject must resolve to the same user id as the target
    /// record. Payloads carrying a username or password, or a non-positive
    /// id, are rejected - profile update must not silently change login
    /// credentials.
    pub async fn update_user(&self, patch: &UserPatch, token: &str) -> Result<()> {
        debug!("updating user with id {}", patch.id);

        let token_user = self.validate_token(token).await;
        match token_user {
            Some(u) if u.id == patch.id => {}
            _ => return Err(Error::unauthorized("Invalid token")),
        }

        if patch.id <= 0 || patch.username.is_some() || patch.password.is_some() {
            return Err(Error::validation("Invalid update payload"));
        }

        if self.users.get(patch.id).await?.is_none() {
            return Err(Error::not_found("User"));
        }

        self.users.update(patch).await
    }

    /// Issue an access/refresh token pair for a username and password
    ///
    /// Absent user and password mismatch are indistinguishable to the
    /// caller (403, not 404) to avoid leaking account existence.
    pub async fn basic_auth_token(&self, username: &str, password: &str) -> Result<TokenPairResponse> {
        let user = self.users.get_by_username(username).await?;

        let user = match user {
            Some(u) if matches!(verify_password(password, &u.password), Ok(true)) => u,
            _ => return Err(Error::forbidden("Username or password is wrong")),
        };

        Ok(TokenPairResponse {
            access_token: self.issue_access_token(&user)?,
            refresh_token: self.issue_refresh_token(&user)?,
        })
    }

    /// Exchange a valid refresh token for a new access token
    ///
    /// Refresh tokens are never rotated here: the caller keeps using the
    /// original refresh token until it expires.
    pub async fn refresh_token(&self, token: &str) -> Result<AccessTokenResponse> {
        match self.validate_token(token).await {
            Some(user) => Ok(AccessTokenResponse {
                access_token: self.issue_access_token(&user)?,
            }),
            None => Err(Error::forbidden("Refresh token is not valid")),
        }
    }

    /// Resolve a token to its user, with public-facing error granularity
    ///
    /// Unlike the internal validator, malformed or unverifiable tokens are
    /// reported as 400 and backend lookup failures as 500, because this
    /// entry point is itself a public query.
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let decoding_key = self.keys.decoding_key()?;
        let token_data = decode::<Claims>(token, &decoding_key, &SigningKeys::rsa_validation())
            .map_err(|e| Error::validation(e.to_string()))?;

        self.users.get_by_username(&token_data.claims.sub).await
    }

    /// Return the user info projection for an id
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<UserInfo>> {
        let user = self.users.get(id).await?;
        Ok(user.as_ref().map(UserInfo::from))
    }

    /// Return the user info projection for a username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<UserInfo>> {
        let user = self.users.get_by_username(username).await?;
        Ok(user.as_ref().map(UserInfo::from))
    }

    /// Return info projections for every user
    pub async fn get_users(&self) -> Result<Vec<UserInfo>> {
        let users = self.users.get_all().await?;
        Ok(users.iter().map(UserInfo::from).collect())
    }

    /// Begin a password recovery flow
    ///
    /// Generates a recovery code, stores it (clearing any resetting code)
    /// and hands it to the mail dispatch collaborator. Delivery outcome is
    /// not surfaced back.
    pub async fn request_recovery(&self, username: &str) -> Result<()> {
        let user = self
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| Error::not_found("User"))?;

        let code = generate_code();
        self.users.set_recovery_code(user.id, &code).await?;
        self.mailer.send_recovery_code(&user.email, &code).await;
        Ok(())
    }

    /// Exchange a valid recovery code for a resetting code
    ///
    /// The resetting code authorizes exactly one password change; storing
    /// it clears the recovery code.
    pub async fn exchange_recovery_code(
        &self,
        username: &str,
        code: &str,
    ) -> Result<ExchangeCodeResponse> {
        let user = self
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| Error::not_found("User"))?;

        let stored = self.users.get_recovery_code(user.id).await?;
        if stored.is_empty() || stored != code {
            return Err(Error::forbidden("Recovery code is not valid"));
        }

        let resetting_code = generate_code();
        self.users
            .set_resetting_code(user.id, &resetting_code)
            .await?;
        Ok(ExchangeCodeResponse {
            code: resetting_code,
        })
    }

    /// Consume a resetting code and set a new password
    pub async fn reset_password(
        &self,
        username: &str,
        resetting_code: &str,
        new_password: &str,
    ) -> Result<()> {
        let user = self
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| Error::not_found("User"))?;

        let stored = self.users.get_resetting_code(user.id).await?;
        if stored.is_empty() || stored != resetting_code {
            return Err(Error::forbidden("Resetting code is not valid"));
        }

        let hash = hash_password(new_password)?;
        self.users.reset_password(user.id, &hash).await
    }

    fn issue_access_token(&self, user: &User) -> Result<String> {
        let encoding_key = self.keys.encoding_key()?;
        encode(
            &Header::new(jsonwebtoken::Algorithm::RS256),
            &Claims::access(user),
            &encoding_key,
        )
        .map_err(|e| Error::internal(format!("token signing failed: {e}")))
    }

    fn issue_refresh_token(&self, user: &User) -> Result<String> {
        let encoding_key = self.keys.encoding_key()?;
        encode(
            &Header::new(jsonwebtoken::Algorithm::RS256),
            &Claims::refresh(user),
            &encoding_key,
        )
        .map_err(|e| Error::internal(format!("token signing failed: {e}")))
    }

    /// Internal validator collapsing every failure into "invalid"
    ///
    /// Parses and verifies the token, then resolves the subject back to a
    /// live user - a token whose subject no longer exists is invalid even
    /// if cryptographically well-formed.
    async fn validate_token(&self, token: &str) -> Option<User> {
        let decoding_key = match self.keys.decoding_key() {
            Ok(key) => key,
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };

        let token_data = match decode::<Claims>(token, &decoding_key, &SigningKeys::rsa_validation())
        {
            Ok(data) => data,
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };

        match self.users.get_by_username(&token_data.claims.sub).await {
            Ok(user) => user,
            Err(_) => None,
        }
    }
}
