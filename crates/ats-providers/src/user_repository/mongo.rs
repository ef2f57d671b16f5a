//! MongoDB document-store adapter
//!
//! Primary-key allocation is not delegated to the backend: the adapter
//! reads the current peak `_id`, increments it, and attempts the insert.
//! Computing the candidate and inserting are two separate operations, so
//! concurrent writers can race on the same candidate; a duplicate-key
//! conflict triggers a recompute-and-retry, bounded by
//! [`MAX_SAVE_ATTEMPTS`]. Any other insert failure is not retried.
//!
//! [`MAX_SAVE_ATTEMPTS`]: crate::constants::MAX_SAVE_ATTEMPTS

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use ats_domain::{Error, Result, User, UserPatch, UserRepository, SAVE_FAILED};

use crate::constants::{DUPLICATE_KEY_CODE, MAX_SAVE_ATTEMPTS, USERS_COLLECTION};

/// Persisted document shape
///
/// Kept separate from the domain entity so the `_id` mapping and document
/// field names stay an adapter concern.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    #[serde(rename = "_id")]
    id: i64,
    username: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    invite_code: String,
    #[serde(default)]
    recovery_code: String,
    #[serde(default)]
    resetting_code: String,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            invite_code: user.invite_code.clone(),
            recovery_code: user.recovery_code.clone(),
            resetting_code: user.resetting_code.clone(),
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id,
            username: doc.username,
            first_name: doc.first_name,
            last_name: doc.last_name,
            email: doc.email,
            password: doc.password,
            invite_code: doc.invite_code,
            recovery_code: doc.recovery_code,
            resetting_code: doc.resetting_code,
        }
    }
}

/// MongoDB implementation of the [`UserRepository`] port
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Connect to MongoDB and bind the users collection
    pub async fn connect(url: &str, database_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(url).await.map_err(|e| {
            error!("failed to dial mongo url '{}': {}", url, e);
            Error::database_with_source("failed to connect to MongoDB", e)
        })?;
        info!("connected to MongoDB");

        let collection = client.database(database_name).collection(USERS_COLLECTION);
        Ok(Self { collection })
    }

    /// Compute the next candidate id from the current peak
    async fn next_id(&self) -> Result<i64> {
        let peak = self
            .collection
            .find_one(doc! {})
            .sort(doc! { "_id": -1 })
            .await
            .map_err(|e| Error::database_with_source("failed to read peak id", e))?;
        Ok(peak.map_or(1, |d| d.id + 1))
    }

    /// Classify an insert failure as a retryable uniqueness conflict
    fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
        if let ErrorKind::Write(WriteFailure::WriteError(write_err)) = &*err.kind {
            if write_err.code == DUPLICATE_KEY_CODE {
                return true;
            }
        }
        // Driver versions differ in how conflicts surface; match the
        // server's message as a fallback.
        err.to_string().contains("duplicate")
    }

    /// Project a single string field for a user id
    ///
    /// Shared read path for every field projection; fails when the record
    /// or the projected field is absent.
    async fn string_field_for_id(&self, id: i64, field: &str) -> Result<String> {
        let mut projection = Document::new();
        projection.insert("_id", 0);
        projection.insert(field, 1);

        let document = self
            .collection
            .clone_with_type::<Document>()
            .find_one(doc! { "_id": id })
            .projection(projection)
            .await
            .map_err(|e| Error::database_with_source("failed to project field", e))?
            .ok_or_else(|| Error::not_found("User"))?;

        document
            .get_str(field)
            .map(str::to_owned)
            .map_err(|e| Error::database_with_source("field projection is absent", e))
    }

    /// Set one field and clear the complementary one in a single `$set`
    ///
    /// Shared write path preserving the recovery/resetting mutual-exclusion
    /// invariant.
    async fn set_field_and_wipe_other(
        &self,
        id: i64,
        field_to_set: &str,
        value: &str,
        field_to_wipe: &str,
    ) -> Result<()> {
        let mut set = Document::new();
        set.insert(field_to_set, value);
        set.insert(field_to_wipe, "");

        self.collection
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await
            .map_err(|e| Error::database_with_source("failed to update field", e))?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn save(&self, user: &mut User) -> i64 {
        user.username = user.username.to_lowercase();

        for _ in 0..MAX_SAVE_ATTEMPTS {
            let new_id = match self.next_id().await {
                Ok(id) => id,
                Err(e) => {
                    error!("{}", e);
                    return SAVE_FAILED;
                }
            };
            user.id = new_id;

            match self.collection.insert_one(UserDocument::from(&*user)).await {
                Ok(_) => return new_id,
                Err(e) if Self::is_duplicate_key(&e) => {
                    // Another writer claimed the candidate id; recompute.
                    continue;
                }
                Err(e) => {
                    error!("{}", e);
                    return SAVE_FAILED;
                }
            }
        }
        SAVE_FAILED
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let found = self
            .collection
            .find_one(doc! { "username": username.to_lowercase() })
            .await
            .map_err(|e| Error::database_with_source("failed to query by username", e))?;
        Ok(found.map(User::from))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let found = self
            .collection
            .find_one(doc! { "email": email.to_lowercase() })
            .await
            .map_err(|e| Error::database_with_source("failed to query by email", e))?;
        Ok(found.map(User::from))
    }

    async fn get(&self, id: i64) -> Result<Option<User>> {
        let found = self
            .collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| Error::database_with_source("failed to query by id", e))?;
        Ok(found.map(User::from))
    }

    async fn get_all(&self) -> Result<Vec<User>> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|e| Error::database_with_source("failed to query users", e))?;
        let documents: Vec<UserDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| Error::database_with_source("failed to decode user document", e))?;
        Ok(documents.into_iter().map(User::from).collect())
    }

    async fn update(&self, patch: &UserPatch) -> Result<()> {
        let mut update_body = Document::new();
        if let Some(first_name) = &patch.first_name {
            update_body.insert("firstName", first_name);
        }
        if let Some(last_name) = &patch.last_name {
            update_body.insert("lastName", last_name);
        }
        if let Some(email) = &patch.email {
            update_body.insert("email", email);
        }
        if let Some(password) = &patch.password {
            update_body.insert("password", password);
        }
        if update_body.is_empty() {
            return Ok(());
        }

        self.collection
            .update_one(doc! { "_id": patch.id }, doc! { "$set": update_body })
            .await
            .map_err(|e| Error::database_with_source("failed to update user", e))?;
        Ok(())
    }

    async fn set_recovery_code(&self, id: i64, code: &str) -> Result<()> {
        self.set_field_and_wipe_other(id, "recoveryCode", code, "resettingCode")
            .await
    }

    async fn get_recovery_code(&self, id: i64) -> Result<String> {
        self.string_field_for_id(id, "recoveryCode").await
    }

    async fn set_resetting_code(&self, id: i64, code: &str) -> Result<()> {
        self.set_field_and_wipe_other(id, "resettingCode", code, "recoveryCode")
            .await
    }

    async fn get_resetting_code(&self, id: i64) -> Result<String> {
        self.string_field_for_id(id, "resettingCode").await
    }

    async fn reset_password(&self, id: i64, password_hash: &str) -> Result<()> {
        self.set_field_and_wipe_other(id, "password", password_hash, "resettingCode")
            .await
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.collection
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| Error::database_with_source("failed to delete user", e))?;
        Ok(())
    }
}
