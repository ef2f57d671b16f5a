//! In-memory user repository
//!
//! Backs tests and ephemeral deployments. Behaves like the persistent
//! adapters: lowercase normalization, `Ok(None)` not-found semantics,
//! sparse patches, and max-plus-one id allocation (under the lock, so the
//! document store's retry race cannot occur here).

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use ats_domain::{Error, Result, User, UserPatch, UserRepository, SAVE_FAILED};

/// In-process implementation of the [`UserRepository`] port
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<i64, User>>,
}

impl MemoryUserRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded with existing records, keyed by their ids
    pub fn with_users(users: Vec<User>) -> Self {
        let map = users.into_iter().map(|u| (u.id, u)).collect();
        Self {
            users: RwLock::new(map),
        }
    }

    fn read_user(&self, id: i64) -> Result<User> {
        self.users
            .read()
            .map_err(|_| Error::internal("user store lock poisoned"))?
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("User"))
    }

    fn mutate_user<F>(&self, id: i64, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self
            .users
            .write()
            .map_err(|_| Error::internal("user store lock poisoned"))?;
        if let Some(user) = users.get_mut(&id) {
            mutate(user);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn save(&self, user: &mut User) -> i64 {
        user.username = user.username.to_lowercase();

        let Ok(mut users) = self.users.write() else {
            return SAVE_FAILED;
        };
        let new_id = users.keys().max().map_or(1, |max| max + 1);
        user.id = new_id;
        users.insert(new_id, user.clone());
        new_id
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let needle = username.to_lowercase();
        let users = self
            .users
            .read()
            .map_err(|_| Error::internal("user store lock poisoned"))?;
        Ok(users.values().find(|u| u.username == needle).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let needle = email.to_lowercase();
        let users = self
            .users
            .read()
            .map_err(|_| Error::internal("user store lock poisoned"))?;
        Ok(users
            .values()
            .find(|u| u.email.to_lowercase() == needle)
            .cloned())
    }

    async fn get(&self, id: i64) -> Result<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| Error::internal("user store lock poisoned"))?;
        Ok(users.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| Error::internal("user store lock poisoned"))?;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| u.id);
        Ok(all)
    }

    async fn update(&self, patch: &UserPatch) -> Result<()> {
        self.mutate_user(patch.id, |user| {
            if let Some(first_name) = &patch.first_name {
                user.first_name = first_name.clone();
            }
            if let Some(last_name) = &patch.last_name {
                user.last_name = last_name.clone();
            }
            if let Some(email) = &patch.email {
                user.email = email.clone();
            }
            if let Some(password) = &patch.password {
                user.password = password.clone();
            }
        })
    }

    async fn set_recovery_code(&self, id: i64, code: &str) -> Result<()> {
        self.mutate_user(id, |user| {
            user.recovery_code = code.to_owned();
            user.resetting_code.clear();
        })
    }

    async fn get_recovery_code(&self, id: i64) -> Result<String> {
        Ok(self.read_user(id)?.recovery_code)
    }

    async fn set_resetting_code(&self, id: i64, code: &str) -> Result<()> {
        self.mutate_user(id, |user| {
            user.resetting_code = code.to_owned();
            user.recovery_code.clear();
        })
    }

    async fn get_resetting_code(&self, id: i64) -> Result<String> {
        Ok(self.read_user(id)?.resetting_code)
    }

    async fn reset_password(&self, id: i64, password_hash: &str) -> Result<()> {
        self.mutate_user(id, |user| {
            user.password = password_hash.to_owned();
            user.resetting_code.clear();
        })
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        let mut users = self
            .users
            .write()
            .map_err(|_| Error::internal("user store lock poisoned"))?;
        users.remove(&id);
        Ok(())
    }
}
