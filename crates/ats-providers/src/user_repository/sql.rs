//! SQL relational adapter
//!
//! Primary-key allocation is delegated to the engine's auto-increment, so
//! no conflict retry loop exists here. The schema is synchronized from the
//! user record's field definitions at startup. Both code getters go
//! through one shared projection query path.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{error, info};

use ats_domain::{Error, Result, User, UserPatch, UserRepository, SAVE_FAILED};

use crate::constants::USERS_TABLE;

/// Column list for full-record selects
const USER_COLUMNS: &str =
    "id, username, first_name, last_name, email, password, invite_code, recovery_code, resetting_code";

/// String fields exposed through the shared projection path
#[derive(Debug, Clone, Copy)]
enum CodeField {
    Recovery,
    Resetting,
}

impl CodeField {
    fn column(self) -> &'static str {
        match self {
            Self::Recovery => "recovery_code",
            Self::Resetting => "resetting_code",
        }
    }
}

/// Relational implementation of the [`UserRepository`] port
pub struct SqlUserRepository {
    pool: SqlitePool,
}

impl SqlUserRepository {
    /// Connect to the database and synchronize the schema
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| {
                error!("failed to dial sql url '{}': {}", url, e);
                Error::database_with_source("failed to connect to SQL database", e)
            })?;
        info!("connected to SQL database");

        let repository = Self { pool };
        repository.sync_schema().await?;
        Ok(repository)
    }

    /// Create the users table from the record's field definitions
    async fn sync_schema(&self) -> Result<()> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {USERS_TABLE} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL DEFAULT '',
                password TEXT NOT NULL DEFAULT '',
                invite_code TEXT NOT NULL DEFAULT '',
                recovery_code TEXT NOT NULL DEFAULT '',
                resetting_code TEXT NOT NULL DEFAULT ''
            )"
        );
        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::database_with_source("failed to synchronize schema", e))?;
        Ok(())
    }

    fn map_row(row: &SqliteRow) -> Result<User> {
        let decode = |e: sqlx::Error| Error::database_with_source("failed to decode user row", e);
        Ok(User {
            id: row.try_get("id").map_err(decode)?,
            username: row.try_get("username").map_err(decode)?,
            first_name: row.try_get("first_name").map_err(decode)?,
            last_name: row.try_get("last_name").map_err(decode)?,
            email: row.try_get("email").map_err(decode)?,
            password: row.try_get("password").map_err(decode)?,
            invite_code: row.try_get("invite_code").map_err(decode)?,
            recovery_code: row.try_get("recovery_code").map_err(decode)?,
            resetting_code: row.try_get("resetting_code").map_err(decode)?,
        })
    }

    async fn find_one(&self, column: &'static str, value: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM {USERS_TABLE} WHERE {column} = ?1");
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::database_with_source("failed to query user", e))?;
        row.as_ref().map(Self::map_row).transpose()
    }

    /// Project a single code field for a user id
    ///
    /// The one query-construction path used by both code getters.
    async fn string_field_for_id(&self, id: i64, field: CodeField) -> Result<String> {
        let query = format!(
            "SELECT {} FROM {USERS_TABLE} WHERE id = ?1",
            field.column()
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::database_with_source("failed to project field", e))?
            .ok_or_else(|| Error::not_found("User"))?;
        row.try_get(field.column())
            .map_err(|e| Error::database_with_source("failed to decode field", e))
    }

    /// Set one column and clear the complementary one in a single statement
    async fn set_field_and_wipe_other(
        &self,
        id: i64,
        column_to_set: &'static str,
        value: &str,
        column_to_wipe: &'static str,
    ) -> Result<()> {
        let query = format!(
            "UPDATE {USERS_TABLE} SET {column_to_set} = ?1, {column_to_wipe} = '' WHERE id = ?2"
        );
        sqlx::query(&query)
            .bind(value)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::database_with_source("failed to update field", e))?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn save(&self, user: &mut User) -> i64 {
        user.username = user.username.to_lowercase();

        let query = format!(
            "INSERT INTO {USERS_TABLE} \
             (username, first_name, last_name, email, password, invite_code, recovery_code, resetting_code) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
        );
        let inserted = sqlx::query(&query)
            .bind(&user.username)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password)
            .bind(&user.invite_code)
            .bind(&user.recovery_code)
            .bind(&user.resetting_code)
            .execute(&self.pool)
            .await;

        match inserted {
            Ok(result) => {
                user.id = result.last_insert_rowid();
                user.id
            }
            Err(e) => {
                error!("{}", e);
                SAVE_FAILED
            }
        }
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        self.find_one("username", &username.to_lowercase()).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_one("email", &email.to_lowercase()).await
    }

    async fn get(&self, id: i64) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM {USERS_TABLE} WHERE id = ?1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::database_with_source("failed to query user", e))?;
        row.as_ref().map(Self::map_row).transpose()
    }

    async fn get_all(&self) -> Result<Vec<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM {USERS_TABLE} ORDER BY id");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::database_with_source("failed to query users", e))?;
        rows.iter().map(Self::map_row).collect()
    }

    async fn update(&self, patch: &UserPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let query = format!(
            "UPDATE {USERS_TABLE} SET \
             first_name = COALESCE(?1, first_name), \
             last_name = COALESCE(?2, last_name), \
             email = COALESCE(?3, email), \
             password = COALESCE(?4, password) \
             WHERE id = ?5"
        );
        sqlx::query(&query)
            .bind(patch.first_name.as_deref())
            .bind(patch.last_name.as_deref())
            .bind(patch.email.as_deref())
            .bind(patch.password.as_deref())
            .bind(patch.id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::database_with_source("failed to update user", e))?;
        Ok(())
    }

    async fn set_recovery_code(&self, id: i64, code: &str) -> Result<()> {
        self.set_field_and_wipe_other(id, "recovery_code", code, "resetting_code")
            .await
    }

    async fn get_recovery_code(&self, id: i64) -> Result<String> {
        self.string_field_for_id(id, CodeField::Recovery).await
    }

    async fn set_resetting_code(&self, id: i64, code: &str) -> Result<()> {
        self.set_field_and_wipe_other(id, "resetting_code", code, "recovery_code")
            .await
    }

    async fn get_resetting_code(&self, id: i64) -> Result<String> {
        self.string_field_for_id(id, CodeField::Resetting).await
    }

    async fn reset_password(&self, id: i64, password_hash: &str) -> Result<()> {
        self.set_field_and_wipe_other(id, "password", password_hash, "resetting_code")
            .await
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        let query = format!("DELETE FROM {USERS_TABLE} WHERE id = ?1");
        sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::database_with_source("failed to delete user", e))?;
        Ok(())
    }
}
