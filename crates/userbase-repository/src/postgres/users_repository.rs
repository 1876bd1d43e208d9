//! PostgreSQL users repository implementation.

use crate::{phone_in_use, traits::UsersRepository, DatabasePool, EMAIL_IN_USE, USER_NOT_FOUND};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::{debug, info};
use userbase_core::{NewUser, User, UserChanges, UserId, UserbaseError, UserbaseResult};

/// Unique constraint on `users.email`.
const EMAIL_CONSTRAINT: &str = "users_email_key";
/// Unique constraint on `users.phone`.
const PHONE_CONSTRAINT: &str = "users_phone_key";

const USER_COLUMNS: &str = "id, name, email, password, phone, city, created_at, updated_at";

/// PostgreSQL users repository.
#[derive(Clone)]
pub struct PgUsersRepository {
    pool: Arc<DatabasePool>,
}

impl PgUsersRepository {
    /// Creates a new PostgreSQL users repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password: String,
    phone: String,
    city: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            name: row.name,
            email: row.email,
            password: row.password,
            phone: row.phone,
            city: row.city,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Translates a write failure, turning violations of the two unique
/// constraints into the conflict messages callers expect.
fn map_write_error(err: sqlx::Error, phone: Option<&str>) -> UserbaseError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.constraint() {
            Some(EMAIL_CONSTRAINT) => return UserbaseError::conflict(EMAIL_IN_USE),
            Some(PHONE_CONSTRAINT) => return UserbaseError::conflict(phone_in_use(phone.unwrap_or_default())),
            _ => {}
        }
    }
    err.into()
}

#[async_trait]
impl UsersRepository for PgUsersRepository {
    async fn find_by_email(&self, email: &str) -> UserbaseResult<Option<User>> {
        debug!("Finding user by email: {}", email);

        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_phone(&self, phone: &str, exclude_id: UserId) -> UserbaseResult<Option<User>> {
        debug!("Finding user by phone: {} (excluding {})", phone, exclude_id);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone = $1 AND id <> $2 LIMIT 1"
        ))
        .bind(phone)
        .bind(exclude_id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: UserId) -> UserbaseResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(User::from))
    }

    async fn find_all(&self) -> UserbaseResult<Vec<User>> {
        debug!("Finding all users");

        let rows = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"))
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create(&self, user: NewUser) -> UserbaseResult<User> {
        debug!("Creating user: {}", user.email);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (name, email, password, phone, city)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.phone)
        .bind(&user.city)
        .fetch_one(self.pool.inner())
        .await
        .map_err(|e| map_write_error(e, Some(&user.phone)))?;

        info!("Inserted user {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> UserbaseResult<User> {
        debug!("Updating user: {}", id);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                city = COALESCE($4, city),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id.into_inner())
        .bind(changes.name.as_deref())
        .bind(changes.phone.as_deref())
        .bind(changes.city.as_deref())
        .fetch_optional(self.pool.inner())
        .await
        .map_err(|e| map_write_error(e, changes.phone.as_deref()))?
        .ok_or_else(|| UserbaseError::not_found(USER_NOT_FOUND))?;

        Ok(row.into())
    }

    async fn delete(&self, id: UserId) -> UserbaseResult<User> {
        debug!("Deleting user: {}", id);

        let row = sqlx::query_as::<_, UserRow>(&format!("DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"))
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?
            .ok_or_else(|| UserbaseError::not_found(USER_NOT_FOUND))?;

        info!("Deleted user {}", id);
        Ok(row.into())
    }

    async fn health_check(&self) -> UserbaseResult<()> {
        self.pool.health_check().await
    }
}
