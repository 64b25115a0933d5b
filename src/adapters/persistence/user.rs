use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::AppResult,
    use_cases::auth::{UserRecord, UserRepo},
};

// User row as stored in the db.
#[derive(sqlx::FromRow, Debug)]
struct UserDb {
    id: Uuid,
    full_name: String,
    email: String,
    password_hash: String,
    verified: bool,
    created_at: NaiveDateTime,
}

impl From<UserDb> for UserRecord {
    fn from(row: UserDb) -> Self {
        UserRecord {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            password_hash: row.password_hash,
            verified: row.verified,
            created_at: row.created_at,
        }
    }
}

const SELECT_USER: &str =
    "SELECT id, full_name, email, password_hash, verified, created_at FROM users";

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn create(
        &self,
        full_name: &str,
        email: &str,
        password_hash: &str,
    ) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, UserDb>(
            "INSERT INTO users (id, full_name, email, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, full_name, email, password_hash, verified, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserDb>(&format!("{SELECT_USER} WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(UserRecord::from))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserDb>(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(UserRecord::from))
    }

    async fn mark_verified(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE users SET verified = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
