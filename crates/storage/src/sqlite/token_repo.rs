use async_trait::async_trait;
use chrono::{DateTime, Utc};
use conceptly_core::model::AuthTokens;
use sqlx::Row;

use crate::repository::{StorageError, StoredTokens, TokenRepository};

use super::SqliteRepository;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl TokenRepository for SqliteRepository {
    async fn load_tokens(&self) -> Result<Option<StoredTokens>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT access_token, refresh_token, saved_at
            FROM auth_tokens
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let access_token: String = row.try_get("access_token").map_err(ser)?;
        let refresh_token: String = row.try_get("refresh_token").map_err(ser)?;
        let saved_at: DateTime<Utc> = row.try_get("saved_at").map_err(ser)?;

        Ok(Some(StoredTokens {
            tokens: AuthTokens::new(access_token, refresh_token),
            saved_at,
        }))
    }

    async fn save_tokens(
        &self,
        tokens: &AuthTokens,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO auth_tokens (id, access_token, refresh_token, saved_at)
            VALUES (1, ?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                access_token = excluded.access_token,
                refresh_token = excluded.refresh_token,
                saved_at = excluded.saved_at
            ",
        )
        .bind(&tokens.access_token)
        .bind(&tokens.refresh_token)
        .bind(saved_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn clear_tokens(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM auth_tokens WHERE id = 1")
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
