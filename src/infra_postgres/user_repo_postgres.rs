use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::{PgPool, Row};

pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        PgUserRepo { pool }
    }
}

#[async_trait::async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_username(&self, username: &str) -> Result<UserRecord, UserRepoError> {
        // fetch_one: zero rows is an error, same as any other failure.
        let row = sqlx::query(r#"SELECT id::text AS id, username FROM "user" WHERE username = $1"#)
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| UserRepoError::Query(e.to_string()))?;

        Ok(UserRecord {
            id: row
                .try_get::<UserId, _>("id")
                .map_err(|e| UserRepoError::Query(e.to_string()))?,
            username: row
                .try_get::<String, _>("username")
                .map_err(|e| UserRepoError::Query(e.to_string()))?,
        })
    }

    async fn ping(&self) -> Result<(), UserRepoError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| UserRepoError::Connectivity(e.to_string()))?;

        Ok(())
    }
}
