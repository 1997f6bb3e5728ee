use super::UserRepository;
use crate::database::Database;
use anyhow::{Context, Result};
use async_trait::async_trait;
use faqdesk_core::UserToken;

#[derive(Clone)]
pub struct PgUserRepository {
    db: Database,
}

impl PgUserRepository {
    pub fn new(db: Database) -> Self {
        PgUserRepository { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn sync(&self, users: &[UserToken]) -> Result<usize> {
        let mut tx = self
            .db
            .get_pool()
            .begin()
            .await
            .context("Failed to begin user sync transaction")?;

        for user in users {
            sqlx::query(
                r#"
                INSERT INTO users (id, name, email, is_admin)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO UPDATE
                SET
                    name = EXCLUDED.name,
                    email = EXCLUDED.email,
                    is_admin = EXCLUDED.is_admin,
                    updated_at = NOW()
                "#,
            )
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.is_admin)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to sync user '{}'", user.name))?;
        }

        tx.commit()
            .await
            .context("Failed to commit user sync transaction")?;

        Ok(users.len())
    }
}
