use super::{escape_like, FaqRepository};
use crate::database::Database;
use crate::models::faq::Faq;
use anyhow::{Context, Result};
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgFaqRepository {
    db: Database,
}

impl PgFaqRepository {
    pub fn new(db: Database) -> Self {
        PgFaqRepository { db }
    }
}

#[async_trait]
impl FaqRepository for PgFaqRepository {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Faq>> {
        let faqs = sqlx::query_as::<_, Faq>(
            r#"
            SELECT id, question, answer, created_at, updated_at
            FROM faqs
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.get_pool())
        .await
        .context("Failed to list FAQs")?;

        Ok(faqs)
    }

    async fn search(&self, keyword: &str, limit: Option<i64>) -> Result<Vec<Faq>> {
        let pattern = format!("%{}%", escape_like(keyword));

        // LIMIT NULL 表示不限制
        let faqs = sqlx::query_as::<_, Faq>(
            r#"
            SELECT id, question, answer, created_at, updated_at
            FROM faqs
            WHERE question LIKE $1 ESCAPE '\' OR answer LIKE $1 ESCAPE '\'
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(self.db.get_pool())
        .await
        .context("Failed to search FAQs")?;

        Ok(faqs)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Faq>> {
        let faq = sqlx::query_as::<_, Faq>(
            r#"
            SELECT id, question, answer, created_at, updated_at
            FROM faqs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.get_pool())
        .await
        .context("Failed to find FAQ by ID")?;

        Ok(faq)
    }

    async fn create(&self, question: &str, answer: &str) -> Result<Faq> {
        let faq = sqlx::query_as::<_, Faq>(
            r#"
            INSERT INTO faqs (id, question, answer)
            VALUES ($1, $2, $3)
            RETURNING id, question, answer, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(question)
        .bind(answer)
        .fetch_one(self.db.get_pool())
        .await
        .context("Failed to create FAQ")?;

        Ok(faq)
    }

    async fn update(
        &self,
        id: Uuid,
        question: Option<&str>,
        answer: Option<&str>,
    ) -> Result<Option<Faq>> {
        let faq = sqlx::query_as::<_, Faq>(
            r#"
            UPDATE faqs
            SET
                question = COALESCE($2, question),
                answer = COALESCE($3, answer),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, question, answer, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(question)
        .bind(answer)
        .fetch_optional(self.db.get_pool())
        .await
        .context("Failed to update FAQ")?;

        Ok(faq)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM faqs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.db.get_pool())
        .await
        .context("Failed to delete FAQ")?;

        Ok(result.rows_affected() > 0)
    }
}
