use super::ChatLogRepository;
use crate::database::Database;
use crate::models::chat_log::{ChatLog, ChatLogCount, ChatLogUser, ChatLogWithUser};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct ChatLogWithUserRow {
    id: Uuid,
    question: String,
    answer: String,
    user_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    user_email: Option<String>,
}

impl From<ChatLogWithUserRow> for ChatLogWithUser {
    fn from(row: ChatLogWithUserRow) -> Self {
        let user = match (row.user_id, row.user_email) {
            (Some(id), Some(email)) => Some(ChatLogUser { id, email }),
            _ => None,
        };

        ChatLogWithUser {
            log: ChatLog {
                id: row.id,
                question: row.question,
                answer: row.answer,
                user_id: row.user_id,
                created_at: row.created_at,
            },
            user,
        }
    }
}

#[derive(Debug, FromRow)]
struct ChatLogCountRow {
    created_at: DateTime<Utc>,
    count: i64,
}

#[derive(Clone)]
pub struct PgChatLogRepository {
    db: Database,
}

impl PgChatLogRepository {
    pub fn new(db: Database) -> Self {
        PgChatLogRepository { db }
    }
}

#[async_trait]
impl ChatLogRepository for PgChatLogRepository {
    async fn create(&self, question: &str, answer: &str, user_id: Option<Uuid>) -> Result<ChatLog> {
        let log = sqlx::query_as::<_, ChatLog>(
            r#"
            INSERT INTO chat_logs (id, question, answer, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, question, answer, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(question)
        .bind(answer)
        .bind(user_id)
        .fetch_one(self.db.get_pool())
        .await
        .context("Failed to create chat log")?;

        Ok(log)
    }

    async fn list_with_users(&self) -> Result<Vec<ChatLogWithUser>> {
        let rows = sqlx::query_as::<_, ChatLogWithUserRow>(
            r#"
            SELECT c.id, c.question, c.answer, c.user_id, c.created_at, u.email AS user_email
            FROM chat_logs c
            LEFT JOIN users u ON u.id = c.user_id
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .fetch_all(self.db.get_pool())
        .await
        .context("Failed to list chat logs")?;

        Ok(rows.into_iter().map(ChatLogWithUser::from).collect())
    }

    async fn count_by_created_at(&self) -> Result<Vec<ChatLogCount>> {
        let rows = sqlx::query_as::<_, ChatLogCountRow>(
            r#"
            SELECT created_at, COUNT(id) AS count
            FROM chat_logs
            GROUP BY created_at
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.get_pool())
        .await
        .context("Failed to count chat logs")?;

        Ok(rows
            .into_iter()
            .map(|row| ChatLogCount::new(row.created_at, row.count))
            .collect())
    }
}
