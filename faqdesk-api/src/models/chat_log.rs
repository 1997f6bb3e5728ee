use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLog {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// 聊天记录所属用户的投影
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatLogUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatLogWithUser {
    #[serde(flatten)]
    pub log: ChatLog,
    pub user: Option<ChatLogUser>,
}

/// 按 `createdAt` 精确分组的计数
#[derive(Debug, Clone, Serialize)]
pub struct ChatLogCount {
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "_count")]
    pub count: ChatLogCountFields,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ChatLogCountFields {
    pub id: i64,
}

impl ChatLogCount {
    pub fn new(created_at: DateTime<Utc>, count: i64) -> Self {
        Self {
            created_at,
            count: ChatLogCountFields { id: count },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}
