use chrono::{DateTime, Utc};
use faqdesk_core::UserToken;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// 配置文件中声明的用户在数据库里的镜像
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UserToken> for User {
    fn from(token: &UserToken) -> Self {
        let now = Utc::now();
        User {
            id: token.id,
            name: token.name.clone(),
            email: token.email.clone(),
            is_admin: token.is_admin,
            created_at: now,
            updated_at: now,
        }
    }
}
