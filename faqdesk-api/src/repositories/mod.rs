pub mod chat_log;
pub mod faq;
pub mod memory;
pub mod user;

use crate::database::Database;
use crate::models::chat_log::{ChatLog, ChatLogCount, ChatLogWithUser};
use crate::models::faq::Faq;
use anyhow::Result;
use async_trait::async_trait;
use faqdesk_core::{DatabaseSettings, StorageBackend, UserToken};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub use chat_log::PgChatLogRepository;
pub use faq::PgFaqRepository;
pub use memory::MemoryStore;
pub use user::PgUserRepository;

#[async_trait]
pub trait FaqRepository: Send + Sync {
    /// 按创建时间倒序分页
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Faq>>;

    /// 问题或答案包含 `keyword` 的FAQ，按创建时间倒序
    async fn search(&self, keyword: &str, limit: Option<i64>) -> Result<Vec<Faq>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Faq>>;

    async fn create(&self, question: &str, answer: &str) -> Result<Faq>;

    async fn update(
        &self,
        id: Uuid,
        question: Option<&str>,
        answer: Option<&str>,
    ) -> Result<Option<Faq>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait ChatLogRepository: Send + Sync {
    async fn create(&self, question: &str, answer: &str, user_id: Option<Uuid>) -> Result<ChatLog>;

    async fn list_with_users(&self) -> Result<Vec<ChatLogWithUser>>;

    async fn count_by_created_at(&self) -> Result<Vec<ChatLogCount>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 把配置中的用户写入存储，返回写入数量
    async fn sync(&self, users: &[UserToken]) -> Result<usize>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<bool>;
}

#[async_trait]
impl HealthCheck for Database {
    async fn ping(&self) -> Result<bool> {
        Database::ping(self).await
    }
}

/// 处理器使用的全部存储
#[derive(Clone)]
pub struct Repositories {
    pub faqs: Arc<dyn FaqRepository>,
    pub chat_logs: Arc<dyn ChatLogRepository>,
    pub users: Arc<dyn UserRepository>,
    pub health: Arc<dyn HealthCheck>,
}

impl Repositories {
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        match settings.backend {
            StorageBackend::Postgres => {
                let db = Database::new(settings).await?;
                db.run_migrations().await?;
                info!("Connected to PostgreSQL and applied migrations");
                Ok(Self::postgres(db))
            }
            StorageBackend::Memory => {
                warn!("Using in-memory storage; data will be lost on restart");
                Ok(Self::memory(Arc::new(MemoryStore::default())))
            }
        }
    }

    pub fn postgres(db: Database) -> Self {
        Self {
            faqs: Arc::new(PgFaqRepository::new(db.clone())),
            chat_logs: Arc::new(PgChatLogRepository::new(db.clone())),
            users: Arc::new(PgUserRepository::new(db.clone())),
            health: Arc::new(db),
        }
    }

    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            faqs: store.clone(),
            chat_logs: store.clone(),
            users: store.clone(),
            health: store,
        }
    }
}

/// 转义 LIKE 模式中的通配符，使关键字按字面匹配
pub(crate) fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
