use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub completion: CompletionSettings,
    #[serde(default)]
    pub users: HashMap<String, UserToken>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// 存储后端
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// PostgreSQL（默认）
    #[default]
    Postgres,
    /// 进程内存储，重启后数据丢失，仅用于本地开发
    Memory,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_database_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_database_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_database_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            url: default_database_url(),
            max_connections: default_database_max_connections(),
            min_connections: default_database_min_connections(),
            acquire_timeout_seconds: default_database_acquire_timeout(),
        }
    }
}

/// 外部聊天补全API配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CompletionSettings {
    #[serde(default = "default_completion_api_url")]
    pub api_url: String,
    #[serde(default = "default_completion_model")]
    pub model: String,
    /// 通常由 OPENAI_API_KEY 环境变量提供
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_max_context_faqs")]
    pub max_context_faqs: i64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            api_url: default_completion_api_url(),
            model: default_completion_model(),
            api_key: None,
            timeout_seconds: default_request_timeout(),
            system_prompt: default_system_prompt(),
            max_context_faqs: default_max_context_faqs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UserToken {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_completion_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_completion_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_system_prompt() -> String {
    "You are an assistant answering user questions based on FAQs.".to_string()
}

fn default_max_context_faqs() -> i64 {
    3
}

// 数据库默认值函数
fn default_database_url() -> String {
    "postgres://localhost/faqdesk".to_string()
}

fn default_database_max_connections() -> u32 {
    5
}

fn default_database_min_connections() -> u32 {
    1
}

fn default_database_acquire_timeout() -> u64 {
    3
}

impl Config {
    /// 用环境变量覆盖配置文件中的值
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(api_key) = lookup("OPENAI_API_KEY") {
            self.completion.api_key = Some(api_key);
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            self.completion.model = model;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(bind_address) = lookup("BIND_ADDRESS") {
            self.server.bind_address = bind_address;
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.server.bind_address.trim().is_empty() {
            anyhow::bail!("server.bind_address cannot be empty");
        }

        self.validate_database_config()?;
        self.validate_completion_config()?;

        let mut seen_tokens = HashSet::new();
        let mut seen_ids = HashSet::new();
        for (user_key, user) in &self.users {
            self.validate_user_config(user_key, user)?;

            if !seen_tokens.insert(user.token.as_str()) {
                anyhow::bail!("User '{}' reuses a token assigned to another user", user_key);
            }
            if !seen_ids.insert(user.id) {
                anyhow::bail!("User '{}' reuses id {} assigned to another user", user_key, user.id);
            }
        }

        Ok(())
    }

    fn validate_database_config(&self) -> Result<()> {
        let db = &self.database;

        if db.backend == StorageBackend::Memory {
            return Ok(());
        }

        if db.url.is_empty() {
            anyhow::bail!("database.url cannot be empty");
        }

        if !db.url.starts_with("postgres://") && !db.url.starts_with("postgresql://") {
            anyhow::bail!(
                "database.url has invalid format: '{}'. Must start with postgres:// or postgresql://",
                db.url
            );
        }

        if db.max_connections == 0 {
            anyhow::bail!("database.max_connections cannot be 0");
        }

        if db.min_connections > db.max_connections {
            anyhow::bail!(
                "database.min_connections ({}) exceeds max_connections ({})",
                db.min_connections,
                db.max_connections
            );
        }

        if db.acquire_timeout_seconds == 0 {
            anyhow::bail!("database.acquire_timeout_seconds cannot be 0");
        }

        Ok(())
    }

    fn validate_completion_config(&self) -> Result<()> {
        let completion = &self.completion;

        if !completion.api_url.starts_with("http://") && !completion.api_url.starts_with("https://") {
            anyhow::bail!(
                "completion.api_url has invalid format: '{}'. Must start with http:// or https://",
                completion.api_url
            );
        }

        if completion.model.trim().is_empty() {
            anyhow::bail!("completion.model cannot be empty");
        }

        if completion.timeout_seconds == 0 {
            anyhow::bail!("completion.timeout_seconds cannot be 0");
        }

        if completion.timeout_seconds > 300 {
            anyhow::bail!(
                "completion.timeout_seconds is too large: {} (maximum 300)",
                completion.timeout_seconds
            );
        }

        if completion.max_context_faqs < 0 {
            anyhow::bail!("completion.max_context_faqs cannot be negative");
        }

        Ok(())
    }

    fn validate_user_config(&self, user_key: &str, user: &UserToken) -> Result<()> {
        if user.name.trim().is_empty() {
            anyhow::bail!("User '{}' has empty name", user_key);
        }

        if user.email.trim().is_empty() || !user.email.contains('@') {
            anyhow::bail!("User '{}' has invalid email: '{}'", user_key, user.email);
        }

        if user.token.len() < 8 {
            anyhow::bail!(
                "User '{}' has token that is too short (minimum 8 characters)",
                user_key
            );
        }

        if user.token.chars().any(|c| c.is_control() || c.is_whitespace()) {
            anyhow::bail!("User '{}' has token containing whitespace or control characters", user_key);
        }

        Ok(())
    }

    /// 根据令牌查找用户
    pub fn validate_user_token(&self, token: &str) -> Option<&UserToken> {
        self.users.values().find(|user| user.token == token)
    }

    pub fn admin_count(&self) -> usize {
        self.users
            .values()
            .filter(|user| user.enabled && user.is_admin)
            .count()
    }
}
