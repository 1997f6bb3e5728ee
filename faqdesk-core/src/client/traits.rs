use super::types::ClientError;
use async_trait::async_trait;
use serde_json::{json, Value};

/// 聊天消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
}

impl ChatRole {
    pub fn as_str(&self) -> &str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
        }
    }
}

/// 聊天消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// 聊天完成请求
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// 转换为OpenAI格式的JSON
    pub fn to_openai_json(&self) -> Value {
        let messages: Vec<Value> = self
            .messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.as_str(),
                    "content": msg.content
                })
            })
            .collect();

        json!({
            "model": self.model,
            "messages": messages
        })
    }
}

/// 构建发送给模型的消息列表：系统提示、每条FAQ一条系统消息、最后是用户问题
pub fn build_faq_messages<'a, I>(system_prompt: &str, faqs: I, question: &str) -> Vec<ChatMessage>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut messages = vec![ChatMessage::system(system_prompt)];
    messages.extend(
        faqs.into_iter()
            .map(|(q, a)| ChatMessage::system(format!("Q: {q}\nA: {a}"))),
    );
    messages.push(ChatMessage::user(question));
    messages
}

/// 聊天补全客户端
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// 使用的模型名称
    fn model(&self) -> &str;

    /// 发送消息列表，返回第一条回复的文本
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ClientError>;
}
