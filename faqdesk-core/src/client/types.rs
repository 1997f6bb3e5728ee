use thiserror::Error;

// 定义客户端错误类型
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("OPENAI_API_KEY not set")]
    MissingApiKey,
    #[error("请求头解析失败: {0}")]
    HeaderParseError(String),
    #[error("HTTP请求失败: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("JSON解析失败: {0}")]
    JsonParseError(#[from] serde_json::Error),
    #[error("上游API返回错误: 状态码 {status}")]
    UpstreamError { status: u16, body: String },
}
