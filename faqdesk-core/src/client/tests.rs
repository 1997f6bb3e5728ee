#[cfg(test)]
mod tests {
    use crate::client::*;
    use crate::config::model::CompletionSettings;
    use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct MockUpstream {
        status: StatusCode,
        reply: Value,
        captured: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    }

    async fn mock_completions(
        State(mock): State<MockUpstream>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        mock.captured.lock().unwrap().push((auth, body));
        (mock.status, Json(mock.reply.clone()))
    }

    /// 启动本地模拟上游，返回补全接口地址
    async fn spawn_upstream(status: StatusCode, reply: Value) -> (String, MockUpstream) {
        let mock = MockUpstream {
            status,
            reply,
            captured: Arc::new(Mutex::new(Vec::new())),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(mock_completions))
            .with_state(mock.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        (format!("http://{}/v1/chat/completions", addr), mock)
    }

    fn sample_messages() -> Vec<ChatMessage> {
        build_faq_messages(
            "You are an assistant answering user questions based on FAQs.",
            [("How do I reset my password?", "Use the reset link.")],
            "reset password",
        )
    }

    #[test]
    fn test_build_faq_messages_layout() {
        let messages = build_faq_messages(
            "system prompt",
            [("Q1", "A1"), ("Q2", "A2")],
            "user question",
        );

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], ChatMessage::system("system prompt"));
        assert_eq!(messages[1].content, "Q: Q1\nA: A1");
        assert_eq!(messages[2].role, ChatRole::System);
        assert_eq!(messages[2].content, "Q: Q2\nA: A2");
        assert_eq!(messages[3], ChatMessage::user("user question"));
    }

    #[test]
    fn test_build_faq_messages_without_context() {
        let messages = build_faq_messages("prompt", std::iter::empty::<(&str, &str)>(), "hello");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, ChatRole::User);
    }

    #[test]
    fn test_to_openai_json() {
        let request = CompletionRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
        };

        let body = request.to_openai_json();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_from_settings() {
        let settings = CompletionSettings {
            api_key: Some("sk-test".to_string()),
            model: "gpt-4o-mini".to_string(),
            ..CompletionSettings::default()
        };

        let client = OpenAIClient::from_settings(&settings);
        assert_eq!(client.model(), "gpt-4o-mini");
        assert_eq!(client.api_url(), "https://api.openai.com/v1/chat/completions");
        assert!(client.has_api_key());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let (url, mock) = spawn_upstream(StatusCode::OK, json!({})).await;
        let client = OpenAIClient::new(url, None, "gpt-3.5-turbo".to_string());

        let result = client.complete(&sample_messages()).await;
        assert!(matches!(result, Err(ClientError::MissingApiKey)));
        assert!(mock.captured.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_api_key_counts_as_missing() {
        let (url, mock) = spawn_upstream(StatusCode::OK, json!({})).await;
        let client = OpenAIClient::new(url, Some("  ".to_string()), "gpt-3.5-turbo".to_string());
        assert!(!client.has_api_key());

        let result = client.complete(&sample_messages()).await;
        assert!(matches!(result, Err(ClientError::MissingApiKey)));
        assert!(mock.captured.lock().unwrap().is_empty());

        let settings = CompletionSettings {
            api_key: Some(String::new()),
            ..CompletionSettings::default()
        };
        assert!(!OpenAIClient::from_settings(&settings).has_api_key());
    }

    #[tokio::test]
    async fn test_successful_completion() {
        let reply = json!({
            "choices": [{ "message": { "role": "assistant", "content": "Click 'Forgot password'." } }]
        });
        let (url, mock) = spawn_upstream(StatusCode::OK, reply).await;
        let client = OpenAIClient::new(url, Some("sk-test".to_string()), "gpt-3.5-turbo".to_string());

        let answer = client.complete(&sample_messages()).await.unwrap();
        assert_eq!(answer, "Click 'Forgot password'.");

        let captured = mock.captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        let (auth, body) = &captured[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["messages"].as_array().unwrap().len(), 3);
        assert_eq!(body["messages"][1]["content"], "Q: How do I reset my password?\nA: Use the reset link.");
        assert_eq!(body["messages"][2]["content"], "reset password");
    }

    #[tokio::test]
    async fn test_empty_choices_yield_empty_answer() {
        let (url, _mock) = spawn_upstream(StatusCode::OK, json!({ "choices": [] })).await;
        let client = OpenAIClient::new(url, Some("sk-test".to_string()), "gpt-3.5-turbo".to_string());

        let answer = client.complete(&sample_messages()).await.unwrap();
        assert_eq!(answer, "");
    }

    #[tokio::test]
    async fn test_upstream_error_status() {
        let reply = json!({ "error": { "message": "Incorrect API key provided" } });
        let (url, _mock) = spawn_upstream(StatusCode::UNAUTHORIZED, reply).await;
        let client = OpenAIClient::new(url, Some("sk-bad".to_string()), "gpt-3.5-turbo".to_string());

        match client.complete(&sample_messages()).await {
            Err(ClientError::UpstreamError { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("Incorrect API key"));
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        // 端口0不可连接
        let client = OpenAIClient::new(
            "http://127.0.0.1:0/v1/chat/completions".to_string(),
            Some("sk-test".to_string()),
            "gpt-3.5-turbo".to_string(),
        );

        let result = client.complete(&sample_messages()).await;
        assert!(matches!(result, Err(ClientError::RequestError(_))));
    }
}
