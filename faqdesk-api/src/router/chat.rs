use crate::app::AppState;
use crate::error::{AppError, AppResult};
use crate::models::chat_log::{ChatRequest, ChatResponse};
use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use faqdesk_core::client::build_faq_messages;
use faqdesk_core::AuthenticatedUser;
use std::time::Instant;
use tracing::{debug, error, info};

/// 基于FAQ上下文回答用户问题，成功后记录聊天日志
pub async fn chat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(payload) = payload?;

    let question = payload.question.unwrap_or_default();
    if question.trim().is_empty() {
        return Err(AppError::BadRequest("Question is required".to_string()));
    }

    let settings = &state.config.completion;
    let faqs = state
        .repositories
        .faqs
        .search(&question, Some(settings.max_context_faqs))
        .await?;
    debug!("Matched {} FAQs as chat context", faqs.len());

    let messages = build_faq_messages(
        &settings.system_prompt,
        faqs.iter().map(|f| (f.question.as_str(), f.answer.as_str())),
        &question,
    );

    let start = Instant::now();
    let answer = match state.completion.complete(&messages).await {
        Ok(answer) => answer,
        Err(e) => {
            error!("Completion API error for user {}: {}", user.get_name(), e);
            return Err(AppError::Completion(e));
        }
    };
    info!(
        "Answered question for user {} using {} in {:?}",
        user.get_name(),
        state.completion.model(),
        start.elapsed()
    );

    state
        .repositories
        .chat_logs
        .create(&question, &answer, Some(user.user_id))
        .await?;

    Ok(Json(ChatResponse { answer }))
}
