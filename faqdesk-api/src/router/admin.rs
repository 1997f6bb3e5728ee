use axum::{extract::State, Json};

use crate::app::AppState;
use crate::error::AppResult;
use crate::models::chat_log::{ChatLogCount, ChatLogWithUser};

/// 全部聊天记录（含用户 id/email），最新在前
pub async fn list_chat_logs(State(state): State<AppState>) -> AppResult<Json<Vec<ChatLogWithUser>>> {
    let logs = state.repositories.chat_logs.list_with_users().await?;
    Ok(Json(logs))
}

/// 按创建时间分组的聊天记录数量
pub async fn chat_log_report(State(state): State<AppState>) -> AppResult<Json<Vec<ChatLogCount>>> {
    let counts = state.repositories.chat_logs.count_by_created_at().await?;
    Ok(Json(counts))
}
