use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use faqdesk_core::AuthenticatedUser;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::{AppError, AppResult};
use crate::models::faq::{CreateFaqRequest, Faq, ListFaqsQuery, SearchFaqsQuery, UpdateFaqRequest};

fn faq_not_found() -> AppError {
    AppError::NotFound("FAQ not found".to_string())
}

/// 非空（去除空白后）的字段
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 分页列出FAQ
pub async fn list_faqs(
    State(state): State<AppState>,
    Query(query): Query<ListFaqsQuery>,
) -> AppResult<Json<Vec<Faq>>> {
    let faqs = state
        .repositories
        .faqs
        .list(query.limit(), query.offset())
        .await?;
    Ok(Json(faqs))
}

/// 关键字搜索FAQ
pub async fn search_faqs(
    State(state): State<AppState>,
    Query(query): Query<SearchFaqsQuery>,
) -> AppResult<Json<Vec<Faq>>> {
    let Some(keyword) = query.keyword.filter(|k| !k.is_empty()) else {
        return Ok(Json(Vec::new()));
    };

    let faqs = state.repositories.faqs.search(&keyword, None).await?;
    Ok(Json(faqs))
}

pub async fn get_faq(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Faq>> {
    let Path(id) = path?;
    let faq = state
        .repositories
        .faqs
        .find_by_id(id)
        .await?
        .ok_or_else(faq_not_found)?;
    Ok(Json(faq))
}

pub async fn create_faq(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateFaqRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Faq>)> {
    let Json(payload) = payload?;

    let (Some(question), Some(answer)) = (non_blank(payload.question), non_blank(payload.answer))
    else {
        return Err(AppError::BadRequest(
            "Question and answer are required".to_string(),
        ));
    };

    let faq = state.repositories.faqs.create(&question, &answer).await?;
    info!("FAQ {} created by {}", faq.id, user.get_name());

    Ok((StatusCode::CREATED, Json(faq)))
}

pub async fn update_faq(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateFaqRequest>, JsonRejection>,
) -> AppResult<Json<Faq>> {
    let Path(id) = path?;
    let Json(payload) = payload?;

    let blank = |value: &Option<String>| value.as_deref().is_some_and(|v| v.trim().is_empty());
    if blank(&payload.question) || blank(&payload.answer) {
        return Err(AppError::BadRequest(
            "Question and answer cannot be empty".to_string(),
        ));
    }

    let faq = state
        .repositories
        .faqs
        .update(id, payload.question.as_deref(), payload.answer.as_deref())
        .await?
        .ok_or_else(faq_not_found)?;
    info!("FAQ {} updated by {}", faq.id, user.get_name());

    Ok(Json(faq))
}

pub async fn delete_faq(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = path?;

    if !state.repositories.faqs.delete(id).await? {
        return Err(faq_not_found());
    }
    info!("FAQ {} deleted by {}", id, user.get_name());

    Ok(StatusCode::NO_CONTENT)
}
