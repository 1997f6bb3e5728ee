use crate::app::AppState;
use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use faqdesk_core::AuthMiddleware;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{
    admin::{chat_log_report, list_chat_logs},
    chat::chat,
    faqs::{create_faq, delete_faq, get_faq, list_faqs, search_faqs, update_faq},
    health::health_check,
};

/// 创建应用路由
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .nest("/faqs", create_faq_routes(&state))
        .nest("/chat", create_chat_routes(&state))
        .nest("/admin", create_admin_routes(&state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// FAQ 路由：读取公开，写入需要管理员
fn create_faq_routes(state: &AppState) -> Router<AppState> {
    // route_layer 后加的先执行：先认证，再检查管理员
    let admin_routes = Router::new()
        .route("/", post(create_faq))
        .route("/{id}", axum::routing::put(update_faq).delete(delete_faq))
        .route_layer(middleware::from_fn(AuthMiddleware::require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.config.clone(),
            AuthMiddleware::authenticate,
        ));

    Router::new()
        .route("/", get(list_faqs))
        .route("/search", get(search_faqs))
        .route("/{id}", get(get_faq))
        .merge(admin_routes)
}

/// 聊天路由：需要登录
fn create_chat_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(chat))
        .route_layer(middleware::from_fn_with_state(
            state.config.clone(),
            AuthMiddleware::authenticate,
        ))
}

/// 管理路由：需要管理员
fn create_admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/chat-logs", get(list_chat_logs))
        .route("/report/chat-logs", get(chat_log_report))
        .route_layer(middleware::from_fn(AuthMiddleware::require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.config.clone(),
            AuthMiddleware::authenticate,
        ))
}

/// 首页处理器
pub async fn index() -> &'static str {
    "faqdesk - FAQ and chat support API"
}
