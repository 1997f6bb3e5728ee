use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use headers::{authorization::Bearer, Authorization, HeaderMapExt};
use std::sync::Arc;
use tracing::{debug, warn};

use super::types::{AuthError, AuthenticatedUser};
use crate::config::model::{Config, UserToken};

/// 认证中间件
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// 从请求中提取并验证Bearer令牌
    pub async fn authenticate(
        State(config): State<Arc<Config>>,
        mut request: Request,
        next: Next,
    ) -> Result<Response, Response> {
        let bearer = request
            .headers()
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| AuthError::missing_token().into_response())?;

        let user_token =
            validate_request_token(&config, bearer.token()).map_err(IntoResponse::into_response)?;

        let authenticated_user = AuthenticatedUser::new(user_token.clone());

        // 将认证用户信息添加到请求扩展中
        request.extensions_mut().insert(authenticated_user);

        Ok(next.run(request).await)
    }

    /// 管理员守卫，必须挂在 `authenticate` 之后
    pub async fn require_admin(request: Request, next: Next) -> Result<Response, Response> {
        let caller = get_authenticated_user(&request)
            .map(|user| (user.is_admin(), user.get_name().to_string()));

        match caller {
            Some((true, _)) => Ok(next.run(request).await),
            Some((false, name)) => {
                warn!(
                    "User '{}' denied access to admin route: {}",
                    name,
                    request.uri().path()
                );
                Err(AuthError::admin_required().into_response())
            }
            None => Err(AuthError::admin_required().into_response()),
        }
    }
}

/// 从请求扩展中获取认证用户信息
pub fn get_authenticated_user(request: &Request) -> Option<&AuthenticatedUser> {
    request.extensions().get::<AuthenticatedUser>()
}

/// 令牌格式检查加用户查找
pub fn validate_request_token<'a>(config: &'a Config, token: &str) -> Result<&'a UserToken, AuthError> {
    if token.is_empty() {
        warn!("Empty token provided");
        return Err(AuthError::invalid_token());
    }

    if token.len() < 8 {
        warn!("Token too short: {} characters", token.len());
        return Err(AuthError::invalid_token());
    }

    if token.chars().any(char::is_control) {
        warn!("Token contains control characters");
        return Err(AuthError::invalid_token());
    }

    match config.validate_user_token(token) {
        Some(user) if user.enabled => {
            debug!("Token validation successful for user: {}", user.name);
            Ok(user)
        }
        Some(user) => {
            warn!("Token validation failed: user '{}' is disabled", user.name);
            Err(AuthError::disabled_user())
        }
        None => {
            warn!(
                "Token validation failed: invalid token (length: {})",
                token.len()
            );
            Err(AuthError::invalid_token())
        }
    }
}
