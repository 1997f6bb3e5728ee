#[cfg(test)]
mod tests {
    use crate::auth::middleware::{validate_request_token, AuthMiddleware};
    use crate::auth::types::*;
    use crate::config::model::*;
    use axum::{
        http::{header, HeaderValue, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use axum_test::TestServer;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Arc;
    use uuid::Uuid;

    const USER_TOKEN: &str = "user-token-123456";
    const ADMIN_TOKEN: &str = "admin-token-456789";
    const DISABLED_TOKEN: &str = "disabled-token-0000";

    fn create_user(name: &str, token: &str, is_admin: bool, enabled: bool) -> UserToken {
        UserToken {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            token: token.to_string(),
            is_admin,
            enabled,
        }
    }

    fn create_test_config() -> Config {
        let mut users = HashMap::new();
        users.insert("user".to_string(), create_user("User", USER_TOKEN, false, true));
        users.insert("admin".to_string(), create_user("Admin", ADMIN_TOKEN, true, true));
        users.insert(
            "disabled".to_string(),
            create_user("Disabled", DISABLED_TOKEN, true, false),
        );

        Config {
            users,
            ..Config::default()
        }
    }

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        user.get_email().to_string()
    }

    fn create_test_server() -> TestServer {
        let config = Arc::new(create_test_config());

        let admin_routes = Router::new()
            .route("/admin", get(|| async { "admin ok" }))
            .route_layer(middleware::from_fn(AuthMiddleware::require_admin));

        let app = Router::new()
            .route("/me", get(whoami))
            .merge(admin_routes)
            .route_layer(middleware::from_fn_with_state(
                config,
                AuthMiddleware::authenticate,
            ))
            .route("/public", get(|| async { "public" }));

        TestServer::new(app).unwrap()
    }

    #[test]
    fn test_auth_error_constructors() {
        let error = AuthError::missing_token();
        assert_eq!(error.error, "missing_authorization");
        assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);

        let error = AuthError::invalid_token();
        assert_eq!(error.error, "invalid_token");
        assert_eq!(error.status, 401);

        let error = AuthError::disabled_user();
        assert_eq!(error.error, "disabled_user");
        assert_eq!(error.status_code(), StatusCode::FORBIDDEN);

        let error = AuthError::admin_required();
        assert_eq!(error.message, "Admin access required");
        assert_eq!(error.status, 403);
    }

    #[test]
    fn test_authenticated_user_accessors() {
        let token = create_user("Admin", ADMIN_TOKEN, true, true);
        let id = token.id;
        let user = AuthenticatedUser::new(token);

        assert_eq!(user.user_id, id);
        assert!(user.is_admin());
        assert_eq!(user.get_name(), "Admin");
        assert_eq!(user.get_email(), "admin@example.com");
    }

    #[test]
    fn test_validate_request_token() {
        let config = create_test_config();

        let result = validate_request_token(&config, USER_TOKEN);
        assert_eq!(result.unwrap().name, "User");

        assert!(validate_request_token(&config, "").is_err());
        assert!(validate_request_token(&config, "short").is_err());
        assert!(validate_request_token(&config, "token\nwith\nnewlines").is_err());
        assert!(validate_request_token(&config, "unknown-token-xyz").is_err());

        let result = validate_request_token(&config, DISABLED_TOKEN);
        assert_eq!(result.unwrap_err().error, "disabled_user");
    }

    #[tokio::test]
    async fn test_missing_authorization_is_rejected() {
        let server = create_test_server();

        let response = server.get("/me").await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["error"]["type"], "missing_authorization");
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_rejected() {
        let server = create_test_server();

        let response = server
            .get("/me")
            .add_header(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_attaches_user() {
        let server = create_test_server();

        let response = server.get("/me").authorization_bearer(USER_TOKEN).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "user@example.com");
    }

    #[tokio::test]
    async fn test_disabled_user_is_forbidden() {
        let server = create_test_server();

        let response = server.get("/me").authorization_bearer(DISABLED_TOKEN).await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_guard() {
        let server = create_test_server();

        let response = server.get("/admin").authorization_bearer(USER_TOKEN).await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
        let body: Value = response.json();
        assert_eq!(body["message"], "Admin access required");

        let response = server.get("/admin").authorization_bearer(ADMIN_TOKEN).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "admin ok");

        let response = server.get("/admin").await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_public_route_skips_auth() {
        let server = create_test_server();

        let response = server.get("/public").await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
}
