use crate::repositories::Repositories;
use crate::router::router::create_app_router;
use faqdesk_core::config::loader::{get_config_path, load_config};
use faqdesk_core::{CompletionClient, Config, OpenAIClient, UserToken};

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repositories: Repositories,
    pub completion: Arc<dyn CompletionClient>,
}

impl AppState {
    /// 连接存储、同步用户并创建补全客户端
    pub async fn new(config: Config) -> Result<Self> {
        let repositories = Repositories::connect(&config.database).await?;

        let users: Vec<UserToken> = config.users.values().cloned().collect();
        let synced = repositories.users.sync(&users).await?;
        info!(
            "Synced {} users ({} admins) into storage",
            synced,
            config.admin_count()
        );

        let client = OpenAIClient::from_settings(&config.completion);
        if client.has_api_key() {
            info!(
                "Completion client ready: model={}, url={}",
                client.model(),
                client.api_url()
            );
        } else {
            warn!("OPENAI_API_KEY is not set; chat requests will fail until it is configured");
        }

        Ok(Self::from_parts(config, repositories, Arc::new(client)))
    }

    pub fn from_parts(
        config: Config,
        repositories: Repositories,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            repositories,
            completion,
        }
    }
}

/// 创建应用路由
pub fn create_app(state: AppState) -> Router {
    create_app_router(state)
}

/// 启动应用服务器
pub async fn start_server() -> Result<()> {
    // 初始化日志 - 完全依赖RUST_LOG环境变量
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Starting faqdesk API server...");

    let config_path = get_config_path();
    info!("Configuration file: {}", config_path);

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };
    let bind_addr = config.server.bind_address.clone();

    let app_state = match AppState::new(config).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application: {:#}", e);
            return Err(e);
        }
    };

    let app = create_app(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("Server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET    /                        - API information");
    info!("  GET    /health                  - Health check");
    info!("  GET    /faqs                    - List FAQs");
    info!("  GET    /faqs/search             - Search FAQs");
    info!("  GET    /faqs/{{id}}               - Get FAQ");
    info!("  POST   /faqs                    - Create FAQ (admin)");
    info!("  PUT    /faqs/{{id}}               - Update FAQ (admin)");
    info!("  DELETE /faqs/{{id}}               - Delete FAQ (admin)");
    info!("  POST   /chat                    - Ask a question");
    info!("  GET    /admin/chat-logs         - Chat logs (admin)");
    info!("  GET    /admin/report/chat-logs  - Chat log report (admin)");

    // 设置优雅关闭
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install CTRL+C signal handler: {}", e);
        }
        info!("Shutdown signal received");
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
