//! faqdesk API Server
//!
//! Main entry point for the FAQ and chat support service

use faqdesk_api::start_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    start_server().await
}
