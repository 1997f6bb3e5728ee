//! faqdesk CLI Tool
//!
//! Command line interface for managing and querying a faqdesk server

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "faqdesk-cli")]
#[command(about = "A CLI tool for managing faqdesk")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration file
    ValidateConfig {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.toml")]
        config: String,
    },
    /// Generate example configuration file
    GenerateConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config_example.toml")]
        output: String,
    },
    /// Ask a question through a running server
    Ask {
        /// Server base URL
        #[arg(short, long, default_value = "http://127.0.0.1:3000")]
        server: String,
        /// Bearer token of a configured user
        #[arg(short, long)]
        token: String,
        /// Question to ask
        #[arg(short, long)]
        question: String,
    },
}

#[derive(Deserialize)]
struct AskResponse {
    answer: String,
}

const EXAMPLE_CONFIG: &str = include_str!("../../config_example.toml");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ValidateConfig { config } => {
            println!("Validating configuration file: {}", config);
            match faqdesk_core::config::loader::load_config_from_path(&config) {
                Ok(cfg) => {
                    println!("✅ Configuration is valid");
                    println!("  - storage backend: {:?}", cfg.database.backend);
                    println!("  - completion model: {}", cfg.completion.model);
                    println!(
                        "  - {} users configured ({} admins)",
                        cfg.users.len(),
                        cfg.admin_count()
                    );
                    if !faqdesk_core::OpenAIClient::from_settings(&cfg.completion).has_api_key() {
                        println!("  ⚠️  no completion API key; set OPENAI_API_KEY before serving chat");
                    }
                }
                Err(e) => {
                    eprintln!("❌ Configuration validation failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::GenerateConfig { output } => {
            println!("Generating configuration file: {}", output);
            generate_config_file(&output)?;
            println!("✅ Configuration file generated successfully");
        }
        Commands::Ask {
            server,
            token,
            question,
        } => {
            let answer = ask(&server, &token, &question).await?;
            println!("{}", answer);
        }
    }

    Ok(())
}

/// 生成配置文件
fn generate_config_file(output_path: &str) -> Result<()> {
    std::fs::write(output_path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config file: {}", output_path))?;
    Ok(())
}

/// 通过服务器的 /chat 接口提问
async fn ask(server: &str, token: &str, question: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;
    let url = format!("{}/chat", server.trim_end_matches('/'));
    tracing::debug!("POST {}", url);

    let response = client
        .post(&url)
        .bearer_auth(token)
        .json(&json!({ "question": question }))
        .send()
        .await
        .with_context(|| format!("Failed to reach server at {}", server))?;

    let status = response.status();
    if !status.is_success() {
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = body["message"]
            .as_str()
            .unwrap_or("unknown error")
            .to_string();
        bail!("Server returned {}: {}", status, message);
    }

    let body: AskResponse = response.json().await.context("Invalid response body")?;
    Ok(body.answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_is_valid() {
        let config = faqdesk_core::config::loader::parse_config(EXAMPLE_CONFIG).unwrap();
        config.validate().unwrap();
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.admin_count(), 1);
        assert_eq!(config.completion.max_context_faqs, 3);
    }

    #[test]
    fn test_generate_config_writes_example() {
        let path = std::env::temp_dir().join(format!("faqdesk-config-{}.toml", std::process::id()));
        let path_str = path.to_str().unwrap();

        generate_config_file(path_str).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), EXAMPLE_CONFIG);
        std::fs::remove_file(&path).unwrap();
    }
}
