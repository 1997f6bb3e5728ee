use crate::config::model::Config;
use anyhow::Context;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 配置文件路径：优先使用 CONFIG_PATH 环境变量
pub fn get_config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

pub fn load_config() -> Result<Config, anyhow::Error> {
    load_config_from_path(&get_config_path())
}

pub fn load_config_from_path(config_path: &str) -> Result<Config, anyhow::Error> {
    let config_str = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path))?;
    let mut config = parse_config(&config_str)?;
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// 只解析，不应用环境变量也不校验
pub fn parse_config(config_str: &str) -> Result<Config, anyhow::Error> {
    let config: Config = toml::from_str(config_str).context("Failed to parse config file")?;
    Ok(config)
}
