//! YAML 配置加载与保存

use crate::config::path::expand_tilde;
use crate::config::types::ClientConfig;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML 解析错误: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("无效的地址: {0}")]
    InvalidUrl(String),

    #[error("配置无效: {0}")]
    Invalid(String),

    #[error("HTTP 客户端创建失败: {0}")]
    Client(String),
}

/// 从 YAML 文件加载配置
///
/// 路径支持 `~` 展开；缺省字段使用默认值，加载后会校验。
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ClientConfig, ConfigError> {
    let path = expand_tilde(path);
    let content = fs::read_to_string(&path)?;
    let config: ClientConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    debug!(path = %path.display(), "配置已加载");
    Ok(config)
}

/// 加载配置，文件不存在时返回默认配置
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<ClientConfig, ConfigError> {
    let expanded = expand_tilde(path);
    if !expanded.exists() {
        info!(path = %expanded.display(), "配置文件不存在，使用默认配置");
        return Ok(ClientConfig::default());
    }
    load_config(expanded)
}

/// 保存配置为 YAML，必要时创建父目录
pub fn save_config<P: AsRef<Path>>(path: P, config: &ClientConfig) -> Result<(), ConfigError> {
    let path = expand_tilde(path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_yaml::to_string(config)?;
    fs::write(&path, content)?;
    debug!(path = %path.display(), "配置已保存");
    Ok(())
}
