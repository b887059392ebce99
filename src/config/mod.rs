//! 配置管理模块
//!
//! 提供 YAML 配置文件的加载、保存和默认值

mod path;
mod types;
mod yaml;

pub use path::{config_dir, default_config_path, expand_tilde};
pub use types::{ClientConfig, LoggingConfig};
pub use yaml::{load_config, load_config_or_default, save_config, ConfigError};
