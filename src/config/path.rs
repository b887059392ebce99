//! 配置文件路径
//!
//! 默认配置位于 `~/.docchat/config.yaml`。

use std::path::{Path, PathBuf};

/// 配置目录名
const CONFIG_DIR_NAME: &str = ".docchat";

/// 配置文件名
const CONFIG_FILE_NAME: &str = "config.yaml";

/// 配置目录：`~/.docchat`，无法获取主目录时退回当前目录
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// 默认配置文件路径
pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// 展开 `~` 和 `~/path`，其余路径（包括 `~user/path`）原样返回
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    let Some(home_dir) = dirs::home_dir() else {
        return path.to_path_buf();
    };

    if path_str == "~" {
        home_dir
    } else if let Some(rest) = path_str.strip_prefix("~/") {
        home_dir.join(rest)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.ends_with(".docchat/config.yaml"));
    }

    #[test]
    fn test_expand_tilde_with_path() {
        let home = dirs::home_dir().expect("应该能获取主目录");
        assert_eq!(expand_tilde("~/.docchat/x.yaml"), home.join(".docchat/x.yaml"));
        assert_eq!(expand_tilde("~"), home);
    }

    #[test]
    fn test_expand_tilde_leaves_other_paths() {
        assert_eq!(expand_tilde("/etc/docchat.yaml"), PathBuf::from("/etc/docchat.yaml"));
        assert_eq!(expand_tilde("~other/x"), PathBuf::from("~other/x"));
    }
}
