//! 文件系统路径工具
//!
//! 提供跨平台的应用数据目录与日志目录

use std::path::PathBuf;

const APP_DIR_NAME: &str = "antique-vault";

/// 获取应用数据目录（跨平台）
///
/// - macOS: ~/Library/Application Support/antique-vault
/// - Windows: %APPDATA%/antique-vault
/// - Linux: ~/.local/share/antique-vault
pub fn get_data_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join("Library/Application Support").join(APP_DIR_NAME)
    } else if cfg!(target_os = "windows") {
        let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(appdata).join(APP_DIR_NAME)
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".local/share").join(APP_DIR_NAME)
    }
}

/// 获取日志目录路径（跨平台）
///
/// - macOS: ~/Library/Logs/antique-vault
/// - 其他平台: <数据目录>/logs
pub fn get_log_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join("Library/Logs").join(APP_DIR_NAME)
    } else {
        get_data_dir().join("logs")
    }
}

/// 解析数据库路径：绝对路径原样返回，相对路径基于数据目录
pub fn resolve_db_path(data_dir: &std::path::Path, db_path: &str) -> PathBuf {
    let path = PathBuf::from(db_path);
    if path.is_absolute() {
        path
    } else {
        data_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_db_path() {
        let data_dir = PathBuf::from("/tmp/vault");
        assert_eq!(
            resolve_db_path(&data_dir, "antique-vault.db"),
            PathBuf::from("/tmp/vault/antique-vault.db")
        );

        let absolute = std::env::temp_dir().join("other.db");
        assert_eq!(resolve_db_path(&data_dir, absolute.to_str().unwrap()), absolute);
    }

    #[test]
    fn test_log_dir_named_after_app() {
        assert!(get_log_dir().to_string_lossy().contains(APP_DIR_NAME));
    }
}
