// 存储配置定义

use serde::{Deserialize, Serialize};

/// 存储配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 数据库文件路径（相对路径基于应用数据目录）
    pub db_path: String,
    /// 通知保留天数
    pub notification_retention_days: i64,
    /// 最大保留天数
    pub max_retention_days: i64,
    /// 是否启用自动清理
    pub auto_cleanup_enabled: bool,
    /// 清理检查间隔（小时）
    pub cleanup_interval_hours: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "antique-vault.db".to_string(),
            notification_retention_days: 30,
            max_retention_days: 365,
            auto_cleanup_enabled: true,
            cleanup_interval_hours: 1,
        }
    }
}
