// 数据模型模块 - 定义配置与跨模块共享的数据结构

use serde::{Deserialize, Serialize};

// 重新导出其他模块的类型
pub use crate::museum::{Department, ExternalArtifact};
pub use crate::statistics::{CategoryCount, Statistics};
pub use crate::storage::{
    Category, CategoryWithCount, Item, NotificationRecord, Preference, StorageConfig,
};

/// 应用配置更新（字段为空表示不修改）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 存储配置
    pub storage: Option<StorageConfig>,
    /// 博物馆 API 配置
    pub museum: Option<MuseumConfig>,
    /// 提醒配置
    pub reminder: Option<ReminderConfig>,
    /// 日志设置
    pub logger_settings: Option<LoggerSettings>,
    /// 统计中"最近新增"的条数
    pub recent_items_limit: Option<i64>,
}

/// 博物馆 API 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuseumConfig {
    /// API 根地址
    pub base_url: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
    /// 每次搜索拉取详情的最大条数
    pub max_results: usize,
    /// 只搜索带图片的藏品
    pub has_images: bool,
    /// 探索页默认搜索词
    pub featured_query: String,
}

impl Default for MuseumConfig {
    fn default() -> Self {
        Self {
            base_url: "https://collectionapi.metmuseum.org/public/collection/v1".to_string(),
            timeout_secs: 30,
            max_results: 15,
            has_images: true,
            featured_query: "antique".to_string(),
        }
    }
}

/// 定时提醒配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// 是否启用定时提醒
    pub enabled: bool,
    /// cron 表达式（秒 分 时 日 月 周）
    pub schedule: String,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: "0 0 9 * * *".to_string(), // 每天 09:00
        }
    }
}

/// 日志设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 是否写入滚动日志文件
    pub enable_file_logging: bool,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_file_logging: true,
        }
    }
}

/// 持久化的应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedAppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub museum: MuseumConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub logger_settings: LoggerSettings,
    #[serde(default = "default_recent_items_limit")]
    pub recent_items_limit: i64,
}

fn default_recent_items_limit() -> i64 {
    5
}

impl Default for PersistedAppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            museum: MuseumConfig::default(),
            reminder: ReminderConfig::default(),
            logger_settings: LoggerSettings::default(),
            recent_items_limit: default_recent_items_limit(),
        }
    }
}
