// 存储模块 - 统一的本地数据库抽象层

// 子模块
pub mod cleaner;
pub mod config;
pub mod models;
pub mod repository;

// 重新导出主要类型
pub use cleaner::NotificationCleaner;
pub use config::StorageConfig;
pub use models::*;
pub use repository::sqlite::SqliteRepository;
pub use repository::CatalogRepository;
