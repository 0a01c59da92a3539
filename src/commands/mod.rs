//! 命令模块
//!
//! 界面层调用的所有命令接口，错误统一转为可展示的字符串，按功能分组：
//! - items: 藏品与统计
//! - categories: 分类管理
//! - explore: 博物馆检索
//! - config: 配置与偏好设置
//! - notifications: 通知与提醒

pub mod categories;
pub mod config;
pub mod explore;
pub mod items;
pub mod notifications;

// 重新导出所有命令
pub use categories::*;
pub use config::*;
pub use explore::*;
pub use items::*;
pub use notifications::*;

#[cfg(test)]
mod tests;
