// 定时提醒模块
//
// 按 cron 计划读取当前统计，写入一条提醒通知并交给通知器发出

pub mod scheduler;

pub use scheduler::ReminderScheduler;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::statistics::Statistics;
use crate::storage::NotificationRecord;

/// 提醒通知的分类标记
pub const REMINDER_CATEGORY: &str = "reminder";

/// 通知发送接口（系统通知由外部平台实现）
#[async_trait]
pub trait ReminderNotifier: Send + Sync {
    async fn notify(&self, notification: &NotificationRecord) -> Result<()>;
}

/// 只写日志的通知器
pub struct LogNotifier;

#[async_trait]
impl ReminderNotifier for LogNotifier {
    async fn notify(&self, notification: &NotificationRecord) -> Result<()> {
        info!("[通知] {}: {}", notification.title, notification.content);
        Ok(())
    }
}

/// 根据统计生成提醒标题和内容
pub fn compose_reminder(statistics: &Statistics, currency: &str) -> (String, String) {
    if statistics.total_items == 0 {
        return (
            "开始你的收藏".to_string(),
            "还没有登记任何藏品，添加第一件古董吧。".to_string(),
        );
    }

    let mut content = format!(
        "您的收藏共有 {} 件藏品，总价值 {} {:.2}。",
        statistics.total_items, currency, statistics.total_value
    );
    if let Some(top) = statistics.category_counts.first() {
        content.push_str(&format!(
            "最多的分类：{}（{} 件）。",
            top.category.name, top.item_count
        ));
    }
    if let Some(latest) = statistics.recent_additions.first() {
        content.push_str(&format!("最近更新：{}。", latest.name));
    }

    ("藏品提醒".to_string(), content)
}
