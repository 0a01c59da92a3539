// 通知领域
//
// 通知记录只追加；之后仅允许修改已读标记或删除

use std::sync::Arc;

use anyhow::Result;

use crate::storage::{CatalogRepository, NotificationRecord};

/// 通知中心
#[derive(Clone)]
pub struct NotificationCenter {
    repo: Arc<dyn CatalogRepository>,
}

impl NotificationCenter {
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self {
        Self { repo }
    }

    /// 追加一条通知，返回入库后的记录
    pub async fn post(&self, title: &str, content: &str, category: &str) -> Result<NotificationRecord> {
        let mut record = NotificationRecord::new(title, content, category);
        record.id = self.repo.insert_notification(&record).await?;
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<NotificationRecord>> {
        self.repo.get_notifications().await
    }

    pub async fn unread_count(&self) -> Result<i64> {
        self.repo.count_unread_notifications().await
    }

    pub async fn mark_read(&self, notification_id: i64) -> Result<bool> {
        self.repo.mark_notification_read(notification_id).await
    }

    pub async fn mark_all_read(&self) -> Result<u64> {
        self.repo.mark_all_notifications_read().await
    }

    pub async fn delete(&self, notification_id: i64) -> Result<bool> {
        self.repo.delete_notification(notification_id).await
    }
}
