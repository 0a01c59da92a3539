// 通知清理模块 - 按保留天数删除过期通知

use super::CatalogRepository;
use anyhow::Result;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{interval, Duration};
use tracing::{error, info};

/// 通知清理器
pub struct NotificationCleaner {
    /// 数据仓库
    repo: Arc<dyn CatalogRepository>,
    /// 通知保留天数（使用RwLock实现内部可变性）
    retention_days: Arc<RwLock<i64>>,
    /// 最大保留天数
    max_retention_days: i64,
}

impl NotificationCleaner {
    /// 创建新的清理器
    pub fn new(repo: Arc<dyn CatalogRepository>, retention_days: i64, max_retention_days: i64) -> Self {
        Self {
            repo,
            retention_days: Arc::new(RwLock::new(retention_days)),
            max_retention_days,
        }
    }

    /// 校验保留天数是否在允许范围内
    pub fn validate_retention_days(&self, days: i64) -> Result<()> {
        if days < 1 {
            return Err(anyhow::anyhow!("保留天数必须至少为1天"));
        }
        if days > self.max_retention_days {
            return Err(anyhow::anyhow!(
                "保留天数不能超过{}天",
                self.max_retention_days
            ));
        }
        Ok(())
    }

    /// 设置保留天数
    pub async fn set_retention_days(&self, days: i64) -> Result<()> {
        self.validate_retention_days(days)?;

        let mut retention_days = self.retention_days.write().await;
        *retention_days = days;
        info!("通知保留天数已更新为: {}天", days);
        Ok(())
    }

    /// 获取当前保留天数
    pub async fn get_retention_days(&self) -> i64 {
        *self.retention_days.read().await
    }

    /// 启动自动清理任务
    pub fn start_cleanup_task(self: Arc<Self>, interval_hours: u64) {
        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(interval_hours.max(1) * 3600));
            info!("通知清理任务已启动，每 {} 小时检查一次", interval_hours.max(1));

            loop {
                interval.tick().await;

                if let Err(e) = self.perform_cleanup().await {
                    error!("清理任务执行失败: {}", e);
                }
            }
        });
    }

    /// 执行清理操作，返回删除条数
    pub async fn perform_cleanup(&self) -> Result<u64> {
        let retention_days = *self.retention_days.read().await;
        let cutoff = Utc::now() - ChronoDuration::days(retention_days);
        info!("开始清理 {} 之前的通知", cutoff.format("%Y-%m-%d"));

        let deleted = self.repo.delete_notifications_older_than(cutoff).await?;

        info!("清理完成，删除了 {} 条通知", deleted);
        Ok(deleted)
    }
}
