// 提醒调度器 - 按 cron 表达式定时发出藏品提醒

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::Local;
use cron::Schedule;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::{compose_reminder, ReminderNotifier, REMINDER_CATEGORY};
use crate::domains::{NotificationCenter, PreferenceStore};
use crate::event_bus::{AppEvent, EventBus};
use crate::statistics::StatisticsAggregator;
use crate::storage::NotificationRecord;

/// 提醒调度器
pub struct ReminderScheduler {
    schedule: Schedule,
    aggregator: Arc<StatisticsAggregator>,
    notifications: NotificationCenter,
    preferences: PreferenceStore,
    notifier: Arc<dyn ReminderNotifier>,
    event_bus: Arc<EventBus>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ReminderScheduler {
    /// 创建调度器，cron 表达式无效时返回错误
    pub fn new(
        expression: &str,
        aggregator: Arc<StatisticsAggregator>,
        notifications: NotificationCenter,
        preferences: PreferenceStore,
        notifier: Arc<dyn ReminderNotifier>,
        event_bus: Arc<EventBus>,
    ) -> Result<Self> {
        let schedule = Schedule::from_str(expression)
            .map_err(|e| anyhow!("无效的提醒计划 \"{}\": {}", expression, e))?;

        Ok(Self {
            schedule,
            aggregator,
            notifications,
            preferences,
            notifier,
            event_bus,
            task: Mutex::new(None),
        })
    }

    /// 执行一次提醒；用户关闭提醒时返回 None
    pub async fn run_once(&self) -> Result<Option<NotificationRecord>> {
        if !self.preferences.notifications_enabled().await? {
            debug!("用户已关闭提醒，跳过");
            return Ok(None);
        }

        let statistics = self.aggregator.compute().await?;
        let currency = self.preferences.currency().await?;
        let (title, content) = compose_reminder(&statistics, &currency);

        let record = self
            .notifications
            .post(&title, &content, REMINDER_CATEGORY)
            .await?;
        self.notifier.notify(&record).await?;

        self.event_bus.publish(AppEvent::ReminderPosted {
            notification_id: record.id,
        });
        Ok(Some(record))
    }

    /// 启动提醒任务（重复调用会替换旧任务）
    pub async fn start(self: Arc<Self>) {
        let scheduler = self.clone();
        let handle = tokio::spawn(async move {
            info!("提醒任务已启动");

            loop {
                let next = match scheduler.schedule.upcoming(Local).next() {
                    Some(next) => next,
                    None => {
                        warn!("提醒计划没有后续触发时间，任务结束");
                        break;
                    }
                };

                let wait = (next - Local::now()).to_std().unwrap_or_default();
                debug!("下一次提醒: {}", next.format("%Y-%m-%d %H:%M:%S"));
                tokio::time::sleep(wait).await;

                match scheduler.run_once().await {
                    Ok(Some(record)) => info!("已发出提醒通知 {}", record.id),
                    Ok(None) => {}
                    Err(e) => error!("提醒任务执行失败: {}", e),
                }
            }
        });

        if let Some(previous) = self.task.lock().await.replace(handle) {
            previous.abort();
        }
    }

    /// 停止提醒任务
    pub async fn stop(&self) {
        if let Some(handle) = self.task.lock().await.take() {
            handle.abort();
            info!("提醒任务已停止");
        }
    }

    /// 是否正在运行
    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}
