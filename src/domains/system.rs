// 系统领域管理器
//
// 负责配置、偏好、通知、定时任务和基础设施相关的功能

use std::sync::Arc;

use crate::domains::{NotificationCenter, PreferenceStore};
use crate::reminder::ReminderScheduler;
use crate::settings::SettingsManager;
use crate::storage::NotificationCleaner;

/// 系统领域管理器 - 负责配置、偏好、通知和后台任务
#[derive(Clone)]
pub struct SystemDomain {
    settings: Arc<SettingsManager>,
    preferences: PreferenceStore,
    notifications: NotificationCenter,
    reminder: Arc<ReminderScheduler>,
    cleaner: Arc<NotificationCleaner>,
}

impl SystemDomain {
    /// 创建新的系统领域管理器
    pub fn new(
        settings: Arc<SettingsManager>,
        preferences: PreferenceStore,
        notifications: NotificationCenter,
        reminder: Arc<ReminderScheduler>,
        cleaner: Arc<NotificationCleaner>,
    ) -> Self {
        Self {
            settings,
            preferences,
            notifications,
            reminder,
            cleaner,
        }
    }

    /// 获取设置管理器
    pub fn get_settings(&self) -> &Arc<SettingsManager> {
        &self.settings
    }

    /// 获取偏好设置
    pub fn get_preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    /// 获取通知中心
    pub fn get_notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// 获取提醒调度器
    pub fn get_reminder(&self) -> &Arc<ReminderScheduler> {
        &self.reminder
    }

    /// 获取通知清理器
    pub fn get_cleaner(&self) -> &Arc<NotificationCleaner> {
        &self.cleaner
    }
}
