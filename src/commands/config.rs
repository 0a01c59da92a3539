//! 配置与偏好设置命令
//!
//! 提供应用配置的读取和更新，以及键值偏好设置的存取

use crate::event_bus::AppEvent;
use crate::models::{AppConfig, PersistedAppConfig};
use crate::utils::validate_preference_key;
use crate::AppState;
use tracing::info;

/// 获取应用配置
pub async fn get_app_config(state: &AppState) -> Result<PersistedAppConfig, String> {
    Ok(state.system_domain.get_settings().get().await)
}

/// 更新配置
pub async fn update_config(state: &AppState, config: AppConfig) -> Result<PersistedAppConfig, String> {
    let cleaner = state.system_domain.get_cleaner();

    // 先校验保留天数，避免写入无效配置
    if let Some(storage) = &config.storage {
        cleaner
            .validate_retention_days(storage.notification_retention_days)
            .map_err(|e| e.to_string())?;
    }

    let updated_config = state
        .system_domain
        .get_settings()
        .update(config.clone())
        .await
        .map_err(|e| e.to_string())?;

    // 配置保存成功后再应用到运行中的组件
    if config.storage.is_some() {
        cleaner
            .set_retention_days(updated_config.storage.notification_retention_days)
            .await
            .map_err(|e| e.to_string())?;
    }

    // 更新统计条数
    if config.recent_items_limit.is_some() {
        state
            .collection_domain
            .get_aggregator()
            .set_recent_limit(updated_config.recent_items_limit)
            .await;
    }

    if config.museum.is_some() || config.reminder.is_some() || config.logger_settings.is_some() {
        info!("博物馆、提醒或日志配置已保存，重启后生效");
    }

    state.event_bus.publish(AppEvent::ConfigUpdated {
        config_type: "app".to_string(),
    });
    Ok(updated_config)
}

/// 读取偏好设置
pub async fn get_preference(state: &AppState, key: String, default: String) -> Result<String, String> {
    validate_preference_key(&key)?;
    state
        .system_domain
        .get_preferences()
        .get(&key, &default)
        .await
        .map_err(|e| e.to_string())
}

/// 写入偏好设置
pub async fn set_preference(state: &AppState, key: String, value: String) -> Result<(), String> {
    validate_preference_key(&key)?;
    state
        .system_domain
        .get_preferences()
        .set(&key, &value)
        .await
        .map_err(|e| e.to_string())
}

/// 是否已完成引导
pub async fn is_onboarding_completed(state: &AppState) -> Result<bool, String> {
    state
        .system_domain
        .get_preferences()
        .onboarding_completed()
        .await
        .map_err(|e| e.to_string())
}

/// 标记引导完成
pub async fn complete_onboarding(state: &AppState) -> Result<(), String> {
    state
        .system_domain
        .get_preferences()
        .set_onboarding_completed(true)
        .await
        .map_err(|e| e.to_string())
}

/// 开关定时提醒
pub async fn set_notifications_enabled(state: &AppState, enabled: bool) -> Result<(), String> {
    state
        .system_domain
        .get_preferences()
        .set_notifications_enabled(enabled)
        .await
        .map_err(|e| e.to_string())
}
