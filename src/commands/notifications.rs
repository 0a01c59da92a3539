//! 通知命令

use crate::models::*;
use crate::utils::validate_id;
use crate::AppState;

/// 获取通知列表
pub async fn list_notifications(state: &AppState) -> Result<Vec<NotificationRecord>, String> {
    state
        .system_domain
        .get_notifications()
        .list()
        .await
        .map_err(|e| e.to_string())
}

/// 未读通知数量
pub async fn get_unread_count(state: &AppState) -> Result<i64, String> {
    state
        .system_domain
        .get_notifications()
        .unread_count()
        .await
        .map_err(|e| e.to_string())
}

/// 标记通知已读
pub async fn mark_notification_read(state: &AppState, notification_id: i64) -> Result<(), String> {
    validate_id("通知", notification_id)?;
    let updated = state
        .system_domain
        .get_notifications()
        .mark_read(notification_id)
        .await
        .map_err(|e| e.to_string())?;

    if !updated {
        return Err(format!("通知 {} 不存在", notification_id));
    }
    Ok(())
}

/// 全部标记已读
pub async fn mark_all_notifications_read(state: &AppState) -> Result<u64, String> {
    state
        .system_domain
        .get_notifications()
        .mark_all_read()
        .await
        .map_err(|e| e.to_string())
}

/// 删除通知
pub async fn delete_notification(state: &AppState, notification_id: i64) -> Result<(), String> {
    validate_id("通知", notification_id)?;
    state
        .system_domain
        .get_notifications()
        .delete(notification_id)
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

/// 立即发送一次提醒（用于设置页测试）
pub async fn send_test_reminder(state: &AppState) -> Result<Option<NotificationRecord>, String> {
    state
        .system_domain
        .get_reminder()
        .run_once()
        .await
        .map_err(|e| e.to_string())
}

/// 立即清理过期通知
pub async fn cleanup_notifications(state: &AppState) -> Result<u64, String> {
    let deleted = state
        .system_domain
        .get_cleaner()
        .perform_cleanup()
        .await
        .map_err(|e| e.to_string())?;

    state
        .event_bus
        .publish(crate::event_bus::AppEvent::NotificationsCleaned { deleted });
    Ok(deleted)
}
