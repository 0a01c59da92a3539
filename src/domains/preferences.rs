// 偏好设置领域
//
// 扁平的字符串键值存储：读取带默认值，按 key 覆盖写入，后写者生效

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::storage::CatalogRepository;

/// 是否已完成引导
pub const KEY_ONBOARDING_COMPLETED: &str = "onboarding_completed";
/// 是否接收定时提醒
pub const KEY_NOTIFICATIONS_ENABLED: &str = "notifications_enabled";
/// 货币代码
pub const KEY_CURRENCY: &str = "currency";

/// 偏好设置存取器
#[derive(Clone)]
pub struct PreferenceStore {
    repo: Arc<dyn CatalogRepository>,
}

impl PreferenceStore {
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self {
        Self { repo }
    }

    /// 读取偏好，未设置时返回默认值
    pub async fn get(&self, key: &str, default: &str) -> Result<String> {
        Ok(self
            .repo
            .get_preference(key)
            .await?
            .map(|pref| pref.value)
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入偏好
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.repo.set_preference(key, value).await?;
        debug!("偏好已更新: {} = {}", key, value);
        Ok(())
    }

    /// 读取布尔偏好（只认 "true"/"false"，其余视为未设置）
    pub async fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        let value = self.get(key, &default.to_string()).await?;
        Ok(match value.trim() {
            "true" => true,
            "false" => false,
            _ => default,
        })
    }

    pub async fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        self.set(key, &value.to_string()).await
    }

    pub async fn onboarding_completed(&self) -> Result<bool> {
        self.get_bool(KEY_ONBOARDING_COMPLETED, false).await
    }

    pub async fn set_onboarding_completed(&self, completed: bool) -> Result<()> {
        self.set_bool(KEY_ONBOARDING_COMPLETED, completed).await
    }

    pub async fn notifications_enabled(&self) -> Result<bool> {
        self.get_bool(KEY_NOTIFICATIONS_ENABLED, true).await
    }

    pub async fn set_notifications_enabled(&self, enabled: bool) -> Result<()> {
        self.set_bool(KEY_NOTIFICATIONS_ENABLED, enabled).await
    }

    pub async fn currency(&self) -> Result<String> {
        self.get(KEY_CURRENCY, "USD").await
    }

    pub async fn set_currency(&self, currency: &str) -> Result<()> {
        self.set(KEY_CURRENCY, &currency.trim().to_uppercase()).await
    }
}
