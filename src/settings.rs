use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::RwLock;

use crate::models::{AppConfig, PersistedAppConfig};

pub struct SettingsManager {
    path: PathBuf,
    data: RwLock<PersistedAppConfig>,
}

impl SettingsManager {
    pub async fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let initial = match tokio::fs::read(&path).await {
            Ok(bytes) if !bytes.is_empty() => {
                serde_json::from_slice::<PersistedAppConfig>(&bytes).unwrap_or_default()
            }
            _ => {
                let default = PersistedAppConfig::default();
                let json = serde_json::to_string_pretty(&default)?;
                tokio::fs::write(&path, json).await?;
                default
            }
        };

        Ok(Self {
            path,
            data: RwLock::new(initial),
        })
    }

    pub async fn get(&self) -> PersistedAppConfig {
        self.data.read().await.clone()
    }

    pub async fn update(&self, update: AppConfig) -> Result<PersistedAppConfig> {
        let mut current = self.data.write().await;
        let mut config = current.clone();

        if let Some(storage) = update.storage {
            config.storage = storage;
        }
        if let Some(museum) = update.museum {
            config.museum = museum;
        }
        if let Some(reminder) = update.reminder {
            config.reminder = reminder;
        }
        if let Some(logger) = update.logger_settings {
            config.logger_settings = logger;
        }
        if let Some(limit) = update.recent_items_limit {
            config.recent_items_limit = limit.max(1);
        }

        self.save(&config).await?;
        *current = config.clone();
        Ok(config)
    }

    async fn save(&self, config: &PersistedAppConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReminderConfig;

    #[tokio::test]
    async fn test_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let settings = SettingsManager::new(path.clone()).await.unwrap();
        assert!(path.exists());
        assert_eq!(settings.get().await, PersistedAppConfig::default());
    }

    #[tokio::test]
    async fn test_partial_update_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let settings = SettingsManager::new(path.clone()).await.unwrap();
        settings
            .update(AppConfig {
                reminder: Some(ReminderConfig {
                    enabled: false,
                    schedule: "0 30 20 * * *".to_string(),
                }),
                recent_items_limit: Some(8),
                ..Default::default()
            })
            .await
            .unwrap();

        let reloaded = SettingsManager::new(path).await.unwrap().get().await;
        assert!(!reloaded.reminder.enabled);
        assert_eq!(reloaded.recent_items_limit, 8);
        assert_eq!(reloaded.museum, Default::default());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let settings = SettingsManager::new(path.clone()).await.unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let result = settings
            .update(AppConfig {
                recent_items_limit: Some(12),
                ..Default::default()
            })
            .await;
        assert!(result.is_err());
        assert_eq!(settings.get().await, PersistedAppConfig::default());
    }
}
