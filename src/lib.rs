// 古董藏品管理 - 应用主库

// 声明模块
pub mod commands;
pub mod domains;
pub mod event_bus;
pub mod logger;
pub mod models;
pub mod museum;
pub mod reminder;
pub mod settings;
pub mod statistics;
pub mod storage;
pub mod utils;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use domains::{CollectionDomain, ExploreDomain, NotificationCenter, PreferenceStore, SystemDomain};
use event_bus::EventBus;
use museum::{MetMuseumClient, MuseumApi, MuseumSearch};
use reminder::{LogNotifier, ReminderNotifier, ReminderScheduler};
use settings::SettingsManager;
use statistics::StatisticsAggregator;
use storage::{CatalogRepository, NotificationCleaner, SqliteRepository};

/// 应用状态（按领域分组）
///
/// - 藏品领域：负责藏品、分类和统计
/// - 探索领域：负责博物馆检索
/// - 系统领域：负责配置、偏好、通知和后台任务
/// - 事件总线：用于领域间解耦通信
#[derive(Clone)]
pub struct AppState {
    /// 藏品领域管理器
    pub collection_domain: Arc<CollectionDomain>,
    /// 探索领域管理器
    pub explore_domain: Arc<ExploreDomain>,
    /// 系统领域管理器
    pub system_domain: Arc<SystemDomain>,
    /// 事件总线
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    /// 按配置创建完整的应用状态
    pub async fn new(settings: Arc<SettingsManager>, data_dir: &Path) -> Result<Self> {
        let config = settings.get().await;

        let db_path = utils::resolve_db_path(data_dir, &config.storage.db_path);
        let repo: Arc<dyn CatalogRepository> =
            Arc::new(SqliteRepository::new(&db_path.to_string_lossy()).await?);
        info!("数据库已连接: {} ({:?})", repo.db_type(), db_path);

        // 博物馆请求使用的 HTTP 客户端（复用连接池）
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.museum.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()?;

        let museum_api: Arc<dyn MuseumApi> = Arc::new(MetMuseumClient::with_client(
            config.museum.clone(),
            http_client,
        )?);

        Self::with_components(settings, repo, museum_api, Arc::new(LogNotifier)).await
    }

    /// 用给定的存储、博物馆 API 和通知器组装应用状态
    pub async fn with_components(
        settings: Arc<SettingsManager>,
        repo: Arc<dyn CatalogRepository>,
        museum_api: Arc<dyn MuseumApi>,
        notifier: Arc<dyn ReminderNotifier>,
    ) -> Result<Self> {
        let config = settings.get().await;
        let event_bus = Arc::new(EventBus::new(256));

        // ==================== 组装领域管理器 ====================

        let aggregator = Arc::new(StatisticsAggregator::new(
            repo.clone(),
            event_bus.clone(),
            config.recent_items_limit,
        ));
        let collection_domain = Arc::new(CollectionDomain::new(
            repo.clone(),
            aggregator.clone(),
            event_bus.clone(),
        ));

        let search = Arc::new(MuseumSearch::new(museum_api, &config.museum));
        let explore_domain = Arc::new(ExploreDomain::new(search));

        let preferences = PreferenceStore::new(repo.clone());
        let notifications = NotificationCenter::new(repo.clone());
        let reminder = Arc::new(ReminderScheduler::new(
            &config.reminder.schedule,
            aggregator,
            notifications.clone(),
            preferences.clone(),
            notifier,
            event_bus.clone(),
        )?);
        let cleaner = Arc::new(NotificationCleaner::new(
            repo,
            config.storage.notification_retention_days,
            config.storage.max_retention_days,
        ));

        let system_domain = Arc::new(SystemDomain::new(
            settings,
            preferences,
            notifications,
            reminder,
            cleaner,
        ));

        Ok(Self {
            collection_domain,
            explore_domain,
            system_domain,
            event_bus,
        })
    }

    /// 启动后台任务（定时提醒、通知清理）
    pub async fn start_background_tasks(&self) {
        let config = self.system_domain.get_settings().get().await;

        if config.reminder.enabled {
            self.system_domain.get_reminder().clone().start().await;
        } else {
            info!("定时提醒已在配置中关闭");
        }

        if config.storage.auto_cleanup_enabled {
            self.system_domain
                .get_cleaner()
                .clone()
                .start_cleanup_task(config.storage.cleanup_interval_hours);
        }

        // 首次计算统计
        if let Err(e) = self.collection_domain.refresh_statistics().await {
            error!("初始统计计算失败: {}", e);
        }
    }
}

// ==================== 应用入口 ====================

pub async fn run() -> Result<()> {
    let data_dir = utils::get_data_dir();
    let settings = Arc::new(SettingsManager::new(data_dir.join("config.json")).await?);
    let config = settings.get().await;

    // 初始化日志系统
    let _log_guard = logger::init(&config.logger_settings, &utils::get_log_dir())?;

    info!("初始化古董藏品管理后端，数据目录: {:?}", data_dir);

    let state = AppState::new(settings, &data_dir).await?;
    state.start_background_tasks().await;

    let statistics = commands::get_statistics(&state)
        .await
        .map_err(anyhow::Error::msg)?;
    info!(
        "藏品库已就绪: {} 件藏品, 总价值 {:.2}",
        statistics.total_items, statistics.total_value
    );

    tokio::signal::ctrl_c().await?;
    info!("收到退出信号，正在停止后台任务");
    state.system_domain.get_reminder().stop().await;
    Ok(())
}
