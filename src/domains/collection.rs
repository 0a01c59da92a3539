// 藏品领域管理器
//
// 负责藏品与分类的增删改查，以及写操作后的统计重算
// 包含 CatalogRepository 和 StatisticsAggregator 两个核心组件

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::{error, info};

use crate::event_bus::{AppEvent, EventBus};
use crate::statistics::{Statistics, StatisticsAggregator};
use crate::storage::{CatalogRepository, Category, CategoryWithCount, Item};

/// 藏品领域管理器 - 负责藏品、分类和统计
#[derive(Clone)]
pub struct CollectionDomain {
    repo: Arc<dyn CatalogRepository>,
    aggregator: Arc<StatisticsAggregator>,
    event_bus: Arc<EventBus>,
}

impl CollectionDomain {
    /// 创建新的藏品领域管理器
    pub fn new(
        repo: Arc<dyn CatalogRepository>,
        aggregator: Arc<StatisticsAggregator>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self { repo, aggregator, event_bus }
    }

    /// 获取统计聚合器
    pub fn get_aggregator(&self) -> &Arc<StatisticsAggregator> {
        &self.aggregator
    }

    /// 写操作完成后推送事件并重算统计
    ///
    /// 统计失败只记录日志，不影响已完成的写操作
    async fn after_write(&self, event: AppEvent) {
        self.event_bus.publish(event);
        if let Err(e) = self.aggregator.refresh().await {
            error!("重新计算统计失败: {}", e);
        }
    }

    // ========== 藏品 ==========

    /// 新增藏品，返回入库后的记录
    pub async fn add_item(&self, item: &Item) -> Result<Item> {
        let id = self.repo.insert_item(item).await?;
        let saved = self
            .repo
            .get_item(id)
            .await?
            .ok_or_else(|| anyhow!("藏品 {} 保存后未找到", id))?;

        info!("已新增藏品 {}: {}", id, saved.name);
        self.after_write(AppEvent::ItemSaved { item_id: id }).await;
        Ok(saved)
    }

    /// 修改藏品
    pub async fn update_item(&self, item: &Item) -> Result<Item> {
        self.repo.update_item(item).await?;
        let saved = self
            .repo
            .get_item(item.id)
            .await?
            .ok_or_else(|| anyhow!("藏品 {} 不存在", item.id))?;

        self.after_write(AppEvent::ItemSaved { item_id: item.id }).await;
        Ok(saved)
    }

    /// 删除藏品，返回是否存在
    pub async fn delete_item(&self, item_id: i64) -> Result<bool> {
        let deleted = self.repo.delete_item(item_id).await?;
        if deleted {
            info!("已删除藏品 {}", item_id);
            self.after_write(AppEvent::ItemDeleted { item_id }).await;
        }
        Ok(deleted)
    }

    pub async fn get_item(&self, item_id: i64) -> Result<Option<Item>> {
        self.repo.get_item(item_id).await
    }

    pub async fn list_items(&self) -> Result<Vec<Item>> {
        self.repo.get_all_items().await
    }

    pub async fn items_by_category(&self, category_id: i64) -> Result<Vec<Item>> {
        self.repo.get_items_by_category(category_id).await
    }

    /// 搜索藏品，空查询返回全部
    pub async fn search_items(&self, query: &str) -> Result<Vec<Item>> {
        let query = query.trim();
        if query.is_empty() {
            return self.repo.get_all_items().await;
        }
        self.repo.search_items(query).await
    }

    // ========== 分类 ==========

    pub async fn add_category(&self, category: &Category) -> Result<Category> {
        let id = self.repo.insert_category(category).await?;
        let saved = self
            .repo
            .get_category(id)
            .await?
            .ok_or_else(|| anyhow!("分类 {} 保存后未找到", id))?;

        self.after_write(AppEvent::CategoryChanged { category_id: id }).await;
        Ok(saved)
    }

    pub async fn update_category(&self, category: &Category) -> Result<Category> {
        self.repo.update_category(category).await?;
        self.after_write(AppEvent::CategoryChanged {
            category_id: category.id,
        })
        .await;
        Ok(category.clone())
    }

    /// 删除分类，原分类下的藏品保留（统计中计入未归类）
    pub async fn delete_category(&self, category_id: i64) -> Result<bool> {
        let deleted = self.repo.delete_category(category_id).await?;
        if deleted {
            info!("已删除分类 {}", category_id);
            self.after_write(AppEvent::CategoryChanged { category_id }).await;
        }
        Ok(deleted)
    }

    pub async fn get_category(&self, category_id: i64) -> Result<Option<Category>> {
        self.repo.get_category(category_id).await
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryWithCount>> {
        self.repo.get_categories_with_counts().await
    }

    // ========== 统计 ==========

    /// 当前统计快照
    pub async fn statistics(&self) -> Result<Statistics> {
        self.aggregator.current().await
    }

    /// 强制重新计算统计
    pub async fn refresh_statistics(&self) -> Result<Statistics> {
        self.aggregator.refresh().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteRepository;

    async fn open_domain() -> (tempfile::TempDir, CollectionDomain, Arc<EventBus>) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("catalog.db");
        let repo: Arc<dyn CatalogRepository> =
            Arc::new(SqliteRepository::new(db_path.to_str().unwrap()).await.unwrap());
        let bus = Arc::new(EventBus::new(64));
        let aggregator = Arc::new(StatisticsAggregator::new(repo.clone(), bus.clone(), 5));
        (dir, CollectionDomain::new(repo, aggregator, bus.clone()), bus)
    }

    #[tokio::test]
    async fn test_writes_refresh_statistics() {
        let (_dir, domain, _bus) = open_domain().await;
        let category = domain
            .add_category(&Category::new("Scientific instruments", Some("compass"), None))
            .await
            .unwrap();

        let sextant = domain
            .add_item(&Item::new("Brass sextant", Some(category.id), 800.0, 4))
            .await
            .unwrap();
        domain
            .add_item(&Item::new("Pocket globe", Some(category.id), 1200.0, 3))
            .await
            .unwrap();

        let stats = domain.statistics().await.unwrap();
        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.total_value, 2000.0);
        assert_eq!(stats.count_for(category.id), Some(2));

        let mut edited = sextant.clone();
        edited.value = 950.0;
        domain.update_item(&edited).await.unwrap();
        assert_eq!(domain.statistics().await.unwrap().total_value, 2150.0);
    }

    #[tokio::test]
    async fn test_deleted_category_items_become_unassigned() {
        let (_dir, domain, _bus) = open_domain().await;
        let category = domain
            .add_category(&Category::new("Stamps", None, None))
            .await
            .unwrap();
        domain
            .add_item(&Item::new("Penny black", Some(category.id), 300.0, 2))
            .await
            .unwrap();

        assert!(domain.delete_category(category.id).await.unwrap());

        let stats = domain.statistics().await.unwrap();
        assert_eq!(stats.total_items, 1);
        assert_eq!(stats.count_for(category.id), None);
        assert_eq!(stats.unassigned_items, 1);
    }

    #[tokio::test]
    async fn test_events_published() {
        let (_dir, domain, bus) = open_domain().await;
        let mut receiver = bus.subscribe();

        let item = domain
            .add_item(&Item::new("Carriage clock", None, 220.0, 5))
            .await
            .unwrap();

        match receiver.recv().await {
            Ok(AppEvent::ItemSaved { item_id }) => assert_eq!(item_id, item.id),
            other => panic!("未收到藏品保存事件: {:?}", other),
        }
        assert!(matches!(
            receiver.recv().await,
            Ok(AppEvent::StatisticsUpdated { .. })
        ));

        // 删除不存在的藏品不产生事件
        assert!(!domain.delete_item(item.id + 100).await.unwrap());
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_blank_search_lists_all() {
        let (_dir, domain, _bus) = open_domain().await;
        domain.add_item(&Item::new("Delft tile", None, 30.0, 3)).await.unwrap();
        domain.add_item(&Item::new("Pewter jug", None, 55.0, 3)).await.unwrap();

        assert_eq!(domain.search_items("  ").await.unwrap().len(), 2);
        assert_eq!(domain.search_items("delft").await.unwrap().len(), 1);
    }
}
