// 藏品统计 - 合并多个聚合查询为一个统计快照
//
// 每次藏品或分类发生写操作后显式重新计算，并通过事件总线推送

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::event_bus::{AppEvent, EventBus};
use crate::storage::{CatalogRepository, Category, Item};

/// 单个分类的藏品数量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub item_count: i64,
}

/// 统计快照（不入库）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_items: i64,
    pub total_value: f64,
    /// 有藏品的分类，按数量倒序、名称正序
    pub category_counts: Vec<CategoryCount>,
    /// 最近修改的藏品，按修改时间倒序
    pub recent_additions: Vec<Item>,
    /// 未归类或指向已删除分类的藏品数量
    pub unassigned_items: i64,
}

impl Statistics {
    /// 某分类的藏品数量，没有藏品的分类返回 None
    pub fn count_for(&self, category_id: i64) -> Option<i64> {
        self.category_counts
            .iter()
            .find(|c| c.category.id == category_id)
            .map(|c| c.item_count)
    }

    /// 按分类名称查询数量
    pub fn count_for_name(&self, name: &str) -> Option<i64> {
        self.category_counts
            .iter()
            .find(|c| c.category.name == name)
            .map(|c| c.item_count)
    }
}

/// 合并各聚合查询结果
///
/// 分类计数按 ID 关联到分类列表，找不到分类的 ID 直接丢弃
pub fn combine(
    total_items: i64,
    total_value: f64,
    counts_by_id: &[(i64, i64)],
    categories: &[Category],
    recent_additions: Vec<Item>,
) -> Statistics {
    let by_id: HashMap<i64, &Category> = categories.iter().map(|c| (c.id, c)).collect();

    let mut category_counts: Vec<CategoryCount> = counts_by_id
        .iter()
        .filter(|(_, count)| *count > 0)
        .filter_map(|(id, count)| {
            by_id.get(id).map(|category| CategoryCount {
                category: (*category).clone(),
                item_count: *count,
            })
        })
        .collect();

    category_counts.sort_by(|a, b| {
        b.item_count
            .cmp(&a.item_count)
            .then_with(|| a.category.name.cmp(&b.category.name))
    });

    let resolved: i64 = category_counts.iter().map(|c| c.item_count).sum();

    Statistics {
        total_items,
        total_value,
        category_counts,
        recent_additions,
        unassigned_items: (total_items - resolved).max(0),
    }
}

/// 统计聚合器
pub struct StatisticsAggregator {
    repo: Arc<dyn CatalogRepository>,
    event_bus: Arc<EventBus>,
    recent_limit: RwLock<i64>,
    latest: RwLock<Option<Statistics>>,
    /// 串行化重算，先开始的计算不能覆盖后开始的结果
    refresh_lock: Mutex<()>,
}

impl StatisticsAggregator {
    pub fn new(repo: Arc<dyn CatalogRepository>, event_bus: Arc<EventBus>, recent_limit: i64) -> Self {
        Self {
            repo,
            event_bus,
            recent_limit: RwLock::new(recent_limit.max(1)),
            latest: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// 并发执行所有聚合查询并合并；任一查询失败则整体失败
    pub async fn compute(&self) -> Result<Statistics> {
        let limit = *self.recent_limit.read().await;

        let (total_items, total_value, counts, categories, recent) = tokio::try_join!(
            self.repo.count_items(),
            self.repo.sum_item_values(),
            self.repo.count_items_by_category(),
            self.repo.get_all_categories(),
            self.repo.get_recent_items(limit),
        )?;

        Ok(combine(total_items, total_value, &counts, &categories, recent))
    }

    /// 重新计算、保存并推送最新快照
    pub async fn refresh(&self) -> Result<Statistics> {
        let _guard = self.refresh_lock.lock().await;

        let statistics = self.compute().await?;
        debug!(
            "统计已更新: {} 件藏品, 总价值 {:.2}",
            statistics.total_items, statistics.total_value
        );

        *self.latest.write().await = Some(statistics.clone());
        self.event_bus.publish(AppEvent::StatisticsUpdated {
            statistics: statistics.clone(),
        });
        Ok(statistics)
    }

    /// 最近一次计算的快照，尚未计算时立即计算
    pub async fn current(&self) -> Result<Statistics> {
        if let Some(statistics) = self.latest.read().await.clone() {
            return Ok(statistics);
        }
        self.refresh().await
    }

    pub async fn set_recent_limit(&self, limit: i64) {
        *self.recent_limit.write().await = limit.max(1);
    }
}
