// Repository 抽象层 - 定义本地存储操作接口

pub mod sqlite;

use super::models::*;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 数据库操作接口 - 所有存储实现必须实现此 trait
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // ========== 藏品操作 ==========

    /// 插入新藏品，返回新 ID
    async fn insert_item(&self, item: &Item) -> Result<i64>;

    /// 更新藏品（updated_at 由存储层写入当前时间）
    async fn update_item(&self, item: &Item) -> Result<()>;

    /// 删除藏品，返回是否存在
    async fn delete_item(&self, item_id: i64) -> Result<bool>;

    /// 获取藏品
    async fn get_item(&self, item_id: i64) -> Result<Option<Item>>;

    /// 获取所有藏品（按修改时间倒序）
    async fn get_all_items(&self) -> Result<Vec<Item>>;

    /// 获取某分类下的藏品
    async fn get_items_by_category(&self, category_id: i64) -> Result<Vec<Item>>;

    /// 文本搜索（LIKE 子串匹配）
    async fn search_items(&self, query: &str) -> Result<Vec<Item>>;

    /// 最近修改的藏品
    async fn get_recent_items(&self, limit: i64) -> Result<Vec<Item>>;

    // ========== 聚合查询 ==========

    /// 藏品总数
    async fn count_items(&self) -> Result<i64>;

    /// 藏品总价值（无藏品时为 0）
    async fn sum_item_values(&self) -> Result<f64>;

    /// 按分类 ID 统计藏品数量 (category_id, count)
    async fn count_items_by_category(&self) -> Result<Vec<(i64, i64)>>;

    // ========== 分类操作 ==========

    async fn insert_category(&self, category: &Category) -> Result<i64>;

    async fn update_category(&self, category: &Category) -> Result<()>;

    /// 删除分类（不级联处理藏品）
    async fn delete_category(&self, category_id: i64) -> Result<bool>;

    async fn get_category(&self, category_id: i64) -> Result<Option<Category>>;

    /// 所有分类（按名称排序）
    async fn get_all_categories(&self) -> Result<Vec<Category>>;

    /// 所有分类及藏品数量
    async fn get_categories_with_counts(&self) -> Result<Vec<CategoryWithCount>>;

    // ========== 偏好设置 ==========

    async fn get_preference(&self, key: &str) -> Result<Option<Preference>>;

    /// 按 key 插入或覆盖
    async fn set_preference(&self, key: &str, value: &str) -> Result<()>;

    // ========== 通知记录 ==========

    async fn insert_notification(&self, notification: &NotificationRecord) -> Result<i64>;

    /// 所有通知（按创建时间倒序）
    async fn get_notifications(&self) -> Result<Vec<NotificationRecord>>;

    async fn mark_notification_read(&self, notification_id: i64) -> Result<bool>;

    async fn mark_all_notifications_read(&self) -> Result<u64>;

    async fn count_unread_notifications(&self) -> Result<i64>;

    async fn delete_notification(&self, notification_id: i64) -> Result<bool>;

    /// 删除早于 cutoff 的通知，返回删除条数
    async fn delete_notifications_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64>;

    // ========== 数据库初始化和元数据 ==========

    /// 初始化数据库表结构（首次建库时写入默认分类）
    async fn initialize_tables(&self) -> Result<()>;

    /// 获取数据库类型标识
    fn db_type(&self) -> &str;
}
