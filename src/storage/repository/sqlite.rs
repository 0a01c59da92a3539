// SQLite 数据库实现

use super::CatalogRepository;
use crate::storage::models::*;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

const ITEM_COLUMNS: &str = r#"id, name, category_id, acquisition_date, value, condition,
       description, notes, materials, dimensions, origin, period,
       image_uris, updated_at"#;

/// SQLite 数据库实现
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// 创建新的 SQLite 数据库连接
    pub async fn new(db_path: &str) -> Result<Self> {
        info!("初始化 SQLite 数据库: {}", db_path);

        // 确保数据库文件的目录存在
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        // 创建连接池
        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .min_connections(1)
            .idle_timeout(std::time::Duration::from_secs(180))
            .max_lifetime(std::time::Duration::from_secs(1800))
            .acquire_timeout(std::time::Duration::from_secs(10))
            .connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await?;

        let repo = Self { pool };

        // 初始化表结构
        repo.initialize_tables().await?;

        Ok(repo)
    }

    async fn fetch_items(&self, sql: &str) -> Result<Vec<Item>> {
        let records = sqlx::query_as::<_, ItemRecord>(sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(records.into_iter().map(Item::from).collect())
    }

    /// 写入默认分类，仅在首次建库时调用
    async fn seed_default_categories(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for (name, icon, description) in DEFAULT_CATEGORIES {
            sqlx::query("INSERT INTO categories (name, icon, description) VALUES (?1, ?2, ?3)")
                .bind(*name)
                .bind(*icon)
                .bind(*description)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!("已写入 {} 个默认分类", DEFAULT_CATEGORIES.len());
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for SqliteRepository {
    // ========== 藏品操作 ==========

    async fn insert_item(&self, item: &Item) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO items (name, category_id, acquisition_date, value, condition,
                               description, notes, materials, dimensions, origin, period,
                               image_uris, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
        )
        .bind(&item.name)
        .bind(item.category_id)
        .bind(item.acquisition_date)
        .bind(item.value)
        .bind(item.condition as i64)
        .bind(&item.description)
        .bind(&item.notes)
        .bind(&item.materials)
        .bind(&item.dimensions)
        .bind(&item.origin)
        .bind(&item.period)
        .bind(item.image_uris_json())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update_item(&self, item: &Item) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET name = ?1, category_id = ?2, acquisition_date = ?3, value = ?4, condition = ?5,
                description = ?6, notes = ?7, materials = ?8, dimensions = ?9, origin = ?10,
                period = ?11, image_uris = ?12, updated_at = ?13
            WHERE id = ?14
        "#,
        )
        .bind(&item.name)
        .bind(item.category_id)
        .bind(item.acquisition_date)
        .bind(item.value)
        .bind(item.condition as i64)
        .bind(&item.description)
        .bind(&item.notes)
        .bind(&item.materials)
        .bind(&item.dimensions)
        .bind(&item.origin)
        .bind(&item.period)
        .bind(item.image_uris_json())
        .bind(Utc::now())
        .bind(item.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("藏品 {} 不存在", item.id));
        }
        Ok(())
    }

    async fn delete_item(&self, item_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_item(&self, item_id: i64) -> Result<Option<Item>> {
        let record = sqlx::query_as::<_, ItemRecord>(&format!(
            "SELECT {} FROM items WHERE id = ?",
            ITEM_COLUMNS
        ))
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Item::from))
    }

    async fn get_all_items(&self) -> Result<Vec<Item>> {
        self.fetch_items(&format!(
            "SELECT {} FROM items ORDER BY updated_at DESC, id DESC",
            ITEM_COLUMNS
        ))
        .await
    }

    async fn get_items_by_category(&self, category_id: i64) -> Result<Vec<Item>> {
        let records = sqlx::query_as::<_, ItemRecord>(&format!(
            "SELECT {} FROM items WHERE category_id = ? ORDER BY updated_at DESC, id DESC",
            ITEM_COLUMNS
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Item::from).collect())
    }

    async fn search_items(&self, query: &str) -> Result<Vec<Item>> {
        let records = sqlx::query_as::<_, ItemRecord>(&format!(
            r#"
            SELECT {}
            FROM items
            WHERE name LIKE '%' || ?1 || '%'
               OR description LIKE '%' || ?1 || '%'
               OR notes LIKE '%' || ?1 || '%'
               OR origin LIKE '%' || ?1 || '%'
               OR period LIKE '%' || ?1 || '%'
            ORDER BY updated_at DESC, id DESC
            "#,
            ITEM_COLUMNS
        ))
        .bind(query)
        .fetch_all(&self.pool)
        .await?;

        debug!("搜索 \"{}\" 命中 {} 件藏品", query, records.len());
        Ok(records.into_iter().map(Item::from).collect())
    }

    async fn get_recent_items(&self, limit: i64) -> Result<Vec<Item>> {
        let records = sqlx::query_as::<_, ItemRecord>(&format!(
            "SELECT {} FROM items ORDER BY updated_at DESC, id DESC LIMIT ?",
            ITEM_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Item::from).collect())
    }

    // ========== 聚合查询 ==========

    async fn count_items(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn sum_item_values(&self) -> Result<f64> {
        let total =
            sqlx::query_scalar::<_, f64>("SELECT CAST(COALESCE(SUM(value), 0) AS REAL) FROM items")
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    async fn count_items_by_category(&self) -> Result<Vec<(i64, i64)>> {
        let rows = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT category_id, COUNT(*)
            FROM items
            WHERE category_id IS NOT NULL
            GROUP BY category_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ========== 分类操作 ==========

    async fn insert_category(&self, category: &Category) -> Result<i64> {
        let result =
            sqlx::query("INSERT INTO categories (name, icon, description) VALUES (?1, ?2, ?3)")
                .bind(&category.name)
                .bind(&category.icon)
                .bind(&category.description)
                .execute(&self.pool)
                .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update_category(&self, category: &Category) -> Result<()> {
        let result =
            sqlx::query("UPDATE categories SET name = ?, icon = ?, description = ? WHERE id = ?")
                .bind(&category.name)
                .bind(&category.icon)
                .bind(&category.description)
                .bind(category.id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("分类 {} 不存在", category.id));
        }
        Ok(())
    }

    async fn delete_category(&self, category_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(category_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_category(&self, category_id: i64) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, icon, description FROM categories WHERE id = ?",
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn get_all_categories(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, icon, description FROM categories ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn get_categories_with_counts(&self) -> Result<Vec<CategoryWithCount>> {
        let categories = sqlx::query_as::<_, CategoryWithCount>(
            r#"
            SELECT c.id, c.name, c.icon, c.description, COUNT(i.id) AS item_count
            FROM categories c
            LEFT JOIN items i ON i.category_id = c.id
            GROUP BY c.id, c.name, c.icon, c.description
            ORDER BY c.name, c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    // ========== 偏好设置 ==========

    async fn get_preference(&self, key: &str) -> Result<Option<Preference>> {
        let preference = sqlx::query_as::<_, Preference>(
            "SELECT key, value, updated_at FROM preferences WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(preference)
    }

    async fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO preferences (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ========== 通知记录 ==========

    async fn insert_notification(&self, notification: &NotificationRecord) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (title, content, category, created_at, is_read)
            VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        )
        .bind(&notification.title)
        .bind(&notification.content)
        .bind(&notification.category)
        .bind(notification.created_at)
        .bind(notification.is_read)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn get_notifications(&self) -> Result<Vec<NotificationRecord>> {
        let notifications = sqlx::query_as::<_, NotificationRecord>(
            r#"
            SELECT id, title, content, category, created_at, is_read
            FROM notifications
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    async fn mark_notification_read(&self, notification_id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ?")
            .bind(notification_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_notifications_read(&self) -> Result<u64> {
        let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE is_read = 0")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count_unread_notifications(&self) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE is_read = 0")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn delete_notification(&self, notification_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ?")
            .bind(notification_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_notifications_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE created_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // ========== 数据库初始化和元数据 ==========

    async fn initialize_tables(&self) -> Result<()> {
        // 分类表不存在说明是首次建库
        let categories_exist = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'categories'",
        )
        .fetch_one(&self.pool)
        .await?
            > 0;

        // 创建分类表
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                icon TEXT,
                description TEXT
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        // 创建藏品表（category_id 不设外键，删除分类后保留藏品）
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                category_id INTEGER,
                acquisition_date DATE,
                value REAL NOT NULL DEFAULT 0,
                condition INTEGER NOT NULL DEFAULT 3,
                description TEXT,
                notes TEXT,
                materials TEXT,
                dimensions TEXT,
                origin TEXT,
                period TEXT,
                image_uris TEXT NOT NULL DEFAULT '[]',
                updated_at DATETIME NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        // 创建偏好设置表
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        // 创建通知表
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notifications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                category TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                is_read BOOLEAN NOT NULL DEFAULT 0
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        // 创建索引
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_items_category_id ON items(category_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_items_updated_at ON items(updated_at)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_notifications_created_at ON notifications(created_at)",
        )
        .execute(&self.pool)
        .await?;

        if !categories_exist {
            self.seed_default_categories().await?;
        }

        info!("数据库表初始化完成");
        Ok(())
    }

    fn db_type(&self) -> &str {
        "sqlite"
    }
}
