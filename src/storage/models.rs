// 数据模型定义 - 数据库实体结构与领域记录

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 藏品数据库行
///
/// 图片引用以 JSON 数组文本存储，读取后转换为 [`Item`]
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemRecord {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    pub acquisition_date: Option<NaiveDate>,
    pub value: f64,
    pub condition: i64,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub materials: Option<String>,
    pub dimensions: Option<String>,
    pub origin: Option<String>,
    pub period: Option<String>,
    pub image_uris: String, // JSON序列化的图片引用
    pub updated_at: DateTime<Utc>,
}

/// 藏品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// 新建时为 0，由数据库分配
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    pub acquisition_date: Option<NaiveDate>,
    pub value: f64,
    /// 品相评级 1-5
    pub condition: u8,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub materials: Option<String>,
    pub dimensions: Option<String>,
    pub origin: Option<String>,
    pub period: Option<String>,
    #[serde(default)]
    pub image_uris: Vec<String>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// 以最少字段构造新藏品（其余字段留空）
    pub fn new(name: impl Into<String>, category_id: Option<i64>, value: f64, condition: u8) -> Self {
        Self {
            id: 0,
            name: name.into(),
            category_id,
            acquisition_date: None,
            value,
            condition,
            description: None,
            notes: None,
            materials: None,
            dimensions: None,
            origin: None,
            period: None,
            image_uris: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// 序列化图片引用用于入库
    pub(crate) fn image_uris_json(&self) -> String {
        serde_json::to_string(&self.image_uris).unwrap_or_else(|_| "[]".to_string())
    }
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        let image_uris = serde_json::from_str(&record.image_uris).unwrap_or_default();
        Self {
            id: record.id,
            name: record.name,
            category_id: record.category_id,
            acquisition_date: record.acquisition_date,
            value: record.value,
            condition: record.condition.clamp(1, 5) as u8,
            description: record.description,
            notes: record.notes,
            materials: record.materials,
            dimensions: record.dimensions,
            origin: record.origin,
            period: record.period,
            image_uris,
            updated_at: record.updated_at,
        }
    }
}

/// 分类
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, icon: Option<&str>, description: Option<&str>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            icon: icon.map(str::to_string),
            description: description.map(str::to_string),
        }
    }
}

/// 分类及其藏品数量（数量为查询时计算，不入库）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryWithCount {
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub item_count: i64,
}

/// 首次建库时写入的默认分类 (名称, 图标, 描述)
pub const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Furniture", "chair", "Tables, chairs, cabinets and other furniture"),
    ("Ceramics", "vase", "Porcelain, pottery and earthenware"),
    ("Jewelry", "diamond", "Rings, brooches, necklaces and watches"),
    ("Art", "palette", "Paintings, prints and sculpture"),
    ("Coins", "coin", "Coins, medals and tokens"),
    ("Books", "book", "Rare books, manuscripts and maps"),
    ("Clocks", "clock", "Clocks and timepieces"),
    ("Textiles", "texture", "Rugs, quilts and costume"),
    ("Silver", "cutlery", "Silverware and metalwork"),
    ("Other", "category", "Everything else"),
];

/// 偏好设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Preference {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// 通知记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct NotificationRecord {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String, // reminder, system 等
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

impl NotificationRecord {
    pub fn new(title: impl Into<String>, content: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            content: content.into(),
            category: category.into(),
            created_at: Utc::now(),
            is_read: false,
        }
    }
}
