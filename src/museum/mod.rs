// 博物馆检索模块
// 组合搜索与详情接口，提供参考藏品查询（结果仅在内存中使用，不入库）

pub mod client;

pub use client::{Department, MetMuseumClient, MuseumObject, SearchResponse};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::models::MuseumConfig;
use crate::storage::Item;

/// 博物馆 API 接口
#[async_trait]
pub trait MuseumApi: Send + Sync {
    /// 搜索藏品，返回 ID 列表
    async fn search_objects(
        &self,
        query: &str,
        has_images: bool,
        department_id: Option<i64>,
    ) -> Result<SearchResponse>;

    /// 获取单个藏品详情
    async fn get_object(&self, object_id: i64) -> Result<MuseumObject>;

    /// 获取部门列表
    async fn get_departments(&self) -> Result<Vec<Department>>;
}

/// 外部参考藏品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalArtifact {
    pub id: String,
    pub title: String,
    pub artist: Option<String>,
    pub date: Option<String>,
    pub medium: Option<String>,
    pub culture: Option<String>,
    pub period: Option<String>,
    pub department: Option<String>,
    pub classification: Option<String>,
    pub dimensions: Option<String>,
    pub credit_line: Option<String>,
    pub country: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub additional_images: Vec<String>,
    pub object_url: Option<String>,
    pub is_public_domain: bool,
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl From<MuseumObject> for ExternalArtifact {
    fn from(object: MuseumObject) -> Self {
        let title = non_empty(object.title).unwrap_or_else(|| "Untitled".to_string());
        let period = non_empty(object.period).or_else(|| non_empty(object.dynasty));

        Self {
            id: object.object_id.to_string(),
            title,
            artist: non_empty(object.artist_display_name),
            date: non_empty(object.object_date),
            medium: non_empty(object.medium),
            culture: non_empty(object.culture),
            period,
            department: non_empty(object.department),
            classification: non_empty(object.classification),
            dimensions: non_empty(object.dimensions),
            credit_line: non_empty(object.credit_line),
            country: non_empty(object.country),
            image_url: non_empty(object.primary_image),
            thumbnail_url: non_empty(object.primary_image_small),
            additional_images: object.additional_images,
            object_url: non_empty(object.object_url),
            is_public_domain: object.is_public_domain,
        }
    }
}

/// 忽略大小写的子串匹配，字段为空时不匹配
fn field_contains(field: &Option<String>, needle: &str) -> bool {
    field
        .as_deref()
        .map(|value| value.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}

/// 相似藏品默认返回条数
pub const SIMILAR_LIMIT: usize = 10;

/// 部门、文化/时期筛选默认返回条数
pub const FILTER_LIMIT: usize = 20;

/// 名称中不作为关键词的常见词
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "that", "this", "item", "antique", "old", "vintage",
];

/// 从本地藏品提取检索关键词（去重，保持顺序）
///
/// 来源依次为：分类名、逗号分隔的材质、产地、时期、名称中长度大于 3 的非常见词
pub fn similar_keywords(item: &Item, category_name: Option<&str>) -> Vec<String> {
    let mut candidates: Vec<&str> = Vec::new();

    candidates.extend(category_name);
    if let Some(materials) = item.materials.as_deref() {
        candidates.extend(materials.split(','));
    }
    candidates.extend(item.origin.as_deref());
    candidates.extend(item.period.as_deref());
    candidates.extend(item.name.split_whitespace().filter(|word| {
        word.chars().count() > 3 && !STOP_WORDS.contains(&word.to_lowercase().as_str())
    }));

    let mut keywords: Vec<String> = Vec::new();
    for candidate in candidates {
        let candidate = candidate.trim();
        if !candidate.is_empty() && !keywords.iter().any(|k| k == candidate) {
            keywords.push(candidate.to_string());
        }
    }
    keywords
}

/// 博物馆检索组合器
///
/// 搜索失败返回空列表；单个详情请求失败只会少一条结果
pub struct MuseumSearch {
    api: Arc<dyn MuseumApi>,
    max_results: usize,
    has_images: bool,
    featured_query: String,
}

impl MuseumSearch {
    pub fn new(api: Arc<dyn MuseumApi>, config: &MuseumConfig) -> Self {
        Self {
            api,
            max_results: config.max_results,
            has_images: config.has_images,
            featured_query: config.featured_query.clone(),
        }
    }

    /// 文本搜索
    pub async fn search(&self, query: &str) -> Vec<ExternalArtifact> {
        self.search_with(query, None).await
    }

    /// 在指定部门内搜索（服务端过滤）
    pub async fn search_in_department(&self, query: &str, department_id: i64) -> Vec<ExternalArtifact> {
        self.search_with(query, Some(department_id)).await
    }

    /// 探索页推荐
    pub async fn featured(&self) -> Vec<ExternalArtifact> {
        self.search(&self.featured_query).await
    }

    /// 按部门名称筛选（本地子串过滤），最多返回 limit 条
    pub async fn search_by_department(
        &self,
        query: &str,
        department: &str,
        limit: usize,
    ) -> Vec<ExternalArtifact> {
        self.search(query)
            .await
            .into_iter()
            .filter(|artifact| field_contains(&artifact.department, department))
            .take(limit)
            .collect()
    }

    /// 按文化和/或时期检索
    ///
    /// 以 "文化 OR 时期" 搜索，结果需同时满足给出的文化和时期条件
    pub async fn search_by_culture_or_period(
        &self,
        culture: Option<&str>,
        period: Option<&str>,
        limit: usize,
    ) -> Vec<ExternalArtifact> {
        let culture = culture.map(str::trim).filter(|c| !c.is_empty());
        let period = period.map(str::trim).filter(|p| !p.is_empty());

        let terms: Vec<&str> = culture.into_iter().chain(period).collect();
        if terms.is_empty() {
            return Vec::new();
        }

        self.search(&terms.join(" OR "))
            .await
            .into_iter()
            .filter(|artifact| culture.map_or(true, |c| field_contains(&artifact.culture, c)))
            .filter(|artifact| period.map_or(true, |p| field_contains(&artifact.period, p)))
            .take(limit)
            .collect()
    }

    /// 与本地藏品相似的参考藏品，按藏品关键词以 OR 组合搜索
    pub async fn search_similar_to_item(
        &self,
        item: &Item,
        category_name: Option<&str>,
        limit: usize,
    ) -> Vec<ExternalArtifact> {
        let keywords = similar_keywords(item, category_name);
        if keywords.is_empty() {
            return Vec::new();
        }

        debug!("藏品 {} 相似检索关键词: {:?}", item.id, keywords);
        self.search(&keywords.join(" OR "))
            .await
            .into_iter()
            .take(limit)
            .collect()
    }

    /// 相似藏品：按类别搜索，保留文化或类别相同的结果
    pub async fn search_similar(&self, artifact: &ExternalArtifact) -> Vec<ExternalArtifact> {
        let query = artifact
            .classification
            .clone()
            .or_else(|| artifact.medium.clone())
            .unwrap_or_else(|| artifact.title.clone());

        let culture = artifact.culture.clone();
        let classification = artifact.classification.clone();

        self.search(&query)
            .await
            .into_iter()
            .filter(|candidate| candidate.id != artifact.id)
            .filter(|candidate| match (&culture, &classification) {
                (None, None) => true,
                _ => {
                    culture
                        .as_deref()
                        .map(|c| field_contains(&candidate.culture, c))
                        .unwrap_or(false)
                        || classification
                            .as_deref()
                            .map(|c| field_contains(&candidate.classification, c))
                            .unwrap_or(false)
                }
            })
            .collect()
    }

    /// 获取单个参考藏品，ID 非数字或请求失败时返回 None
    pub async fn get_artifact(&self, id: &str) -> Option<ExternalArtifact> {
        let object_id = match id.trim().parse::<i64>() {
            Ok(object_id) => object_id,
            Err(_) => {
                warn!("无效的博物馆藏品 ID: {}", id);
                return None;
            }
        };

        match self.api.get_object(object_id).await {
            Ok(object) => Some(ExternalArtifact::from(object)),
            Err(e) => {
                warn!("获取博物馆藏品 {} 失败: {}", object_id, e);
                None
            }
        }
    }

    /// 部门列表，请求失败返回空列表
    pub async fn departments(&self) -> Vec<Department> {
        match self.api.get_departments().await {
            Ok(departments) => departments,
            Err(e) => {
                warn!("获取博物馆部门列表失败: {}", e);
                Vec::new()
            }
        }
    }

    async fn search_with(&self, query: &str, department_id: Option<i64>) -> Vec<ExternalArtifact> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let ids = match self
            .api
            .search_objects(query, self.has_images, department_id)
            .await
        {
            Ok(response) => response.object_ids.unwrap_or_default(),
            Err(e) => {
                warn!("博物馆搜索 \"{}\" 失败: {}", query, e);
                return Vec::new();
            }
        };

        let ids: Vec<i64> = ids.into_iter().take(self.max_results).collect();
        if ids.is_empty() {
            return Vec::new();
        }

        let requested = ids.len();
        let artifacts = self.fetch_details(ids).await;
        info!(
            "博物馆搜索 \"{}\": 请求 {} 条详情，成功 {} 条",
            query,
            requested,
            artifacts.len()
        );
        artifacts
    }

    /// 并发获取详情，保持搜索结果的原始顺序
    async fn fetch_details(&self, ids: Vec<i64>) -> Vec<ExternalArtifact> {
        let mut tasks = JoinSet::new();
        for (index, object_id) in ids.into_iter().enumerate() {
            let api = self.api.clone();
            tasks.spawn(async move { (index, object_id, api.get_object(object_id).await) });
        }

        let mut found = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, _, Ok(object))) => found.push((index, ExternalArtifact::from(object))),
                Ok((_, object_id, Err(e))) => {
                    debug!("博物馆藏品 {} 详情获取失败，已跳过: {}", object_id, e);
                }
                Err(e) => warn!("详情任务异常退出: {}", e),
            }
        }

        found.sort_by_key(|(index, _)| *index);
        found.into_iter().map(|(_, artifact)| artifact).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 内存中的博物馆 API
    #[derive(Default)]
    pub(crate) struct FakeMuseumApi {
        pub search_results: HashMap<String, Vec<i64>>,
        pub objects: HashMap<i64, MuseumObject>,
        pub failing: HashSet<i64>,
        pub search_fails: bool,
        pub detail_calls: AtomicUsize,
    }

    impl FakeMuseumApi {
        pub(crate) fn object(id: i64, culture: &str, classification: &str, department: &str) -> MuseumObject {
            MuseumObject {
                object_id: id,
                title: format!("Object {}", id),
                culture: culture.to_string(),
                classification: classification.to_string(),
                department: department.to_string(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl MuseumApi for FakeMuseumApi {
        async fn search_objects(
            &self,
            query: &str,
            _has_images: bool,
            _department_id: Option<i64>,
        ) -> Result<SearchResponse> {
            if self.search_fails {
                return Err(anyhow!("connection refused"));
            }
            let ids = self.search_results.get(query).cloned();
            Ok(SearchResponse {
                total: ids.as_ref().map(|ids| ids.len() as i64).unwrap_or(0),
                object_ids: ids,
            })
        }

        async fn get_object(&self, object_id: i64) -> Result<MuseumObject> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(&object_id) {
                return Err(anyhow!("HTTP 500"));
            }
            self.objects
                .get(&object_id)
                .cloned()
                .ok_or_else(|| anyhow!("ObjectID not found"))
        }

        async fn get_departments(&self) -> Result<Vec<Department>> {
            if self.search_fails {
                return Err(anyhow!("connection refused"));
            }
            Ok(vec![Department {
                department_id: 12,
                display_name: "European Sculpture and Decorative Arts".to_string(),
            }])
        }
    }

    fn composer(api: FakeMuseumApi) -> (Arc<FakeMuseumApi>, MuseumSearch) {
        let api = Arc::new(api);
        let search = MuseumSearch::new(api.clone(), &MuseumConfig::default());
        (api, search)
    }

    fn catalog(count: i64) -> FakeMuseumApi {
        let mut api = FakeMuseumApi::default();
        let ids: Vec<i64> = (1..=count).collect();
        for id in &ids {
            api.objects
                .insert(*id, FakeMuseumApi::object(*id, "French", "Ceramics", "European Sculpture"));
        }
        api.search_results.insert("vase".to_string(), ids);
        api
    }

    #[tokio::test]
    async fn test_search_truncates_to_fifteen() {
        let (api, search) = composer(catalog(40));

        let results = search.search("vase").await;
        assert_eq!(results.len(), 15);
        assert_eq!(api.detail_calls.load(Ordering::SeqCst), 15);

        let ids: Vec<String> = results.iter().map(|a| a.id.clone()).collect();
        let expected: Vec<String> = (1..=15).map(|id: i64| id.to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_failed_details_are_skipped() {
        let mut api = catalog(20);
        api.failing.insert(2);
        api.failing.insert(9);
        let (_api, search) = composer(api);

        let results = search.search("vase").await;
        assert_eq!(results.len(), 13);
        assert!(results.iter().all(|a| a.id != "2" && a.id != "9"));
    }

    #[tokio::test]
    async fn test_no_ids_is_empty() {
        let (api, search) = composer(catalog(3));

        assert!(search.search("nothing matches").await.is_empty());
        assert!(search.search("   ").await.is_empty());
        assert_eq!(api.detail_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_failure_is_empty() {
        let mut api = catalog(3);
        api.search_fails = true;
        let (_api, search) = composer(api);

        assert!(search.search("vase").await.is_empty());
        assert!(search.departments().await.is_empty());
    }

    #[tokio::test]
    async fn test_department_filter() {
        let mut api = FakeMuseumApi::default();
        api.objects.insert(1, FakeMuseumApi::object(1, "French", "Ceramics", "European Sculpture and Decorative Arts"));
        api.objects.insert(2, FakeMuseumApi::object(2, "Chinese", "Ceramics", "Asian Art"));
        api.objects.insert(3, FakeMuseumApi::object(3, "Japanese", "Lacquer", "Asian Art"));
        api.objects.insert(4, FakeMuseumApi::object(4, "", "Furniture", "American Wing"));
        api.search_results.insert("porcelain".to_string(), vec![1, 2, 3, 4]);
        let (_api, search) = composer(api);

        let asian = search.search_by_department("porcelain", "asian", FILTER_LIMIT).await;
        let ids: Vec<&str> = asian.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);

        let first = search.search_by_department("porcelain", "ASIAN", 1).await;
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "2");
    }

    fn dated(id: i64, culture: &str, period: &str) -> MuseumObject {
        MuseumObject {
            period: period.to_string(),
            ..FakeMuseumApi::object(id, culture, "Ceramics", "Asian Art")
        }
    }

    #[tokio::test]
    async fn test_culture_and_period_filters() {
        let mut api = FakeMuseumApi::default();
        api.objects.insert(1, dated(1, "China", "Ming dynasty (1368–1644)"));
        api.objects.insert(2, dated(2, "China", "Qing dynasty (1644–1911)"));
        api.objects.insert(3, dated(3, "Japan", "Edo period (1615–1868)"));
        api.objects.insert(4, dated(4, "China, for export", "Qing dynasty (1644–1911)"));
        api.search_results.insert("China OR Qing".to_string(), vec![1, 2, 3, 4]);
        api.search_results.insert("china".to_string(), vec![1, 2, 3, 4]);
        let (_api, search) = composer(api);

        // 文化匹配但时期不匹配的结果被排除
        let qing = search
            .search_by_culture_or_period(Some("China"), Some("Qing"), FILTER_LIMIT)
            .await;
        let ids: Vec<&str> = qing.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4"]);

        let chinese = search
            .search_by_culture_or_period(Some(" china "), None, 2)
            .await;
        let ids: Vec<&str> = chinese.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        assert!(search
            .search_by_culture_or_period(None, Some("  "), FILTER_LIMIT)
            .await
            .is_empty());
    }

    #[test]
    fn test_similar_keywords() {
        let mut item = Item::new("The old Delft tile with windmill", None, 40.0, 3);
        item.materials = Some("tin-glazed earthenware, cobalt ,".to_string());
        item.origin = Some("Netherlands".to_string());
        item.period = Some("18th century".to_string());

        let keywords = similar_keywords(&item, Some("Ceramics"));
        assert_eq!(
            keywords,
            vec![
                "Ceramics",
                "tin-glazed earthenware",
                "cobalt",
                "Netherlands",
                "18th century",
                "Delft",
                "tile",
                "windmill",
            ]
        );

        // 重复关键词只保留一次
        let mut vase = Item::new("Ceramics vase", None, 10.0, 3);
        vase.origin = Some("Ceramics".to_string());
        assert_eq!(similar_keywords(&vase, Some("Ceramics")), vec!["Ceramics", "vase"]);

        assert!(similar_keywords(&Item::new("Old jug", None, 5.0, 3), None).is_empty());
    }

    #[tokio::test]
    async fn test_similar_to_item_limit() {
        let mut api = catalog(15);
        api.search_results
            .insert("Silver OR London".to_string(), (1..=15).collect());
        let (api, search) = composer(api);

        let mut item = Item::new("Tea set", None, 700.0, 4);
        item.origin = Some("London".to_string());

        let similar = search.search_similar_to_item(&item, Some("Silver"), SIMILAR_LIMIT).await;
        assert_eq!(similar.len(), 10);
        assert_eq!(similar[0].id, "1");

        let before = api.detail_calls.load(Ordering::SeqCst);
        let nothing = search
            .search_similar_to_item(&Item::new("Old jug", None, 5.0, 3), None, SIMILAR_LIMIT)
            .await;
        assert!(nothing.is_empty());
        assert_eq!(api.detail_calls.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn test_similar_excludes_self() {
        let mut api = FakeMuseumApi::default();
        api.objects.insert(1, FakeMuseumApi::object(1, "French", "Ceramics", ""));
        api.objects.insert(2, FakeMuseumApi::object(2, "German", "Ceramics", ""));
        api.objects.insert(3, FakeMuseumApi::object(3, "Japanese", "Lacquer", ""));
        api.objects.insert(4, FakeMuseumApi::object(4, "French", "Textiles", ""));
        api.search_results.insert("Ceramics".to_string(), vec![1, 2, 3, 4]);
        let (_api, search) = composer(api);

        let source = search.get_artifact("1").await.unwrap();
        let similar = search.search_similar(&source).await;
        let ids: Vec<&str> = similar.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4"]);
    }

    #[tokio::test]
    async fn test_get_artifact_invalid_or_missing() {
        let (_api, search) = composer(catalog(2));
        assert!(search.get_artifact("abc").await.is_none());
        assert!(search.get_artifact("99").await.is_none());
        assert_eq!(search.get_artifact(" 2 ").await.unwrap().title, "Object 2");
    }

    #[test]
    fn test_artifact_conversion_blank_fields() {
        let object = MuseumObject {
            object_id: 5,
            title: "  ".to_string(),
            dynasty: "Qing dynasty".to_string(),
            ..Default::default()
        };
        let artifact = ExternalArtifact::from(object);
        assert_eq!(artifact.id, "5");
        assert_eq!(artifact.title, "Untitled");
        assert_eq!(artifact.period.as_deref(), Some("Qing dynasty"));
        assert!(artifact.culture.is_none());
    }
}
