// 博物馆 API 客户端模块
// 负责与大都会艺术博物馆公开藏品 API 交互（只读，无需认证）

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::MuseumApi;
use crate::models::MuseumConfig;

/// 搜索接口返回
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: i64,
    /// 无结果时 API 返回 null
    #[serde(rename = "objectIDs", default)]
    pub object_ids: Option<Vec<i64>>,
}

/// 藏品详情接口返回（缺失字段为空字符串）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MuseumObject {
    #[serde(rename = "objectID")]
    pub object_id: i64,
    pub title: String,
    pub artist_display_name: String,
    pub object_date: String,
    pub medium: String,
    pub culture: String,
    pub period: String,
    pub dynasty: String,
    pub department: String,
    pub classification: String,
    pub dimensions: String,
    pub credit_line: String,
    pub country: String,
    pub primary_image: String,
    pub primary_image_small: String,
    pub additional_images: Vec<String>,
    #[serde(rename = "objectURL")]
    pub object_url: String,
    pub is_public_domain: bool,
}

/// 博物馆部门
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub department_id: i64,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
struct DepartmentsResponse {
    #[serde(default)]
    departments: Vec<Department>,
}

/// 大都会艺术博物馆 API 客户端
#[derive(Clone)]
pub struct MetMuseumClient {
    config: MuseumConfig,
    client: Client,
}

impl MetMuseumClient {
    /// 创建新的客户端
    pub fn new(config: MuseumConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Self::with_client(config, client)
    }

    /// 使用共享的 HTTP 客户端
    pub fn with_client(config: MuseumConfig, client: Client) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(anyhow!("博物馆 API 地址不能为空"));
        }
        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.client.get(url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("博物馆 API 请求失败 ({}): {}", status, error_text));
        }

        Ok(response.json::<T>().await?)
    }
}

/// 构造搜索参数
fn search_params(query: &str, has_images: bool, department_id: Option<i64>) -> Vec<(&'static str, String)> {
    let mut params = vec![("q", query.to_string()), ("hasImages", has_images.to_string())];
    if let Some(id) = department_id {
        params.push(("departmentId", id.to_string()));
    }
    params
}

#[async_trait]
impl MuseumApi for MetMuseumClient {
    async fn search_objects(
        &self,
        query: &str,
        has_images: bool,
        department_id: Option<i64>,
    ) -> Result<SearchResponse> {
        let url = self.endpoint("search");
        let result: SearchResponse = self
            .get_json(&url, &search_params(query, has_images, department_id))
            .await?;

        debug!("博物馆搜索 \"{}\" 共 {} 条结果", query, result.total);
        Ok(result)
    }

    async fn get_object(&self, object_id: i64) -> Result<MuseumObject> {
        let url = self.endpoint(&format!("objects/{}", object_id));
        self.get_json(&url, &[]).await
    }

    async fn get_departments(&self) -> Result<Vec<Department>> {
        let url = self.endpoint("departments");
        let result: DepartmentsResponse = self.get_json(&url, &[]).await?;
        Ok(result.departments)
    }
}
