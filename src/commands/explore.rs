//! 博物馆探索命令
//!
//! 远程请求失败时返回空列表，与"没有结果"无法区分

use crate::models::*;
use crate::museum::{FILTER_LIMIT, SIMILAR_LIMIT};
use crate::utils::validate_id;
use crate::AppState;

/// 单个参考藏品加载失败时的提示
const ARTIFACT_LOAD_FAILED: &str = "无法加载藏品详情，请稍后重试";

/// 搜索博物馆藏品
pub async fn search_artifacts(state: &AppState, query: String) -> Result<Vec<ExternalArtifact>, String> {
    Ok(state.explore_domain.get_search().search(&query).await)
}

/// 探索页推荐
pub async fn get_featured_artifacts(state: &AppState) -> Result<Vec<ExternalArtifact>, String> {
    Ok(state.explore_domain.get_search().featured().await)
}

/// 获取参考藏品详情
pub async fn get_artifact(state: &AppState, artifact_id: String) -> Result<ExternalArtifact, String> {
    state
        .explore_domain
        .get_search()
        .get_artifact(&artifact_id)
        .await
        .ok_or_else(|| ARTIFACT_LOAD_FAILED.to_string())
}

/// 相似藏品
pub async fn get_similar_artifacts(
    state: &AppState,
    artifact_id: String,
) -> Result<Vec<ExternalArtifact>, String> {
    let search = state.explore_domain.get_search();
    match search.get_artifact(&artifact_id).await {
        Some(artifact) => Ok(search.search_similar(&artifact).await),
        None => Ok(Vec::new()),
    }
}

/// 与本地藏品相似的参考藏品（藏品详情页）
pub async fn get_similar_artifacts_for_item(
    state: &AppState,
    item_id: i64,
    limit: Option<usize>,
) -> Result<Vec<ExternalArtifact>, String> {
    validate_id("藏品", item_id)?;
    let collection = &state.collection_domain;

    let item = collection
        .get_item(item_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("藏品 {} 不存在", item_id))?;

    let category = match item.category_id {
        Some(category_id) => collection
            .get_category(category_id)
            .await
            .map_err(|e| e.to_string())?,
        None => None,
    };

    Ok(state
        .explore_domain
        .get_search()
        .search_similar_to_item(
            &item,
            category.as_ref().map(|c| c.name.as_str()),
            limit.unwrap_or(SIMILAR_LIMIT),
        )
        .await)
}

/// 按部门名称筛选
pub async fn search_artifacts_by_department(
    state: &AppState,
    query: String,
    department: String,
    limit: Option<usize>,
) -> Result<Vec<ExternalArtifact>, String> {
    Ok(state
        .explore_domain
        .get_search()
        .search_by_department(&query, &department, limit.unwrap_or(FILTER_LIMIT))
        .await)
}

/// 按文化和/或时期筛选
pub async fn search_artifacts_by_culture_or_period(
    state: &AppState,
    culture: Option<String>,
    period: Option<String>,
    limit: Option<usize>,
) -> Result<Vec<ExternalArtifact>, String> {
    Ok(state
        .explore_domain
        .get_search()
        .search_by_culture_or_period(
            culture.as_deref(),
            period.as_deref(),
            limit.unwrap_or(FILTER_LIMIT),
        )
        .await)
}

/// 在指定部门内搜索
pub async fn search_artifacts_in_department(
    state: &AppState,
    query: String,
    department_id: i64,
) -> Result<Vec<ExternalArtifact>, String> {
    Ok(state
        .explore_domain
        .get_search()
        .search_in_department(&query, department_id)
        .await)
}

/// 博物馆部门列表
pub async fn get_departments(state: &AppState) -> Result<Vec<Department>, String> {
    Ok(state.explore_domain.get_search().departments().await)
}
