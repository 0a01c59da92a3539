//! 藏品命令
//!
//! 提供藏品的增删改查、搜索与统计接口

use crate::models::*;
use crate::utils::{validate_id, validate_item};
use crate::AppState;

/// 新增藏品
///
/// # 参数
/// - `state`: 应用状态
/// - `item`: 表单数据（`id` 忽略）
///
/// # 返回
/// - `Ok(Item)`: 入库后的藏品
/// - `Err(String)`: 错误信息
pub async fn add_item(state: &AppState, item: Item) -> Result<Item, String> {
    validate_item(&item)?;
    state
        .collection_domain
        .add_item(&item)
        .await
        .map_err(|e| e.to_string())
}

/// 修改藏品
pub async fn update_item(state: &AppState, item: Item) -> Result<Item, String> {
    validate_id("藏品", item.id)?;
    validate_item(&item)?;
    state
        .collection_domain
        .update_item(&item)
        .await
        .map_err(|e| e.to_string())
}

/// 删除藏品
pub async fn delete_item(state: &AppState, item_id: i64) -> Result<(), String> {
    validate_id("藏品", item_id)?;
    let deleted = state
        .collection_domain
        .delete_item(item_id)
        .await
        .map_err(|e| e.to_string())?;

    if !deleted {
        return Err(format!("藏品 {} 不存在", item_id));
    }
    Ok(())
}

/// 获取藏品详情
pub async fn get_item(state: &AppState, item_id: i64) -> Result<Item, String> {
    validate_id("藏品", item_id)?;
    state
        .collection_domain
        .get_item(item_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("藏品 {} 不存在", item_id))
}

/// 获取藏品列表，可按分类过滤
pub async fn list_items(state: &AppState, category_id: Option<i64>) -> Result<Vec<Item>, String> {
    let result = match category_id {
        Some(id) => {
            validate_id("分类", id)?;
            state.collection_domain.items_by_category(id).await
        }
        None => state.collection_domain.list_items().await,
    };
    result.map_err(|e| e.to_string())
}

/// 搜索藏品
pub async fn search_items(state: &AppState, query: String) -> Result<Vec<Item>, String> {
    state
        .collection_domain
        .search_items(&query)
        .await
        .map_err(|e| e.to_string())
}

/// 获取收藏统计
pub async fn get_statistics(state: &AppState) -> Result<Statistics, String> {
    state
        .collection_domain
        .statistics()
        .await
        .map_err(|e| e.to_string())
}
