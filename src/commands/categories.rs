//! 分类命令

use crate::models::*;
use crate::utils::{validate_category, validate_id};
use crate::AppState;

/// 获取分类列表（含藏品数量）
pub async fn list_categories(state: &AppState) -> Result<Vec<CategoryWithCount>, String> {
    state
        .collection_domain
        .list_categories()
        .await
        .map_err(|e| e.to_string())
}

/// 获取分类
pub async fn get_category(state: &AppState, category_id: i64) -> Result<Category, String> {
    validate_id("分类", category_id)?;
    state
        .collection_domain
        .get_category(category_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("分类 {} 不存在", category_id))
}

/// 新增分类
pub async fn add_category(state: &AppState, category: Category) -> Result<Category, String> {
    validate_category(&category)?;
    state
        .collection_domain
        .add_category(&category)
        .await
        .map_err(|e| e.to_string())
}

/// 修改分类
pub async fn update_category(state: &AppState, category: Category) -> Result<Category, String> {
    validate_id("分类", category.id)?;
    validate_category(&category)?;
    state
        .collection_domain
        .update_category(&category)
        .await
        .map_err(|e| e.to_string())
}

/// 删除分类（其下藏品保留）
pub async fn delete_category(state: &AppState, category_id: i64) -> Result<(), String> {
    validate_id("分类", category_id)?;
    let deleted = state
        .collection_domain
        .delete_category(category_id)
        .await
        .map_err(|e| e.to_string())?;

    if !deleted {
        return Err(format!("分类 {} 不存在", category_id));
    }
    Ok(())
}
