//! 输入验证工具函数
//!
//! 提供表单与参数的验证功能，返回可直接展示给用户的错误信息

use crate::storage::{Category, Item};

/// 验证记录 ID 是否有效
///
/// # 参数
/// - `kind`: 记录类型名称（用于错误信息）
/// - `id`: 记录 ID
pub fn validate_id(kind: &str, id: i64) -> Result<(), String> {
    if id <= 0 {
        return Err(format!("无效的{} ID: {}", kind, id));
    }
    Ok(())
}

/// 验证藏品表单
///
/// - 名称必填
/// - 品相评级 1-5
/// - 价值为非负有限数
pub fn validate_item(item: &Item) -> Result<(), String> {
    if item.name.trim().is_empty() {
        return Err("藏品名称不能为空".to_string());
    }
    if !(1..=5).contains(&item.condition) {
        return Err(format!("品相评级必须在 1 到 5 之间，当前为 {}", item.condition));
    }
    if !item.value.is_finite() || item.value < 0.0 {
        return Err("藏品价值必须是非负数".to_string());
    }
    if let Some(category_id) = item.category_id {
        validate_id("分类", category_id)?;
    }
    Ok(())
}

/// 验证分类表单
pub fn validate_category(category: &Category) -> Result<(), String> {
    if category.name.trim().is_empty() {
        return Err("分类名称不能为空".to_string());
    }
    Ok(())
}

/// 验证偏好设置 key
pub fn validate_preference_key(key: &str) -> Result<(), String> {
    if key.trim().is_empty() {
        return Err("设置项名称不能为空".to_string());
    }
    Ok(())
}
