// 探索领域管理器
//
// 负责博物馆参考藏品检索，包含 MuseumSearch 一个核心组件

use std::sync::Arc;

use crate::museum::MuseumSearch;

/// 探索领域管理器 - 负责博物馆检索
#[derive(Clone)]
pub struct ExploreDomain {
    search: Arc<MuseumSearch>,
}

impl ExploreDomain {
    /// 创建新的探索领域管理器
    pub fn new(search: Arc<MuseumSearch>) -> Self {
        Self { search }
    }

    /// 获取博物馆检索组合器
    pub fn get_search(&self) -> &Arc<MuseumSearch> {
        &self.search
    }
}
