// 领域模块 - 用于组织应用的业务逻辑
//
// 按业务领域分组 AppState
// 包含3个领域管理器(藏品、探索、系统)，以及系统领域使用的偏好设置和通知中心

pub mod collection;
pub mod explore;
pub mod notifications;
pub mod preferences;
pub mod system;

pub use collection::CollectionDomain;
pub use explore::ExploreDomain;
pub use notifications::NotificationCenter;
pub use preferences::PreferenceStore;
pub use system::SystemDomain;
