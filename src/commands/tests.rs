use std::sync::Arc;

use super::*;
use crate::models::*;
use crate::museum::tests::FakeMuseumApi;
use crate::reminder::LogNotifier;
use crate::settings::SettingsManager;
use crate::storage::{CatalogRepository, SqliteRepository};
use crate::AppState;

struct TestApp {
    dir: tempfile::TempDir,
    state: AppState,
}

async fn test_app(api: FakeMuseumApi) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let settings = Arc::new(
        SettingsManager::new(dir.path().join("config.json"))
            .await
            .unwrap(),
    );
    let db_path = dir.path().join("catalog.db");
    let repo: Arc<dyn CatalogRepository> =
        Arc::new(SqliteRepository::new(db_path.to_str().unwrap()).await.unwrap());

    let state = AppState::with_components(
        settings,
        repo,
        Arc::new(api),
        Arc::new(LogNotifier),
    )
    .await
    .unwrap();

    TestApp { dir, state }
}

async fn category_id(state: &AppState, name: &str) -> i64 {
    list_categories(state)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == name)
        .map(|c| c.id)
        .unwrap()
}

#[tokio::test]
async fn test_item_crud() {
    let app = test_app(FakeMuseumApi::default()).await;
    let state = &app.state;
    let ceramics = category_id(state, "Ceramics").await;

    let mut form = Item::new("Imari charger", Some(ceramics), 380.0, 4);
    form.origin = Some("Arita, Japan".to_string());
    let created = add_item(state, form).await.unwrap();
    assert!(created.id > 0);

    let mut edited = get_item(state, created.id).await.unwrap();
    edited.notes = Some("Hairline crack at rim".to_string());
    edited.condition = 3;
    let updated = update_item(state, edited).await.unwrap();
    assert_eq!(updated.condition, 3);

    assert_eq!(list_items(state, Some(ceramics)).await.unwrap().len(), 1);
    assert_eq!(search_items(state, "arita".to_string()).await.unwrap().len(), 1);

    delete_item(state, created.id).await.unwrap();
    assert!(get_item(state, created.id).await.is_err());
    assert!(delete_item(state, created.id).await.is_err());
}

#[tokio::test]
async fn test_item_validation() {
    let app = test_app(FakeMuseumApi::default()).await;
    let state = &app.state;

    let err = add_item(state, Item::new(" ", None, 10.0, 3)).await.unwrap_err();
    assert_eq!(err, "藏品名称不能为空");
    assert!(add_item(state, Item::new("Vase", None, 10.0, 7)).await.is_err());
    assert!(get_item(state, -4).await.is_err());

    // 校验失败不会写入
    assert_eq!(get_statistics(state).await.unwrap().total_items, 0);
}

#[tokio::test]
async fn test_statistics_after_delete() {
    let app = test_app(FakeMuseumApi::default()).await;
    let state = &app.state;
    let furniture = category_id(state, "Furniture").await;

    let mut ids = Vec::new();
    for (name, value) in [("Side table", 150.0), ("Chest", 200.0), ("Stool", 100.0)] {
        ids.push(
            add_item(state, Item::new(name, Some(furniture), value, 3))
                .await
                .unwrap()
                .id,
        );
    }

    let stats = get_statistics(state).await.unwrap();
    assert_eq!(stats.total_value, 450.0);
    assert_eq!(stats.count_for(furniture), Some(3));

    delete_item(state, ids[0]).await.unwrap();

    let stats = get_statistics(state).await.unwrap();
    assert_eq!(stats.total_items, 2);
    assert_eq!(stats.total_value, 300.0);
    assert_eq!(stats.count_for(furniture), Some(2));
    assert_eq!(stats.recent_additions.len(), 2);
}

#[tokio::test]
async fn test_category_commands() {
    let app = test_app(FakeMuseumApi::default()).await;
    let state = &app.state;

    let created = add_category(state, Category::new("Militaria", Some("shield"), None))
        .await
        .unwrap();
    let mut renamed = get_category(state, created.id).await.unwrap();
    renamed.name = "Military".to_string();
    update_category(state, renamed).await.unwrap();
    assert_eq!(get_category(state, created.id).await.unwrap().name, "Military");

    assert!(add_category(state, Category::new("", None, None)).await.is_err());

    delete_category(state, created.id).await.unwrap();
    assert!(get_category(state, created.id).await.is_err());
}

#[tokio::test]
async fn test_explore_best_effort() {
    let mut api = FakeMuseumApi::default();
    let ids: Vec<i64> = (100..130).collect();
    for id in &ids {
        api.objects
            .insert(*id, FakeMuseumApi::object(*id, "English", "Furniture", "American Wing"));
    }
    api.failing.insert(101);
    api.failing.insert(110);
    api.search_results.insert("chair".to_string(), ids);

    let app = test_app(api).await;
    let state = &app.state;

    let results = search_artifacts(state, "chair".to_string()).await.unwrap();
    assert_eq!(results.len(), 13);

    assert!(search_artifacts(state, "sofa".to_string()).await.unwrap().is_empty());

    let err = get_artifact(state, "101".to_string()).await.unwrap_err();
    assert_eq!(err, "无法加载藏品详情，请稍后重试");
    assert!(get_similar_artifacts(state, "nope".to_string())
        .await
        .unwrap()
        .is_empty());

    assert_eq!(get_departments(state).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_preferences_and_onboarding() {
    let app = test_app(FakeMuseumApi::default()).await;
    let state = &app.state;

    let value = get_preference(state, "sort_order".to_string(), "name".to_string())
        .await
        .unwrap();
    assert_eq!(value, "name");

    set_preference(state, "sort_order".to_string(), "value".to_string())
        .await
        .unwrap();
    let value = get_preference(state, "sort_order".to_string(), "name".to_string())
        .await
        .unwrap();
    assert_eq!(value, "value");

    assert!(set_preference(state, "".to_string(), "x".to_string()).await.is_err());

    assert!(!is_onboarding_completed(state).await.unwrap());
    complete_onboarding(state).await.unwrap();
    assert!(is_onboarding_completed(state).await.unwrap());
}

#[tokio::test]
async fn test_reminder_and_notifications() {
    let app = test_app(FakeMuseumApi::default()).await;
    let state = &app.state;

    add_item(state, Item::new("Mantel clock", None, 510.0, 4))
        .await
        .unwrap();

    let posted = send_test_reminder(state).await.unwrap().expect("应发出提醒");
    assert_eq!(get_unread_count(state).await.unwrap(), 1);

    mark_notification_read(state, posted.id).await.unwrap();
    assert_eq!(get_unread_count(state).await.unwrap(), 0);
    assert!(mark_notification_read(state, posted.id + 50).await.is_err());

    set_notifications_enabled(state, false).await.unwrap();
    assert!(send_test_reminder(state).await.unwrap().is_none());
    assert_eq!(list_notifications(state).await.unwrap().len(), 1);

    assert_eq!(cleanup_notifications(state).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_config() {
    let app = test_app(FakeMuseumApi::default()).await;
    let state = &app.state;

    let invalid = AppConfig {
        storage: Some(StorageConfig {
            notification_retention_days: 0,
            ..Default::default()
        }),
        ..Default::default()
    };
    assert!(update_config(state, invalid).await.is_err());
    assert_eq!(
        get_app_config(state).await.unwrap().storage,
        StorageConfig::default()
    );

    let updated = update_config(
        state,
        AppConfig {
            recent_items_limit: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.recent_items_limit, 2);

    for name in ["Fan", "Snuff bottle", "Netsuke"] {
        add_item(state, Item::new(name, None, 20.0, 3)).await.unwrap();
    }
    assert_eq!(get_statistics(state).await.unwrap().recent_additions.len(), 2);
}

#[tokio::test]
async fn test_similar_artifacts_for_item() {
    let mut api = FakeMuseumApi::default();
    for id in 1..=12 {
        api.objects
            .insert(id, FakeMuseumApi::object(id, "Dutch", "Ceramics", "European Sculpture"));
    }
    api.search_results.insert(
        "Ceramics OR Netherlands OR Delft OR plate".to_string(),
        (1..=12).collect(),
    );

    let app = test_app(api).await;
    let state = &app.state;
    let ceramics = category_id(state, "Ceramics").await;

    let mut plate = Item::new("Delft plate", Some(ceramics), 120.0, 4);
    plate.origin = Some("Netherlands".to_string());
    let plate = add_item(state, plate).await.unwrap();

    let similar = get_similar_artifacts_for_item(state, plate.id, None).await.unwrap();
    assert_eq!(similar.len(), 10);

    let similar = get_similar_artifacts_for_item(state, plate.id, Some(3)).await.unwrap();
    let ids: Vec<&str> = similar.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);

    assert!(get_similar_artifacts_for_item(state, plate.id + 1, None).await.is_err());
}

#[tokio::test]
async fn test_culture_or_period_command() {
    let mut api = FakeMuseumApi::default();
    let mut ming = FakeMuseumApi::object(1, "China", "Ceramics", "Asian Art");
    ming.period = "Ming dynasty".to_string();
    let mut qing = FakeMuseumApi::object(2, "China", "Ceramics", "Asian Art");
    qing.period = "Qing dynasty".to_string();
    api.objects.insert(1, ming);
    api.objects.insert(2, qing);
    api.search_results.insert("China OR Ming".to_string(), vec![1, 2]);

    let app = test_app(api).await;
    let state = &app.state;

    let results = search_artifacts_by_culture_or_period(
        state,
        Some("China".to_string()),
        Some("Ming".to_string()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "1");

    assert!(search_artifacts_by_culture_or_period(state, None, None, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_retention_unchanged_when_config_save_fails() {
    let app = test_app(FakeMuseumApi::default()).await;
    let state = &app.state;

    // 配置文件路径被目录占用，保存必然失败
    let config_path = app.dir.path().join("config.json");
    std::fs::remove_file(&config_path).unwrap();
    std::fs::create_dir(&config_path).unwrap();

    let update = AppConfig {
        storage: Some(StorageConfig {
            notification_retention_days: 60,
            ..Default::default()
        }),
        ..Default::default()
    };
    assert!(update_config(state, update).await.is_err());

    assert_eq!(state.system_domain.get_cleaner().get_retention_days().await, 30);
    assert_eq!(
        get_app_config(state)
            .await
            .unwrap()
            .storage
            .notification_retention_days,
        30
    );
}
