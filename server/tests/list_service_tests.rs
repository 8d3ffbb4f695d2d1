use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait};
use todos_server::entities::{todo_item, todo_list};
use todos_server::item::ItemService;
use todos_server::list::{ListService, ListServiceError};

mod common;

#[tokio::test]
async fn can_create_list() {
    let state = common::setup().await.expect("Failed to setup test context");
    let list_service = ListService::new(&state.db);

    let created_list = list_service
        .create_list("Shopping".to_string())
        .await
        .expect("Failed to create list");

    assert!(created_list.id() > 0);
    assert_eq!(created_list.title(), "Shopping");
    assert!(created_list.items().is_empty());
}

#[tokio::test]
async fn list_titles_are_trimmed_and_validated() {
    let state = common::setup().await.expect("Failed to setup test context");
    let list_service = ListService::new(&state.db);

    let created_list = list_service
        .create_list("  Chores  ".to_string())
        .await
        .expect("Failed to create list");
    assert_eq!(created_list.title(), "Chores");

    let result = list_service.create_list("   ".to_string()).await;
    assert!(matches!(result, Err(ListServiceError::TitleEmpty)));

    let result = list_service.create_list("x".repeat(201)).await;
    assert!(matches!(result, Err(ListServiceError::TitleTooLong)));
}

#[tokio::test]
async fn rejects_duplicate_list_title() {
    let state = common::setup().await.expect("Failed to setup test context");
    let list_service = ListService::new(&state.db);

    list_service
        .create_list("Groceries".to_string())
        .await
        .expect("Failed to create list");

    let result = list_service.create_list("Groceries".to_string()).await;
    assert!(result.is_err());
    if let Err(e) = result {
        assert_eq!(e.to_string(), "A list titled \"Groceries\" already exists");
    }
}

#[tokio::test]
async fn can_rename_list() {
    let state = common::setup().await.expect("Failed to setup test context");
    let list_service = ListService::new(&state.db);

    let created_list = list_service
        .create_list("Weekday".to_string())
        .await
        .expect("Failed to create list");

    let renamed_list = list_service
        .rename_list(created_list.id(), "Weekend".to_string())
        .await
        .expect("Failed to rename list");
    assert_eq!(renamed_list.title(), "Weekend");

    let fetched_list = list_service
        .get_list(created_list.id())
        .await
        .expect("Failed to fetch list");
    assert_eq!(fetched_list.title(), "Weekend");
}

#[tokio::test]
async fn renaming_missing_list_fails() {
    let state = common::setup().await.expect("Failed to setup test context");
    let list_service = ListService::new(&state.db);

    let result = list_service.rename_list(999, "Anything".to_string()).await;
    assert!(result.is_err());
    if let Err(e) = result {
        assert_eq!(e.to_string(), "Todo list with ID 999 not found");
    }
}

#[tokio::test]
async fn soft_delete_hides_list_but_keeps_row() {
    let state = common::setup().await.expect("Failed to setup test context");
    let list_service = ListService::new(&state.db);

    let kept_list = list_service
        .create_list("Kept".to_string())
        .await
        .expect("Failed to create list");
    let doomed_list = list_service
        .create_list("Doomed".to_string())
        .await
        .expect("Failed to create list");

    list_service
        .delete_list(doomed_list.id())
        .await
        .expect("Failed to delete list");

    let remaining = list_service
        .get_all_lists()
        .await
        .expect("Failed to get lists");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id(), kept_list.id());

    // The row survives the soft delete.
    let row = todo_list::Entity::find_by_id(doomed_list.id())
        .one(&state.db)
        .await
        .expect("Failed to query list row")
        .expect("Soft-deleted row should still exist");
    assert!(row.deleted);
}

#[tokio::test]
async fn deleted_list_title_can_be_reused() {
    let state = common::setup().await.expect("Failed to setup test context");
    let list_service = ListService::new(&state.db);

    let first_list = list_service
        .create_list("Holiday".to_string())
        .await
        .expect("Failed to create list");
    list_service
        .delete_list(first_list.id())
        .await
        .expect("Failed to delete list");

    // Uniqueness only applies among non-deleted lists.
    let second_list = list_service
        .create_list("Holiday".to_string())
        .await
        .expect("Title of a soft-deleted list should be reusable");
    assert_ne!(second_list.id(), first_list.id());
}

#[tokio::test]
async fn purge_marks_all_lists_deleted() {
    let state = common::setup().await.expect("Failed to setup test context");
    let list_service = ListService::new(&state.db);

    for title in ["One", "Two", "Three"] {
        list_service
            .create_list(title.to_string())
            .await
            .expect("Failed to create list");
    }

    let purged = list_service.purge_lists().await.expect("Failed to purge");
    assert_eq!(purged, 3);

    let remaining = list_service
        .get_all_lists()
        .await
        .expect("Failed to get lists");
    assert!(remaining.is_empty());

    // Rows survive, all flagged deleted.
    let rows = todo_list::Entity::find()
        .all(&state.db)
        .await
        .expect("Failed to query list rows");
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.deleted));

    // Purging an already-empty view is a no-op.
    let purged_again = list_service.purge_lists().await.expect("Failed to purge");
    assert_eq!(purged_again, 0);
}

#[tokio::test]
async fn get_all_lists_returns_items_in_insertion_order() {
    let state = common::setup().await.expect("Failed to setup test context");
    let list_service = ListService::new(&state.db);
    let item_service = ItemService::new(&state.db);

    let list = list_service
        .create_list("Ordered".to_string())
        .await
        .expect("Failed to create list");
    for title in ["zebra", "apple", "mango"] {
        item_service
            .create_item(list.id(), title.to_string())
            .await
            .expect("Failed to create item");
    }

    let lists = list_service
        .get_all_lists()
        .await
        .expect("Failed to get lists");
    let titles: Vec<&str> = lists[0].items().iter().map(|item| item.title()).collect();
    assert_eq!(titles, vec!["zebra", "apple", "mango"]);
}

#[tokio::test]
async fn items_of_soft_deleted_lists_are_not_served() {
    let state = common::setup().await.expect("Failed to setup test context");
    let list_service = ListService::new(&state.db);

    // Seed a deleted list with an item directly through the entities.
    let now = chrono::Utc::now();
    let list_row = todo_list::ActiveModel {
        title: ActiveValue::Set("Ghost".to_string()),
        deleted: ActiveValue::Set(true),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .expect("Failed to insert list row");
    todo_item::ActiveModel {
        list_id: ActiveValue::Set(list_row.id),
        title: ActiveValue::Set("Haunt".to_string()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .expect("Failed to insert item row");

    let lists = list_service
        .get_all_lists()
        .await
        .expect("Failed to get lists");
    assert!(lists.is_empty());

    let result = list_service.get_list(list_row.id).await;
    assert!(matches!(result, Err(ListServiceError::ListNotFound(_))));
}
