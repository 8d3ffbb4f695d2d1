use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use std::sync::Arc;
use todos_server::item::{ItemDetails, ItemService, PriorityLevel};
use todos_server::list::ListService;
use todos_server::web::{AppState, create_router};
use tower::ServiceExt;

mod common;

fn app_for(ctx: &common::TestContext) -> Router {
    let state = Arc::new(AppState {
        db: Arc::new(ctx.db.clone()),
    });
    create_router(state)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn form_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Seeds a list with three items: two tagged, one untagged.
/// Returns the list id.
async fn seed_tagged_list(db: &sea_orm::DatabaseConnection) -> i32 {
    let list_service = ListService::new(db);
    let item_service = ItemService::new(db);

    let list = list_service
        .create_list("Chores".to_string())
        .await
        .expect("Failed to create list");
    for (title, tags) in [
        ("Tidy shed", Some("home,errands")),
        ("File report", Some("work")),
        ("Daydream", None),
    ] {
        let item = item_service
            .create_item(list.id(), title.to_string())
            .await
            .expect("Failed to create item");
        if let Some(tags) = tags {
            item_service
                .update_item_details(
                    item.id(),
                    ItemDetails {
                        list_id: list.id(),
                        priority: PriorityLevel::None,
                        note: None,
                        colour: None,
                        tags: Some(tags.to_string()),
                    },
                )
                .await
                .expect("Failed to tag item");
        }
    }
    list.id()
}

#[tokio::test]
async fn index_page_renders_shell() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let app = app_for(&ctx);

    let response = app.oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Todo Lists"));
    assert!(html.contains("id=\"lists-panel\""));
}

#[tokio::test]
async fn lists_panel_shows_titles_and_remaining_counts() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let list_service = ListService::new(&ctx.db);
    let item_service = ItemService::new(&ctx.db);

    let list = list_service
        .create_list("Garden".to_string())
        .await
        .expect("Failed to create list");
    let done_item = item_service
        .create_item(list.id(), "Mow lawn".to_string())
        .await
        .expect("Failed to create item");
    item_service
        .update_item(done_item.id(), "Mow lawn".to_string(), true)
        .await
        .expect("Failed to complete item");
    item_service
        .create_item(list.id(), "Plant bulbs".to_string())
        .await
        .expect("Failed to create item");

    let app = app_for(&ctx);
    let response = app.oneshot(get_request("/lists")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Garden"));
    // One of the two items is still open.
    assert!(html.contains("<span class=\"badge\">1</span>"));
}

#[tokio::test]
async fn items_fragment_is_unfiltered_by_default() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let list_id = seed_tagged_list(&ctx.db).await;
    let app = app_for(&ctx);

    let response = app
        .oneshot(get_request(&format!("/lists/{}/items", list_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Tidy shed"));
    assert!(html.contains("File report"));
    assert!(html.contains("Daydream"));
    // The list's distinct tags are offered for filtering.
    assert!(html.contains("errands"));
    assert!(html.contains("work"));
}

#[tokio::test]
async fn any_tag_filter_keeps_the_union() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let list_id = seed_tagged_list(&ctx.db).await;
    let app = app_for(&ctx);

    let response = app
        .oneshot(get_request(&format!(
            "/lists/{}/items?tags=home&match=any",
            list_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Tidy shed"));
    assert!(!html.contains("File report"));
    // Untagged items never match a non-empty filter.
    assert!(!html.contains("Daydream"));
}

#[tokio::test]
async fn all_tag_filter_keeps_the_intersection() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let list_id = seed_tagged_list(&ctx.db).await;
    let app = app_for(&ctx);

    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/lists/{}/items?tags=home,errands&match=all",
            list_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Tidy shed"));
    assert!(!html.contains("File report"));

    // Requiring a tag no single item carries empties the table.
    let response = app
        .oneshot(get_request(&format!(
            "/lists/{}/items?tags=home,work&match=all",
            list_id
        )))
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains("No items to show"));
}

#[tokio::test]
async fn clearing_the_filter_restores_the_baseline() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let list_id = seed_tagged_list(&ctx.db).await;
    let app = app_for(&ctx);

    let response = app
        .oneshot(get_request(&format!(
            "/lists/{}/items?tags=&match=any",
            list_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Tidy shed"));
    assert!(html.contains("File report"));
    assert!(html.contains("Daydream"));
}

#[tokio::test]
async fn can_add_item_through_the_form() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let list_service = ListService::new(&ctx.db);
    let list = list_service
        .create_list("Kitchen".to_string())
        .await
        .expect("Failed to create list");
    let app = app_for(&ctx);

    let response = app
        .oneshot(form_request(
            Method::POST,
            "/items",
            &format!("list_id={}&title=Buy+milk", list.id()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Buy milk"));
}

#[tokio::test]
async fn deleting_the_last_item_shows_the_empty_state() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let list_service = ListService::new(&ctx.db);
    let item_service = ItemService::new(&ctx.db);
    let list = list_service
        .create_list("Nearly done".to_string())
        .await
        .expect("Failed to create list");
    let item = item_service
        .create_item(list.id(), "Last task".to_string())
        .await
        .expect("Failed to create item");
    let app = app_for(&ctx);

    let response = app
        .oneshot(form_request(
            Method::DELETE,
            &format!("/items/{}", item.id()),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("No items to show"));
    assert!(!html.contains("Last task"));
}

#[tokio::test]
async fn blank_list_title_yields_an_inline_error_fragment() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let app = app_for(&ctx);

    let response = app
        .oneshot(form_request(Method::POST, "/lists", "title="))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.headers().get("hx-retarget").unwrap(),
        "#error-message"
    );
    let html = body_text(response).await;
    assert!(html.contains("error-message"));
    assert!(html.contains("List title must not be empty"));
}
