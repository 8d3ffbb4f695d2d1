use crate::item::{ItemDetails, ItemService, ItemServiceError, PriorityLevel, TodoItem};
use crate::list::api::v1::CreatedResponse;
use crate::web::AppState;
use crate::web::api::ErrorResponse;
use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// JSON representation of a TodoItem for API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct TodoItemJson {
    /// Unique identifier for the item
    id: i32,
    /// ID of the owning list
    list_id: i32,
    /// Title of the item
    title: String,
    /// Completion flag
    done: bool,
    /// Priority level value
    priority: i32,
    /// Free-text note, if any
    note: Option<String>,
    /// Colour code from the supported palette, if any
    colour: Option<String>,
    /// Comma-separated tag string, if any
    tags: Option<String>,
}

impl From<TodoItem> for TodoItemJson {
    fn from(item: TodoItem) -> Self {
        Self {
            id: item.id(),
            list_id: item.list_id(),
            title: item.title().to_string(),
            done: item.done(),
            priority: item.priority().value(),
            note: item.note().map(str::to_string),
            colour: item.colour().map(str::to_string),
            tags: item.tags().map(str::to_string),
        }
    }
}

/// Query parameters for the paginated items listing.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ItemsQuery {
    /// ID of the list whose items are paged
    list_id: i32,
    /// 1-based page number
    #[serde(default = "default_page_number")]
    page_number: u64,
    /// Items per page
    #[serde(default = "default_page_size")]
    page_size: u64,
}

fn default_page_number() -> u64 {
    1
}

fn default_page_size() -> u64 {
    10
}

/// API response for one page of a list's items.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedItemsResponse {
    /// Items on this page, ordered by title
    items: Vec<TodoItemJson>,
    /// 1-based page number
    page_number: u64,
    /// Total number of pages
    total_pages: u64,
    /// Total number of items in the list
    total_count: u64,
}

/// JSON request payload for creating an item.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    /// ID of the owning list
    list_id: i32,
    /// Title of the new item
    title: String,
}

/// JSON request payload for the inline quick-edit of an item.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    /// New title of the item
    title: String,
    /// New completion flag
    done: bool,
}

/// JSON request payload for the detail edit of an item.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemDetailsRequest {
    /// ID of the (possibly new) owning list
    list_id: i32,
    /// New priority level value
    priority: i32,
    /// New free-text note
    note: Option<String>,
    /// New colour code; must belong to the supported palette
    colour: Option<String>,
    /// New comma-separated tag string
    tags: Option<String>,
}

pub(crate) fn error_response(err: ItemServiceError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &err {
        ItemServiceError::ItemNotFound(_) => (StatusCode::NOT_FOUND, "ITEM_NOT_FOUND"),
        ItemServiceError::ListNotFound(_) => (StatusCode::NOT_FOUND, "LIST_NOT_FOUND"),
        ItemServiceError::TitleEmpty | ItemServiceError::TitleTooLong => {
            (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_TITLE")
        }
        ItemServiceError::UnsupportedColour(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "UNSUPPORTED_COLOUR")
        }
        ItemServiceError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };
    let message = match &err {
        ItemServiceError::Database(db_err) => {
            tracing::error!("Item operation failed: {}", db_err);
            "An unexpected error occurred while processing your request".to_string()
        }
        other => other.to_string(),
    };
    (status, Json(ErrorResponse::new(code, message)))
}

/// Handler for GET /api/v1/items - Returns one page of a list's items.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(
        ("list_id" = i32, Query, description = "ID of the list whose items are paged"),
        ("page_number" = Option<u64>, Query, description = "1-based page number, defaults to 1"),
        ("page_size" = Option<u64>, Query, description = "Items per page, defaults to 10")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the page", body = PaginatedItemsResponse),
        (status = 404, description = "List not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo Items"
)]
pub async fn get_items_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ItemsQuery>,
) -> Result<Json<PaginatedItemsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let service = ItemService::new(&state.db);

    let page = service
        .items_page(query.list_id, query.page_number, query.page_size)
        .await
        .map_err(error_response)?;
    Ok(Json(PaginatedItemsResponse {
        items: page.items.into_iter().map(TodoItemJson::from).collect(),
        page_number: page.page_number,
        total_pages: page.total_pages,
        total_count: page.total_count,
    }))
}

/// Handler for POST /api/v1/items - Creates an item and returns its id.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = CreatedResponse),
        (status = 404, description = "List not found", body = ErrorResponse),
        (status = 422, description = "Invalid title", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo Items"
)]
pub async fn create_item_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), (StatusCode, Json<ErrorResponse>)> {
    let service = ItemService::new(&state.db);

    let item = service
        .create_item(payload.list_id, payload.title)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: item.id() })))
}

/// Handler for PUT /api/v1/items/{id} - Updates an item's title and done flag.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    params(("id" = i32, Path, description = "ID of the item to update")),
    request_body = UpdateItemRequest,
    responses(
        (status = 204, description = "Item updated"),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 422, description = "Invalid title", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo Items"
)]
pub async fn update_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let service = ItemService::new(&state.db);

    service
        .update_item(id, payload.title, payload.done)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for PUT /api/v1/items/{id}/details - Updates an item's detail
/// fields, possibly moving it to another list.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/api/v1/items/{id}/details",
    params(("id" = i32, Path, description = "ID of the item to update")),
    request_body = UpdateItemDetailsRequest,
    responses(
        (status = 204, description = "Item details updated"),
        (status = 404, description = "Item or target list not found", body = ErrorResponse),
        (status = 422, description = "Unsupported colour", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo Items"
)]
pub async fn update_item_details_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateItemDetailsRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let service = ItemService::new(&state.db);

    let details = ItemDetails {
        list_id: payload.list_id,
        priority: PriorityLevel::from_value(payload.priority),
        note: payload.note,
        colour: payload.colour,
        tags: payload.tags,
    };
    service
        .update_item_details(id, details)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /api/v1/items/{id} - Hard-deletes an item.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(("id" = i32, Path, description = "ID of the item to delete")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo Items"
)]
pub async fn delete_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let service = ItemService::new(&state.db);

    service.delete_item(id).await.map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates and returns the items API router.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/items", get(get_items_handler).post(create_item_handler))
        .route(
            "/items/{id}",
            axum::routing::put(update_item_handler).delete(delete_item_handler),
        )
        .route(
            "/items/{id}/details",
            axum::routing::put(update_item_details_handler),
        )
        .with_state(state)
}
