use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Html,
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::colour::{self, Colour};
use crate::item::{ItemDetails, ItemService, ItemServiceError, PriorityLevel, TodoItem};
use crate::list::{ListService, ListServiceError, TodoList};
use crate::tags::{self, TagFilter};
use crate::web::{AppState, ErrorMessageTemplate};

#[derive(Debug, Deserialize)]
pub struct CreateItemForm {
    list_id: i32,
    title: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemForm {
    title: String,
    #[serde(default)]
    done: bool,
}

#[derive(Debug, Deserialize)]
pub struct ItemDetailsForm {
    list_id: i32,
    priority: i32,
    note: Option<String>,
    colour: Option<String>,
    tags: Option<String>,
}

/// Query parameters of the items table fragment: the tag filter.
#[derive(Debug, Deserialize)]
pub struct ItemsTableQuery {
    /// Comma-separated search tags; empty or absent means unfiltered.
    #[serde(default)]
    tags: Option<String>,
    /// Whether any or all search tags must be present.
    #[serde(rename = "match", default)]
    match_mode: TagFilter,
}

/// Custom error type for item handler operations.
#[derive(Debug, thiserror::Error)]
enum ItemError {
    /// Represents an error during template rendering.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
    /// Represents an item service error.
    #[error("Item service error")]
    Service(#[from] ItemServiceError),
    /// Represents a list service error while rendering the items table.
    #[error("List service error")]
    ListService(#[from] ListServiceError),
}

impl axum::response::IntoResponse for ItemError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, user_facing_error_message) = match &self {
            ItemError::Service(
                err @ (ItemServiceError::TitleEmpty
                | ItemServiceError::TitleTooLong
                | ItemServiceError::UnsupportedColour(_)),
            ) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ItemError::Service(
                err @ (ItemServiceError::ItemNotFound(_) | ItemServiceError::ListNotFound(_)),
            ) => (StatusCode::NOT_FOUND, err.to_string()),
            ItemError::ListService(err @ ListServiceError::ListNotFound(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred while processing your request. Please try again later."
                    .to_string(),
            ),
        };

        let error_template = ErrorMessageTemplate::new(user_facing_error_message);
        let Ok(rendered) = error_template.render() else {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        };

        let mut response = (status_code, Html(rendered)).into_response();
        // Add HTMX headers to retarget the error message to the error div
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("hx-retarget"),
            HeaderValue::from_static("#error-message"),
        );
        headers.insert(
            HeaderName::from_static("hx-reswap"),
            HeaderValue::from_static("innerHTML"),
        );
        response.headers_mut().extend(headers);
        response
    }
}

#[derive(Template)]
#[template(path = "todo/items_table.html")]
struct ItemsTableTemplate {
    list: TodoList,
    items: Vec<TodoItem>,
    available_tags: Vec<String>,
    filter_tags: String,
    match_all: bool,
}

#[derive(Template)]
#[template(path = "todo/item_row.html")]
struct ItemRowTemplate {
    item: TodoItem,
}

impl ItemRowTemplate {
    pub fn new(item: TodoItem) -> Self {
        Self { item }
    }
}

#[derive(Template)]
#[template(path = "todo/item_details_form.html")]
struct ItemDetailsFormTemplate {
    item: TodoItem,
    lists: Vec<TodoList>,
    priorities: Vec<PriorityLevel>,
    colours: Vec<Colour>,
    colour_code: String,
}

impl ItemDetailsFormTemplate {
    pub fn new(item: TodoItem, lists: Vec<TodoList>) -> Self {
        let colour_code = item.colour().unwrap_or_default().to_string();
        Self {
            item,
            lists,
            priorities: PriorityLevel::ALL.to_vec(),
            colours: colour::PALETTE.to_vec(),
            colour_code,
        }
    }
}

/// Renders the items table of a list with the tag filter applied.
///
/// The list's full item set is the baseline; the displayed subset is
/// recomputed here on every request, so clearing the filter restores the
/// baseline.
#[tracing::instrument(skip(list_service))]
async fn render_items_table(
    list_service: &ListService<'_>,
    list_id: i32,
    filter_tags: &str,
    match_mode: TagFilter,
) -> Result<String, ItemError> {
    let list = list_service.get_list(list_id).await?;
    let search = tags::parse(filter_tags);
    let available_tags = tags::distinct_tags(list.items().iter().map(|item| item.tags()));
    let items: Vec<TodoItem> = list
        .items()
        .iter()
        .filter(|item| tags::matches(item.tags(), &search, match_mode))
        .cloned()
        .collect();

    let template = ItemsTableTemplate {
        match_all: match_mode == TagFilter::All,
        filter_tags: filter_tags.to_string(),
        available_tags,
        items,
        list,
    };
    template.render().map_err(ItemError::from)
}

/// Handler for GET /lists/{id}/items that renders the items table fragment,
/// optionally filtered by tags.
#[tracing::instrument(skip(state))]
async fn items_table_handler(
    State(state): State<Arc<AppState>>,
    Path(list_id): Path<i32>,
    Query(query): Query<ItemsTableQuery>,
) -> Result<Html<String>, ItemError> {
    let list_service = ListService::new(&state.db);
    let table_html = render_items_table(
        &list_service,
        list_id,
        query.tags.as_deref().unwrap_or(""),
        query.match_mode,
    )
    .await?;
    Ok(Html(table_html))
}

/// Handler for creating a new item via POST request.
#[tracing::instrument(skip(state))]
async fn create_item_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CreateItemForm>,
) -> Result<Html<String>, ItemError> {
    let item_service = ItemService::new(&state.db);
    let list_service = ListService::new(&state.db);

    item_service.create_item(form.list_id, form.title).await?;
    let table_html = render_items_table(&list_service, form.list_id, "", TagFilter::Any).await?;
    Ok(Html(table_html))
}

/// Handler for the inline quick-edit of an item via PUT request.
/// Returns only the updated row.
#[tracing::instrument(skip(state))]
async fn update_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<UpdateItemForm>,
) -> Result<Html<String>, ItemError> {
    let item_service = ItemService::new(&state.db);

    let updated_item = item_service.update_item(id, form.title, form.done).await?;
    let row_template = ItemRowTemplate::new(updated_item);
    row_template.render().map(Html).map_err(ItemError::from)
}

/// Handler for deleting an item via DELETE request.
/// Re-renders the owning list's items table; deleting the last item yields
/// the empty state.
#[tracing::instrument(skip(state))]
async fn delete_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Html<String>, ItemError> {
    let item_service = ItemService::new(&state.db);
    let list_service = ListService::new(&state.db);

    let deleted_item = item_service.delete_item(id).await?;
    let table_html =
        render_items_table(&list_service, deleted_item.list_id(), "", TagFilter::Any).await?;
    Ok(Html(table_html))
}

/// Handler for serving the item details form.
#[tracing::instrument(skip(state))]
async fn item_details_form_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Html<String>, ItemError> {
    let item_service = ItemService::new(&state.db);
    let list_service = ListService::new(&state.db);

    let item = item_service.get_item(id).await?;
    let lists = list_service.get_all_lists().await?;
    let template = ItemDetailsFormTemplate::new(item, lists);
    template.render().map(Html).map_err(ItemError::from)
}

/// Handler for updating an item's details via PUT request.
/// Re-renders the items table of the (possibly new) owning list.
#[tracing::instrument(skip(state))]
async fn update_item_details_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<ItemDetailsForm>,
) -> Result<Html<String>, ItemError> {
    let item_service = ItemService::new(&state.db);
    let list_service = ListService::new(&state.db);

    let details = ItemDetails {
        list_id: form.list_id,
        priority: PriorityLevel::from_value(form.priority),
        note: form.note,
        colour: form.colour,
        tags: form.tags,
    };
    let updated_item = item_service.update_item_details(id, details).await?;
    let table_html =
        render_items_table(&list_service, updated_item.list_id(), "", TagFilter::Any).await?;
    Ok(Html(table_html))
}

/// Creates and returns the item router with all item-related HTML routes.
pub fn create_item_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/lists/{id}/items", get(items_table_handler))
        .route("/items", axum::routing::post(create_item_handler))
        .route(
            "/items/{id}",
            axum::routing::put(update_item_handler).delete(delete_item_handler),
        )
        .route("/items/{id}/details", get(item_details_form_handler).put(update_item_details_handler))
        .with_state(state)
}
