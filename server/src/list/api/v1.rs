use crate::colour;
use crate::item::PriorityLevel;
use crate::item::api::v1::TodoItemJson;
use crate::list::{ListService, ListServiceError, TodoList};
use crate::web::AppState;
use crate::web::api::ErrorResponse;
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// JSON representation of a TodoList for API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct TodoListJson {
    /// Unique identifier for the list
    id: i32,
    /// Title of the list
    title: String,
    /// Items of the list, in insertion order
    items: Vec<TodoItemJson>,
}

impl From<TodoList> for TodoListJson {
    fn from(list: TodoList) -> Self {
        Self {
            id: list.id(),
            title: list.title().to_string(),
            items: list.items().iter().cloned().map(TodoItemJson::from).collect(),
        }
    }
}

/// JSON representation of a priority level.
#[derive(Debug, Serialize, ToSchema)]
pub struct PriorityLevelJson {
    /// Stored integer value of the level
    value: i32,
    /// Display name of the level
    name: String,
}

impl From<PriorityLevel> for PriorityLevelJson {
    fn from(priority: PriorityLevel) -> Self {
        Self {
            value: priority.value(),
            name: priority.label().to_string(),
        }
    }
}

/// JSON representation of a supported colour.
#[derive(Debug, Serialize, ToSchema)]
pub struct ColourJson {
    /// Display name of the colour
    name: String,
    /// Hex code of the colour
    code: String,
}

impl From<colour::Colour> for ColourJson {
    fn from(colour: colour::Colour) -> Self {
        Self {
            name: colour.name().to_string(),
            code: colour.code().to_string(),
        }
    }
}

/// API response for the whole to-do view: lists with items plus the lookup data
/// the client needs to render editors.
#[derive(Debug, Serialize, ToSchema)]
pub struct TodosResponse {
    /// All selectable priority levels
    priority_levels: Vec<PriorityLevelJson>,
    /// The supported colour palette
    colours: Vec<ColourJson>,
    /// All non-deleted lists
    lists: Vec<TodoListJson>,
}

/// JSON request payload for creating a list.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateListRequest {
    /// Title of the new list
    title: String,
}

/// JSON request payload for renaming a list.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateListRequest {
    /// New title of the list
    title: String,
}

/// JSON response carrying the id of a newly created resource.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    /// Database-generated id
    pub id: i32,
}

/// JSON response for the purge operation.
#[derive(Debug, Serialize, ToSchema)]
pub struct PurgeResponse {
    /// Number of lists marked deleted
    purged: u64,
}

pub(crate) fn error_response(err: ListServiceError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &err {
        ListServiceError::ListNotFound(_) => (StatusCode::NOT_FOUND, "LIST_NOT_FOUND"),
        ListServiceError::TitleTaken(_)
        | ListServiceError::TitleEmpty
        | ListServiceError::TitleTooLong => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_TITLE"),
        ListServiceError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };
    let message = match &err {
        ListServiceError::Database(db_err) => {
            tracing::error!("List operation failed: {}", db_err);
            "An unexpected error occurred while processing your request".to_string()
        }
        other => other.to_string(),
    };
    (status, Json(ErrorResponse::new(code, message)))
}

/// Handler for GET /api/v1/todos - Returns all lists with their items plus
/// priority levels and the colour palette.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/todos",
    responses(
        (status = 200, description = "Successfully retrieved the to-do view", body = TodosResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo Lists"
)]
pub async fn get_todos_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TodosResponse>, (StatusCode, Json<ErrorResponse>)> {
    let service = ListService::new(&state.db);

    let lists = service.get_all_lists().await.map_err(error_response)?;
    Ok(Json(TodosResponse {
        priority_levels: PriorityLevel::ALL.into_iter().map(PriorityLevelJson::from).collect(),
        colours: colour::PALETTE.into_iter().map(ColourJson::from).collect(),
        lists: lists.into_iter().map(TodoListJson::from).collect(),
    }))
}

/// Handler for POST /api/v1/lists - Creates a list and returns its id.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/v1/lists",
    request_body = CreateListRequest,
    responses(
        (status = 201, description = "List created", body = CreatedResponse),
        (status = 422, description = "Invalid or duplicate title", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo Lists"
)]
pub async fn create_list_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateListRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), (StatusCode, Json<ErrorResponse>)> {
    let service = ListService::new(&state.db);

    let list = service
        .create_list(payload.title)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: list.id() })))
}

/// Handler for PUT /api/v1/lists/{id} - Renames a list.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/api/v1/lists/{id}",
    params(("id" = i32, Path, description = "ID of the list to rename")),
    request_body = UpdateListRequest,
    responses(
        (status = 204, description = "List renamed"),
        (status = 404, description = "List not found", body = ErrorResponse),
        (status = 422, description = "Invalid or duplicate title", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo Lists"
)]
pub async fn update_list_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateListRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let service = ListService::new(&state.db);

    service
        .rename_list(id, payload.title)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /api/v1/lists/{id} - Soft-deletes a list.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/v1/lists/{id}",
    params(("id" = i32, Path, description = "ID of the list to delete")),
    responses(
        (status = 204, description = "List soft-deleted"),
        (status = 404, description = "List not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo Lists"
)]
pub async fn delete_list_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let service = ListService::new(&state.db);

    service.delete_list(id).await.map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /api/v1/lists - Administrative purge that marks every
/// list deleted.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/v1/lists",
    responses(
        (status = 200, description = "All lists marked deleted", body = PurgeResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo Lists"
)]
pub async fn purge_lists_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PurgeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let service = ListService::new(&state.db);

    let purged = service.purge_lists().await.map_err(error_response)?;
    Ok(Json(PurgeResponse { purged }))
}

/// Creates and returns the lists API router.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", get(get_todos_handler))
        .route(
            "/lists",
            post(create_list_handler).delete(purge_lists_handler),
        )
        .route(
            "/lists/{id}",
            put(update_list_handler).delete(delete_list_handler),
        )
        .with_state(state)
}
