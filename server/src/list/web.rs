use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Html,
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::list::{ListService, ListServiceError, TodoList};
use crate::web::{AppState, ErrorMessageTemplate};

#[derive(Debug, Deserialize)]
pub struct CreateListForm {
    title: String,
}

#[derive(Debug, Deserialize)]
pub struct EditListForm {
    title: String,
}

/// Helper function to get all lists and render them as the lists panel.
/// This reduces code duplication across handlers that re-render the panel
/// after a mutation.
#[tracing::instrument(skip(list_service))]
async fn render_lists_panel(list_service: &ListService<'_>) -> Result<String, ListError> {
    let lists = list_service.get_all_lists().await?;
    let template = ListsPanelTemplate::new(lists);
    template.render().map_err(ListError::from)
}

/// Custom error type for list handler operations.
#[derive(Debug, thiserror::Error)]
enum ListError {
    /// Represents an error during template rendering.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
    /// Represents a list service error.
    #[error("List service error")]
    Service(#[from] ListServiceError),
}

impl axum::response::IntoResponse for ListError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, user_facing_error_message) = match &self {
            ListError::Service(
                err @ (ListServiceError::TitleTaken(_)
                | ListServiceError::TitleEmpty
                | ListServiceError::TitleTooLong),
            ) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ListError::Service(err @ ListServiceError::ListNotFound(_)) => {
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
#[template(path = "todo/lists_panel.html")]
struct ListsPanelTemplate {
    lists: Vec<TodoList>,
}

impl ListsPanelTemplate {
    pub fn new(lists: Vec<TodoList>) -> Self {
        Self { lists }
    }
}

#[derive(Template)]
#[template(path = "todo/new_list_form.html")]
struct NewListFormTemplate;

#[derive(Template)]
#[template(path = "todo/edit_list_form.html")]
struct EditListFormTemplate {
    list: TodoList,
}

impl EditListFormTemplate {
    pub fn new(list: TodoList) -> Self {
        Self { list }
    }
}

/// Handler for GET /lists that renders the lists panel fragment.
#[tracing::instrument(skip(state))]
async fn lists_panel_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, ListError> {
    let list_service = ListService::new(&state.db);
    let panel_html = render_lists_panel(&list_service).await?;
    Ok(Html(panel_html))
}

/// Handler for serving the new list form.
#[tracing::instrument]
async fn new_list_form_handler() -> Result<Html<String>, ListError> {
    let template = NewListFormTemplate;
    template.render().map(Html).map_err(ListError::from)
}

/// Handler for creating a new list via POST request.
#[tracing::instrument(skip(state))]
async fn create_list_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CreateListForm>,
) -> Result<Html<String>, ListError> {
    let list_service = ListService::new(&state.db);

    list_service.create_list(form.title).await?;
    let panel_html = render_lists_panel(&list_service).await?;
    Ok(Html(panel_html))
}

/// Handler for serving the list options form.
#[tracing::instrument(skip(state))]
async fn edit_list_form_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Html<String>, ListError> {
    let list_service = ListService::new(&state.db);

    let list = list_service.get_list(id).await?;
    let template = EditListFormTemplate::new(list);
    template.render().map(Html).map_err(ListError::from)
}

/// Handler for renaming a list via PUT request.
#[tracing::instrument(skip(state))]
async fn update_list_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<EditListForm>,
) -> Result<Html<String>, ListError> {
    let list_service = ListService::new(&state.db);

    list_service.rename_list(id, form.title).await?;
    let panel_html = render_lists_panel(&list_service).await?;
    Ok(Html(panel_html))
}

/// Handler for soft-deleting a list via DELETE request.
#[tracing::instrument(skip(state))]
async fn delete_list_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Html<String>, ListError> {
    let list_service = ListService::new(&state.db);

    list_service.delete_list(id).await?;
    let panel_html = render_lists_panel(&list_service).await?;
    Ok(Html(panel_html))
}

/// Creates and returns the list router with all list-related HTML routes.
pub fn create_list_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/lists", get(lists_panel_handler).post(create_list_handler))
        .route("/lists/new", get(new_list_form_handler))
        .route(
            "/lists/{id}",
            axum::routing::put(update_list_handler).delete(delete_list_handler),
        )
        .route("/lists/{id}/edit", get(edit_list_form_handler))
        .with_state(state)
}
