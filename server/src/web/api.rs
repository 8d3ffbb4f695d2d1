use std::sync::Arc;

use axum::Router;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::web::AppState;

/// JSON body returned by every failing API endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable description of the failure
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::list::api::v1::get_todos_handler,
        crate::list::api::v1::create_list_handler,
        crate::list::api::v1::update_list_handler,
        crate::list::api::v1::delete_list_handler,
        crate::list::api::v1::purge_lists_handler,
        crate::item::api::v1::get_items_handler,
        crate::item::api::v1::create_item_handler,
        crate::item::api::v1::update_item_handler,
        crate::item::api::v1::update_item_details_handler,
        crate::item::api::v1::delete_item_handler,
    ),
    tags(
        (name = "Todo Lists", description = "List CRUD and the administrative purge"),
        (name = "Todo Items", description = "Item CRUD and paginated listing")
    )
)]
struct ApiDoc;

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    let lists_router = crate::list::api::v1::create_api_router(state.clone());
    let items_router = crate::item::api::v1::create_api_router(state);
    let api_routes = lists_router.merge(items_router);
    Router::new()
        .nest("/api/v1", api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
