use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Storefront routes (read-only, active categories only)
pub fn public_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/{slug}", get(handlers::get_category))
        .with_state(service)
}

/// Admin routes, nested under `/api/admin`
pub fn admin_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/categories",
            get(handlers::admin_list_categories).post(handlers::create_category),
        )
        .route("/categories/tree", get(handlers::get_category_tree))
        .route("/categories/hierarchy", get(handlers::get_category_hierarchy))
        .route("/categories/check-slug", get(handlers::check_slug))
        .route("/categories/generate-slug", get(handlers::generate_slug))
        .route(
            "/categories/{id}",
            get(handlers::get_category_detail)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/categories/{id}/children",
            get(handlers::list_category_children),
        )
        .route("/categories/{id}/path", get(handlers::get_category_path))
        .route(
            "/categories/{id}/activate",
            patch(handlers::activate_category),
        )
        .route(
            "/categories/{id}/deactivate",
            patch(handlers::deactivate_category),
        )
        .with_state(service)
}
