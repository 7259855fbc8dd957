use utoipa::{Modify, OpenApi};

use crate::features::categories::models::{CategorySortField, SortOrder};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories (storefront)
        categories_handlers::list_categories,
        categories_handlers::get_category,
        // Categories (admin)
        categories_handlers::admin_list_categories,
        categories_handlers::get_category_tree,
        categories_handlers::get_category_hierarchy,
        categories_handlers::get_category_detail,
        categories_handlers::list_category_children,
        categories_handlers::get_category_path,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::activate_category,
        categories_handlers::deactivate_category,
        categories_handlers::delete_category,
        categories_handlers::check_slug,
        categories_handlers::generate_slug,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Categories
            CategorySortField,
            SortOrder,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryListItemDto,
            categories_dtos::CategoryTreeDto,
            categories_dtos::CategoryHierarchyItemDto,
            categories_dtos::CategoryBreadcrumbDto,
            categories_dtos::CategoryDetailDto,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::SlugCheckResponseDto,
            categories_dtos::GeneratedSlugDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<Vec<categories_dtos::CategoryListItemDto>>,
            ApiResponse<Vec<categories_dtos::CategoryTreeDto>>,
            ApiResponse<Vec<categories_dtos::CategoryHierarchyItemDto>>,
            ApiResponse<Vec<categories_dtos::CategoryBreadcrumbDto>>,
            ApiResponse<categories_dtos::CategoryDetailDto>,
            ApiResponse<categories_dtos::SlugCheckResponseDto>,
            ApiResponse<categories_dtos::GeneratedSlugDto>,
        )
    ),
    tags(
        (name = "categories", description = "Product categories for the storefront (public)"),
        (name = "admin-categories", description = "Category hierarchy management"),
    ),
    info(
        title = "NOVA LIVING Catalog Admin API",
        version = "0.1.0",
        description = "Category hierarchy API for the NOVA LIVING catalog",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
