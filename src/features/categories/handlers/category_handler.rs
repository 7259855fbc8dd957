use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::categories::dtos::{
    CategoryBreadcrumbDto, CategoryDetailDto, CategoryHierarchyItemDto, CategoryListItemDto,
    CategoryQueryParams, CategoryResponseDto, CategoryTreeDto, CreateCategoryDto,
    GenerateSlugQuery, GeneratedSlugDto, ListCategoriesQuery, SlugCheckQuery,
    SlugCheckResponseDto, UpdateCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::shared::types::{ApiResponse, Meta};

// =============================================================================
// STOREFRONT
// =============================================================================

/// List all active categories
///
/// Returns categories as flat list or tree structure based on `tree` query param.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let value = if query.tree {
        serde_json::to_value(service.list_public_tree().await?)
    } else {
        serde_json::to_value(service.list_public().await?)
    }
    .map_err(|e| AppError::Internal(format!("Failed to serialize categories: {}", e)))?;

    Ok(Json(ApiResponse::success(Some(value), None, None)))
}

/// Get category by slug
#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get_public_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

// =============================================================================
// ADMIN
// =============================================================================

/// List categories with search, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/admin/categories",
    params(CategoryQueryParams),
    responses(
        (status = 200, description = "Categories retrieved successfully", body = ApiResponse<Vec<CategoryListItemDto>>),
        (status = 502, description = "Catalog API unavailable")
    ),
    tag = "admin-categories"
)]
pub async fn admin_list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(params): Query<CategoryQueryParams>,
) -> Result<Json<ApiResponse<Vec<CategoryListItemDto>>>> {
    let (categories, total) = service.list(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(categories),
        None,
        Some(Meta { total }),
    )))
}

/// Nested category tree
#[utoipa::path(
    get,
    path = "/api/admin/categories/tree",
    responses(
        (status = 200, description = "Category tree", body = ApiResponse<Vec<CategoryTreeDto>>),
    ),
    tag = "admin-categories"
)]
pub async fn get_category_tree(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryTreeDto>>>> {
    let tree = service.tree().await?;
    Ok(Json(ApiResponse::success(Some(tree), None, None)))
}

/// Flattened category tree with depth levels
#[utoipa::path(
    get,
    path = "/api/admin/categories/hierarchy",
    responses(
        (status = 200, description = "Categories in tree order", body = ApiResponse<Vec<CategoryHierarchyItemDto>>),
    ),
    tag = "admin-categories"
)]
pub async fn get_category_hierarchy(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryHierarchyItemDto>>>> {
    let rows = service.hierarchy().await?;
    let total = rows.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(rows),
        None,
        Some(Meta { total }),
    )))
}

/// Get category detail by ID
#[utoipa::path(
    get,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryDetailDto>),
        (status = 404, description = "Category not found"),
        (status = 502, description = "Corrupt hierarchy or catalog API unavailable")
    ),
    tag = "admin-categories"
)]
pub async fn get_category_detail(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CategoryDetailDto>>> {
    let detail = service.get_detail(id).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// List direct subcategories
#[utoipa::path(
    get,
    path = "/api/admin/categories/{id}/children",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Direct children", body = ApiResponse<Vec<CategoryResponseDto>>),
        (status = 404, description = "Category not found")
    ),
    tag = "admin-categories"
)]
pub async fn list_category_children(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let children = service.children(id).await?;
    Ok(Json(ApiResponse::success(Some(children), None, None)))
}

/// Breadcrumb from the root category down to this one
#[utoipa::path(
    get,
    path = "/api/admin/categories/{id}/path",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Breadcrumb", body = ApiResponse<Vec<CategoryBreadcrumbDto>>),
        (status = 404, description = "Category not found"),
        (status = 502, description = "Corrupt hierarchy")
    ),
    tag = "admin-categories"
)]
pub async fn get_category_path(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<CategoryBreadcrumbDto>>>> {
    let path = service.path(id).await?;
    Ok(Json(ApiResponse::success(Some(path), None, None)))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created successfully", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "admin-categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(category), None, None)),
    ))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated successfully", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "admin-categories"
)]
pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Activate a category
#[utoipa::path(
    patch,
    path = "/api/admin/categories/{id}/activate",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category activated", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "admin-categories"
)]
pub async fn activate_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.set_active(id, true).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Deactivate a category
#[utoipa::path(
    patch,
    path = "/api/admin/categories/{id}/deactivate",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deactivated", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "admin-categories"
)]
pub async fn deactivate_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.set_active(id, false).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Delete a category (soft delete)
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted successfully"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still has active subcategories")
    ),
    tag = "admin-categories"
)]
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(None, None, None)))
}

/// Check whether a slug is well-formed and unused
#[utoipa::path(
    get,
    path = "/api/admin/categories/check-slug",
    params(SlugCheckQuery),
    responses(
        (status = 200, description = "Slug check result", body = ApiResponse<SlugCheckResponseDto>),
    ),
    tag = "admin-categories"
)]
pub async fn check_slug(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<SlugCheckQuery>,
) -> Result<Json<ApiResponse<SlugCheckResponseDto>>> {
    let result = service.check_slug(&query).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Suggest a slug for a category name
#[utoipa::path(
    get,
    path = "/api/admin/categories/generate-slug",
    params(GenerateSlugQuery),
    responses(
        (status = 200, description = "Generated slug", body = ApiResponse<GeneratedSlugDto>),
    ),
    tag = "admin-categories"
)]
pub async fn generate_slug(
    Query(query): Query<GenerateSlugQuery>,
) -> Json<ApiResponse<GeneratedSlugDto>> {
    let generated = CategoryService::generate_slug(&query.name);
    Json(ApiResponse::success(Some(generated), None, None))
}
