use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::categories::models::{
    Category, CategoryNode, CategorySortField, LeveledCategory, SortOrder,
};
use crate::shared::constants::{CATEGORY_NAME_MAX_LENGTH, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::shared::validation::SLUG_REGEX;

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            is_active: c.is_active,
            deleted_at: c.deleted_at,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Admin list row: a category plus its direct-children summary
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryListItemDto {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Direct active, non-deleted children
    pub subcategory_count: usize,
    pub can_delete: bool,
}

impl CategoryListItemDto {
    pub fn new(c: Category, subcategory_count: usize, can_delete: bool) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            is_active: c.is_active,
            deleted_at: c.deleted_at,
            created_at: c.created_at,
            updated_at: c.updated_at,
            subcategory_count,
            can_delete,
        }
    }
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub children: Vec<CategoryTreeDto>,
}

impl From<CategoryNode> for CategoryTreeDto {
    fn from(node: CategoryNode) -> Self {
        let CategoryNode { category, children } = node;
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            is_active: category.is_active,
            children: children.into_iter().map(CategoryTreeDto::from).collect(),
        }
    }
}

/// One row of the indented hierarchy table
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryHierarchyItemDto {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    /// Depth in the tree, roots are 0
    pub level: usize,
    pub subcategory_count: usize,
    pub can_delete: bool,
}

impl CategoryHierarchyItemDto {
    pub fn new(item: LeveledCategory, subcategory_count: usize, can_delete: bool) -> Self {
        let LeveledCategory { category, level } = item;
        Self {
            id: category.id,
            parent_id: category.parent_id,
            name: category.name,
            slug: category.slug,
            is_active: category.is_active,
            level,
            subcategory_count,
            can_delete,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryBreadcrumbDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<Category> for CategoryBreadcrumbDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
        }
    }
}

/// Category detail for the admin edit page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDetailDto {
    pub category: CategoryResponseDto,
    pub level: i64,
    /// Root-to-category breadcrumb, inclusive
    pub path: Vec<CategoryBreadcrumbDto>,
    pub children: Vec<CategoryResponseDto>,
    pub subcategory_count: usize,
    pub can_delete: bool,
}

// Helper functions for defaults
fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Query params for the public category listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCategoriesQuery {
    /// If true, return tree structure. Default: false (flat list)
    #[serde(default)]
    pub tree: bool,
}

/// Query params for the admin category listing
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct CategoryQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    /// Case-insensitive match on name or slug
    pub search: Option<String>,

    #[serde(default)]
    pub sort_by: CategorySortField,

    #[serde(default)]
    pub order: SortOrder,

    /// Filter by active status (true = active, false = inactive, none = all)
    pub is_active: Option<bool>,

    /// Include soft-deleted categories
    #[serde(default)]
    pub include_deleted: bool,
}

impl Default for CategoryQueryParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            sort_by: CategorySortField::default(),
            order: SortOrder::default(),
            is_active: None,
            include_deleted: false,
        }
    }
}

impl CategoryQueryParams {
    /// Saturates for huge page numbers so the page comes back empty
    pub fn offset(&self) -> usize {
        let offset = (self.page.max(1) - 1).saturating_mul(self.limit());
        usize::try_from(offset).unwrap_or(usize::MAX)
    }

    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

// Create request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = CATEGORY_NAME_MAX_LENGTH))]
    pub name: String,

    /// Generated from the name when omitted
    #[validate(length(min = 2, max = 100), regex(path = *SLUG_REGEX, message = "slug must be lowercase letters and digits separated by single hyphens (e.g., 'mesas-de-centro')"))]
    pub slug: Option<String>,

    pub description: Option<String>,

    pub parent_id: Option<i64>,

    /// Defaults to true
    pub is_active: Option<bool>,
}

// Update request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = CATEGORY_NAME_MAX_LENGTH))]
    pub name: Option<String>,

    #[validate(length(min = 2, max = 100), regex(path = *SLUG_REGEX, message = "slug must be lowercase letters and digits separated by single hyphens (e.g., 'mesas-de-centro')"))]
    pub slug: Option<String>,

    pub description: Option<String>,

    /// Absent keeps the current parent, `null` moves the category to the root
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<i64>)]
    pub parent_id: Option<Option<i64>>,

    pub is_active: Option<bool>,
}

/// Distinguish an explicit `null` from a missing field
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SlugCheckQuery {
    pub slug: String,
    /// Category being edited, ignored in the uniqueness check
    pub exclude_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SlugCheckResponseDto {
    pub slug: String,
    pub valid: bool,
    pub available: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct GenerateSlugQuery {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneratedSlugDto {
    pub slug: String,
    pub valid: bool,
}
