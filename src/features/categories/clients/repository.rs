use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::features::categories::models::Category;

/// Body sent upstream when creating or replacing a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertCategoryRequest {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub is_active: bool,
}

/// Source of truth for category records.
///
/// The catalog API owns persistence; this service only reads the flat list and
/// forwards mutations.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories, including inactive and soft-deleted ones
    async fn list(&self) -> Result<Vec<Category>>;

    async fn create(&self, request: &UpsertCategoryRequest) -> Result<Category>;

    async fn update(&self, id: i64, request: &UpsertCategoryRequest) -> Result<Category>;

    async fn set_active(&self, id: i64, active: bool) -> Result<Category>;

    /// Soft delete
    async fn delete(&self, id: i64) -> Result<()>;

    async fn is_slug_available(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool>;
}
