use crate::core::error::{AppError, Result};
use crate::features::categories::clients::{CategoryRepository, UpsertCategoryRequest};
use crate::features::categories::models::Category;
use crate::features::categories::slug::generate_slug;
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use tokio::sync::RwLock;

/// Active category created `id` minutes after 2024-01-01, slug derived from the name
pub fn sample_category(id: i64, name: &str, parent_id: Option<i64>) -> Category {
    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(id);
    Category {
        id,
        name: name.to_string(),
        slug: generate_slug(name),
        description: None,
        parent_id,
        is_active: true,
        deleted_at: None,
        created_at,
        updated_at: created_at,
    }
}

/// Category with a generated single-word name; the id suffix keeps slugs unique
pub fn fake_category(id: i64, parent_id: Option<i64>) -> Category {
    use fake::faker::lorem::en::Word;
    use fake::Fake;

    let word: String = Word().fake();
    let mut category = sample_category(id, &format!("{} {}", word, id), parent_id);
    category.description = Some(format!("Colección {}", word));
    category
}

/// In-memory stand-in for the catalog API
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    categories: RwLock<Vec<Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories: RwLock::new(categories),
        }
    }

    pub async fn snapshot(&self) -> Vec<Category> {
        self.categories.read().await.clone()
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Category {} not found", id))
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>> {
        Ok(self.snapshot().await)
    }

    async fn create(&self, request: &UpsertCategoryRequest) -> Result<Category> {
        let mut categories = self.categories.write().await;
        let now = Utc::now();
        let category = Category {
            id: categories.iter().map(|c| c.id).max().unwrap_or(0) + 1,
            name: request.name.clone(),
            slug: request.slug.clone(),
            description: request.description.clone(),
            parent_id: request.parent_id,
            is_active: request.is_active,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        categories.push(category.clone());
        Ok(category)
    }

    async fn update(&self, id: i64, request: &UpsertCategoryRequest) -> Result<Category> {
        let mut categories = self.categories.write().await;
        let category = categories
            .iter_mut()
            .find(|c| c.id == id && !c.is_deleted())
            .ok_or_else(|| not_found(id))?;

        category.name = request.name.clone();
        category.slug = request.slug.clone();
        category.description = request.description.clone();
        category.parent_id = request.parent_id;
        category.is_active = request.is_active;
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<Category> {
        let mut categories = self.categories.write().await;
        let category = categories
            .iter_mut()
            .find(|c| c.id == id && !c.is_deleted())
            .ok_or_else(|| not_found(id))?;

        category.is_active = active;
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut categories = self.categories.write().await;
        let category = categories
            .iter_mut()
            .find(|c| c.id == id && !c.is_deleted())
            .ok_or_else(|| not_found(id))?;

        category.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn is_slug_available(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        Ok(!self
            .categories
            .read()
            .await
            .iter()
            .any(|c| c.slug == slug && !c.is_deleted() && Some(c.id) != exclude_id))
    }
}
