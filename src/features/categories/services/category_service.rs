use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::categories::clients::{CategoryRepository, UpsertCategoryRequest};
use crate::features::categories::dtos::{
    CategoryBreadcrumbDto, CategoryDetailDto, CategoryHierarchyItemDto, CategoryListItemDto,
    CategoryQueryParams, CategoryResponseDto, CategoryTreeDto, CreateCategoryDto,
    GeneratedSlugDto, SlugCheckQuery, SlugCheckResponseDto, UpdateCategoryDto,
};
use crate::features::categories::hierarchy::{
    build_category_tree, can_delete_category, category_level, category_path,
    count_subcategories, filter_categories, find_category_children, flatten_category_tree,
    sort_categories,
};
use crate::features::categories::models::{Category, CategorySortField, SortOrder};
use crate::features::categories::slug::{generate_slug, is_valid_slug};

/// Service for category operations
///
/// Every call re-reads the flat list from the catalog API and derives the
/// requested view from it; nothing is cached between requests.
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    // =========================================================================
    // STOREFRONT
    // =========================================================================

    /// List active categories (flat list, by name)
    pub async fn list_public(&self) -> Result<Vec<CategoryResponseDto>> {
        let live = live_only(self.repository.list().await?);
        Ok(sort_categories(&live, CategorySortField::Name, SortOrder::Asc)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// List active categories as tree structure
    ///
    /// A live category under an inactive parent is left out with its parent.
    pub async fn list_public_tree(&self) -> Result<Vec<CategoryTreeDto>> {
        let live = live_only(self.repository.list().await?);
        Ok(build_category_tree(&live)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Get active category by slug
    pub async fn get_public_by_slug(&self, slug: &str) -> Result<CategoryResponseDto> {
        self.repository
            .list()
            .await?
            .into_iter()
            .find(|c| c.slug == slug && c.is_live())
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))
    }

    // =========================================================================
    // ADMIN VIEWS
    // =========================================================================

    /// Filtered, sorted, paginated flat list. Returns the page and the filtered total.
    pub async fn list(
        &self,
        params: &CategoryQueryParams,
    ) -> Result<(Vec<CategoryListItemDto>, i64)> {
        let all = self.repository.list().await?;

        let visible: Vec<Category> = all
            .iter()
            .filter(|c| params.include_deleted || !c.is_deleted())
            .filter(|c| params.is_active.map_or(true, |active| c.is_active == active))
            .cloned()
            .collect();

        let filtered = filter_categories(&visible, params.search.as_deref().unwrap_or(""));
        let sorted = sort_categories(&filtered, params.sort_by, params.order);
        let total = sorted.len() as i64;

        let items = sorted
            .into_iter()
            .skip(params.offset())
            .take(params.limit() as usize)
            .map(|c| {
                let subcategory_count = count_subcategories(&all, c.id);
                let can_delete = can_delete_category(&all, c.id);
                CategoryListItemDto::new(c, subcategory_count, can_delete)
            })
            .collect();

        Ok((items, total))
    }

    /// Nested tree of non-deleted categories
    pub async fn tree(&self) -> Result<Vec<CategoryTreeDto>> {
        let current = not_deleted(self.repository.list().await?);
        Ok(build_category_tree(&current)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Pre-order flattened tree with levels, for indented tables
    pub async fn hierarchy(&self) -> Result<Vec<CategoryHierarchyItemDto>> {
        let all = self.repository.list().await?;
        let current = not_deleted(all.clone());
        let flat = flatten_category_tree(&build_category_tree(&current));

        if flat.len() < current.len() {
            tracing::warn!(
                "{} categories have unresolved parents and are missing from the hierarchy",
                current.len() - flat.len()
            );
        }

        Ok(flat
            .into_iter()
            .map(|item| {
                let id = item.category.id;
                CategoryHierarchyItemDto::new(
                    item,
                    count_subcategories(&all, id),
                    can_delete_category(&all, id),
                )
            })
            .collect())
    }

    pub async fn get_detail(&self, id: i64) -> Result<CategoryDetailDto> {
        let all = self.repository.list().await?;
        let category = find(&all, id)?.clone();

        let path = category_path(&all, id)?;
        let level = category_level(&all, id)?;
        let children = not_deleted(find_category_children(&all, Some(id)));

        Ok(CategoryDetailDto {
            category: category.into(),
            level,
            path: path.into_iter().map(Into::into).collect(),
            children: children.into_iter().map(Into::into).collect(),
            subcategory_count: count_subcategories(&all, id),
            can_delete: can_delete_category(&all, id),
        })
    }

    /// Direct non-deleted children
    pub async fn children(&self, id: i64) -> Result<Vec<CategoryResponseDto>> {
        let all = self.repository.list().await?;
        find(&all, id)?;

        Ok(not_deleted(find_category_children(&all, Some(id)))
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Breadcrumb from the root down to the category
    pub async fn path(&self, id: i64) -> Result<Vec<CategoryBreadcrumbDto>> {
        let all = self.repository.list().await?;
        find(&all, id)?;

        Ok(category_path(&all, id)?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    // =========================================================================
    // ADMIN MUTATIONS
    // =========================================================================

    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let name = normalize_name(&dto.name)?;
        let slug = resolve_slug(&name, dto.slug)?;

        if let Some(parent_id) = dto.parent_id {
            let all = self.repository.list().await?;
            validate_parent(&all, parent_id, None)?;
        }

        self.ensure_slug_available(&slug, None).await?;

        let request = UpsertCategoryRequest {
            name,
            slug,
            description: dto.description,
            parent_id: dto.parent_id,
            is_active: dto.is_active.unwrap_or(true),
        };

        let category = self.repository.create(&request).await?;
        tracing::info!("Category {} created ({})", category.id, category.slug);

        Ok(category.into())
    }

    pub async fn update(&self, id: i64, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        let all = self.repository.list().await?;
        let current = find_editable(&all, id)?;

        let name = match dto.name {
            Some(name) => normalize_name(&name)?,
            None => current.name.clone(),
        };

        let slug = dto.slug.unwrap_or_else(|| current.slug.clone());
        if slug != current.slug {
            if !is_valid_slug(&slug) {
                return Err(AppError::Validation(format!("Invalid slug '{}'", slug)));
            }
            self.ensure_slug_available(&slug, Some(id)).await?;
        }

        let parent_id = dto.parent_id.unwrap_or(current.parent_id);
        if parent_id != current.parent_id {
            if let Some(parent_id) = parent_id {
                validate_parent(&all, parent_id, Some(id))?;
            }
        }

        let request = UpsertCategoryRequest {
            name,
            slug,
            description: dto.description.or_else(|| current.description.clone()),
            parent_id,
            is_active: dto.is_active.unwrap_or(current.is_active),
        };

        let category = self.repository.update(id, &request).await?;
        tracing::info!("Category {} updated", id);

        Ok(category.into())
    }

    pub async fn set_active(&self, id: i64, active: bool) -> Result<CategoryResponseDto> {
        let category = self.repository.set_active(id, active).await?;
        Ok(category.into())
    }

    /// Soft delete, refused while the category has active subcategories
    pub async fn delete(&self, id: i64) -> Result<()> {
        let all = self.repository.list().await?;
        let category = find_editable(&all, id)?;

        if !can_delete_category(&all, id) {
            return Err(AppError::Conflict(format!(
                "Category '{}' has {} active subcategories and cannot be deleted",
                category.name,
                count_subcategories(&all, id)
            )));
        }

        self.repository.delete(id).await?;
        tracing::info!("Category {} deleted", id);

        Ok(())
    }

    // =========================================================================
    // SLUGS
    // =========================================================================

    pub async fn check_slug(&self, query: &SlugCheckQuery) -> Result<SlugCheckResponseDto> {
        let valid = is_valid_slug(&query.slug);
        let available = valid
            && self
                .repository
                .is_slug_available(&query.slug, query.exclude_id)
                .await?;

        Ok(SlugCheckResponseDto {
            slug: query.slug.clone(),
            valid,
            available,
        })
    }

    pub fn generate_slug(name: &str) -> GeneratedSlugDto {
        let slug = generate_slug(name);
        let valid = is_valid_slug(&slug);
        GeneratedSlugDto { slug, valid }
    }

    async fn ensure_slug_available(&self, slug: &str, exclude_id: Option<i64>) -> Result<()> {
        if self.repository.is_slug_available(slug, exclude_id).await? {
            Ok(())
        } else {
            Err(AppError::Conflict(format!(
                "A category with slug '{}' already exists",
                slug
            )))
        }
    }
}

fn live_only(categories: Vec<Category>) -> Vec<Category> {
    categories.into_iter().filter(Category::is_live).collect()
}

fn not_deleted(categories: Vec<Category>) -> Vec<Category> {
    categories.into_iter().filter(|c| !c.is_deleted()).collect()
}

fn find(categories: &[Category], id: i64) -> Result<&Category> {
    categories
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
}

/// Like [`find`] but soft-deleted records count as missing
fn find_editable(categories: &[Category], id: i64) -> Result<&Category> {
    find(categories, id).and_then(|c| {
        if c.is_deleted() {
            Err(AppError::NotFound(format!("Category {} not found", id)))
        } else {
            Ok(c)
        }
    })
}

fn normalize_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name must not be blank".to_string()));
    }
    Ok(name.to_string())
}

/// Use the given slug or derive one from the name
fn resolve_slug(name: &str, slug: Option<String>) -> Result<String> {
    let slug = slug.unwrap_or_else(|| generate_slug(name));
    if !is_valid_slug(&slug) {
        return Err(AppError::Validation(format!(
            "Could not derive a valid slug from '{}'; provide one explicitly",
            name
        )));
    }
    Ok(slug)
}

/// The parent must exist, not be soft-deleted and not sit below `child_id`
fn validate_parent(categories: &[Category], parent_id: i64, child_id: Option<i64>) -> Result<()> {
    let parent = categories
        .iter()
        .find(|c| c.id == parent_id && !c.is_deleted())
        .ok_or_else(|| {
            AppError::Validation(format!("Parent category {} does not exist", parent_id))
        })?;

    if let Some(child_id) = child_id {
        if parent.id == child_id {
            return Err(AppError::Validation(
                "A category cannot be its own parent".to_string(),
            ));
        }
        if category_path(categories, parent_id)?
            .iter()
            .any(|ancestor| ancestor.id == child_id)
        {
            return Err(AppError::Validation(format!(
                "Category {} cannot be moved under its own descendant {}",
                child_id, parent_id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{fake_category, sample_category, InMemoryCategoryRepository};
    use chrono::Utc;

    fn furniture() -> Vec<Category> {
        let mut deleted = sample_category(7, "Descatalogado", Some(1));
        deleted.deleted_at = Some(Utc::now());
        let mut hidden = sample_category(8, "Exterior", None);
        hidden.is_active = false;

        vec![
            sample_category(1, "Salón", None),
            sample_category(2, "Sofás", Some(1)),
            sample_category(3, "Dormitorio", None),
            sample_category(4, "Chaise longue", Some(2)),
            sample_category(5, "Mesas de centro", Some(1)),
            sample_category(6, "Camas", Some(3)),
            deleted,
            hidden,
            sample_category(9, "Hamacas", Some(8)),
        ]
    }

    fn service_with(categories: Vec<Category>) -> (CategoryService, Arc<InMemoryCategoryRepository>) {
        let repository = Arc::new(InMemoryCategoryRepository::new(categories));
        (CategoryService::new(repository.clone()), repository)
    }

    fn create_dto(name: &str) -> CreateCategoryDto {
        CreateCategoryDto {
            name: name.to_string(),
            slug: None,
            description: None,
            parent_id: None,
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_public_list_hides_inactive_and_deleted() {
        let (service, _) = service_with(furniture());

        let names: Vec<String> = service
            .list_public()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(
            names,
            vec!["Camas", "Chaise longue", "Dormitorio", "Hamacas", "Mesas de centro", "Salón", "Sofás"]
        );

        // Hamacas sits under an inactive parent, so the tree leaves it out
        let tree = service.list_public_tree().await.unwrap();
        let roots: Vec<i64> = tree.iter().map(|n| n.id).collect();
        assert_eq!(roots, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_public_get_by_slug() {
        let (service, _) = service_with(furniture());

        assert_eq!(service.get_public_by_slug("sofas").await.unwrap().id, 2);
        assert!(matches!(
            service.get_public_by_slug("exterior").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_filters_sorts_and_paginates() {
        let (service, _) = service_with(furniture());

        let params = CategoryQueryParams {
            search: Some("SA".to_string()),
            ..Default::default()
        };
        let (items, total) = service.list(&params).await.unwrap();
        let ids: Vec<i64> = items.iter().map(|c| c.id).collect();
        // "mesas de centro" and "salon"
        assert_eq!(total, 2);
        assert_eq!(ids, vec![5, 1]);

        let salon = items.iter().find(|c| c.id == 1).unwrap();
        assert_eq!(salon.subcategory_count, 2);
        assert!(!salon.can_delete);

        let params = CategoryQueryParams {
            sort_by: CategorySortField::CreatedAt,
            order: SortOrder::Desc,
            page: 2,
            page_size: 3,
            include_deleted: true,
            ..Default::default()
        };
        let (items, total) = service.list(&params).await.unwrap();
        assert_eq!(total, 9);
        assert_eq!(items.iter().map(|c| c.id).collect::<Vec<_>>(), vec![6, 5, 4]);

        let params = CategoryQueryParams {
            is_active: Some(false),
            ..Default::default()
        };
        let (items, _) = service.list(&params).await.unwrap();
        assert_eq!(items.iter().map(|c| c.id).collect::<Vec<_>>(), vec![8]);
    }

    #[tokio::test]
    async fn test_hierarchy_is_preorder_with_levels() {
        let (service, _) = service_with(furniture());

        let rows: Vec<(i64, usize)> = service
            .hierarchy()
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.id, r.level))
            .collect();
        assert_eq!(
            rows,
            vec![(1, 0), (2, 1), (4, 2), (5, 1), (3, 0), (6, 1), (8, 0), (9, 1)]
        );
    }

    #[tokio::test]
    async fn test_admin_tree_skips_deleted_but_keeps_inactive() {
        let (service, _) = service_with(furniture());

        let tree = service.tree().await.unwrap();
        let roots: Vec<i64> = tree.iter().map(|n| n.id).collect();
        assert_eq!(roots, vec![1, 3, 8]);

        let salon: Vec<i64> = tree[0].children.iter().map(|n| n.id).collect();
        assert_eq!(salon, vec![2, 5]);

        let exterior = &tree[2];
        assert!(!exterior.is_active);
        assert_eq!(exterior.children.len(), 1);
        assert_eq!(exterior.children[0].id, 9);
    }

    #[tokio::test]
    async fn test_children_are_direct_and_not_deleted() {
        let (service, _) = service_with(furniture());

        let ids: Vec<i64> = service
            .children(1)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![2, 5]);

        assert!(matches!(
            service.children(42).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_detail_includes_path_and_children() {
        let (service, _) = service_with(furniture());

        let detail = service.get_detail(4).await.unwrap();
        assert_eq!(detail.level, 2);
        assert_eq!(
            detail.path.iter().map(|b| b.slug.as_str()).collect::<Vec<_>>(),
            vec!["salon", "sofas", "chaise-longue"]
        );
        assert!(detail.can_delete);

        let detail = service.get_detail(1).await.unwrap();
        // The soft-deleted child is not listed
        assert_eq!(detail.children.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 5]);
        assert_eq!(detail.subcategory_count, 2);

        assert!(matches!(service.get_detail(42).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_detail_reports_corrupt_hierarchy() {
        let (service, _) = service_with(vec![
            sample_category(1, "A", Some(2)),
            sample_category(2, "B", Some(1)),
        ]);

        assert!(matches!(
            service.path(1).await,
            Err(AppError::ExternalServiceError(_))
        ));
    }

    #[tokio::test]
    async fn test_create_generates_slug() {
        let (service, repository) = service_with(furniture());

        let created = service
            .create(CreateCategoryDto {
                parent_id: Some(3),
                ..create_dto("  Sillón Nórdico ñu ")
            })
            .await
            .unwrap();

        assert_eq!(created.name, "Sillón Nórdico ñu");
        assert_eq!(created.slug, "sillon-nordico-nu");
        assert_eq!(created.parent_id, Some(3));
        assert!(created.is_active);
        assert_eq!(repository.snapshot().await.len(), 10);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let (service, _) = service_with(furniture());

        assert!(matches!(
            service.create(create_dto("Sofás")).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            service.create(create_dto("東京")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.create(create_dto("   ")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service
                .create(CreateCategoryDto {
                    parent_id: Some(7),
                    ..create_dto("Nueva")
                })
                .await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_moves_and_renames() {
        let (service, _) = service_with(furniture());

        let updated = service
            .update(
                5,
                UpdateCategoryDto {
                    name: Some("Mesas auxiliares".to_string()),
                    slug: Some("mesas-auxiliares".to_string()),
                    parent_id: Some(Some(3)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "mesas-auxiliares");
        assert_eq!(updated.parent_id, Some(3));

        let root = service
            .update(
                5,
                UpdateCategoryDto {
                    parent_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(root.parent_id, None);
        assert_eq!(root.name, "Mesas auxiliares");
    }

    #[tokio::test]
    async fn test_update_rejects_cycles_and_taken_slugs() {
        let (service, _) = service_with(furniture());

        let under_descendant = UpdateCategoryDto {
            parent_id: Some(Some(4)),
            ..Default::default()
        };
        assert!(matches!(
            service.update(1, under_descendant).await,
            Err(AppError::Validation(_))
        ));

        let own_parent = UpdateCategoryDto {
            parent_id: Some(Some(2)),
            ..Default::default()
        };
        assert!(matches!(
            service.update(2, own_parent).await,
            Err(AppError::Validation(_))
        ));

        let taken = UpdateCategoryDto {
            slug: Some("camas".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(2, taken).await,
            Err(AppError::Conflict(_))
        ));

        // Keeping the current slug does not trip the uniqueness check
        let same = UpdateCategoryDto {
            slug: Some("sofas".to_string()),
            ..Default::default()
        };
        assert!(service.update(2, same).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_requires_no_active_children() {
        let (service, repository) = service_with(furniture());

        assert!(matches!(service.delete(1).await, Err(AppError::Conflict(_))));

        // Inactive children do not block deletion
        service.set_active(9, false).await.unwrap();
        service.delete(8).await.unwrap();
        let snapshot = repository.snapshot().await;
        assert!(snapshot.iter().find(|c| c.id == 8).unwrap().is_deleted());

        assert!(matches!(service.delete(8).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_check_slug() {
        let (service, _) = service_with(furniture());

        let query = SlugCheckQuery {
            slug: "sofas".to_string(),
            exclude_id: None,
        };
        let result = service.check_slug(&query).await.unwrap();
        assert!(result.valid);
        assert!(!result.available);

        let query = SlugCheckQuery {
            slug: "sofas".to_string(),
            exclude_id: Some(2),
        };
        assert!(service.check_slug(&query).await.unwrap().available);

        // The slug of a soft-deleted category can be reused
        let query = SlugCheckQuery {
            slug: "descatalogado".to_string(),
            exclude_id: None,
        };
        assert!(service.check_slug(&query).await.unwrap().available);

        let query = SlugCheckQuery {
            slug: "Sofas".to_string(),
            exclude_id: None,
        };
        let result = service.check_slug(&query).await.unwrap();
        assert!(!result.valid);
        assert!(!result.available);
    }

    #[test]
    fn test_generate_slug_reports_validity() {
        let generated = CategoryService::generate_slug("Sillón Nórdico ñu");
        assert_eq!(generated.slug, "sillon-nordico-nu");
        assert!(generated.valid);

        assert!(!CategoryService::generate_slug("ñ").valid);
    }

    #[tokio::test]
    async fn test_large_generated_catalog() {
        let categories: Vec<Category> = (1..=60)
            .map(|id| fake_category(id, if id > 6 { Some((id - 1) / 6) } else { None }))
            .collect();
        let (service, _) = service_with(categories);

        let rows = service.hierarchy().await.unwrap();
        assert_eq!(rows.len(), 60);
        assert_eq!(rows.iter().filter(|r| r.level == 0).count(), 6);

        let (_, total) = service.list(&CategoryQueryParams::default()).await.unwrap();
        assert_eq!(total, 60);
    }
}
