//! Category hierarchy utilities.
//!
//! Pure functions over the flat category list returned by the catalog API.
//! Parent/child links are resolved through an id index built per call; no
//! object graph outlives a call and nothing here performs I/O.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;

use thiserror::Error;

use crate::features::categories::models::{
    Category, CategoryNode, CategorySortField, LeveledCategory, SortOrder,
};

/// Level reported by [`category_level`] for an id that is not in the list
pub const LEVEL_NOT_FOUND: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("Corrupt category hierarchy: the parent chain of category {0} contains a cycle")]
    CorruptHierarchy(i64),
}

/// Build a forest from a flat list.
///
/// Roots keep their input order, as do siblings under each parent. Records whose
/// `parent_id` does not resolve to a record in `categories` are dropped together
/// with their subtrees; they are not promoted to roots. With duplicate ids the
/// last occurrence receives the children.
pub fn build_category_tree(categories: &[Category]) -> Vec<CategoryNode> {
    let index: HashMap<i64, usize> = categories
        .iter()
        .enumerate()
        .map(|(position, c)| (c.id, position))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); categories.len()];
    let mut roots = Vec::new();
    let mut orphans = 0usize;

    for (position, category) in categories.iter().enumerate() {
        match category.parent_id {
            None => roots.push(position),
            Some(parent_id) => match index.get(&parent_id) {
                Some(&parent) => children[parent].push(position),
                None => orphans += 1,
            },
        }
    }

    if orphans > 0 {
        tracing::debug!("Dropped {} orphaned categories from tree", orphans);
    }

    // Every position has at most one parent position, so anything reachable
    // from a root is acyclic.
    roots
        .into_iter()
        .map(|root| build_node(root, categories, &children))
        .collect()
}

fn build_node(position: usize, categories: &[Category], children: &[Vec<usize>]) -> CategoryNode {
    CategoryNode {
        category: categories[position].clone(),
        children: children[position]
            .iter()
            .map(|&child| build_node(child, categories, children))
            .collect(),
    }
}

/// Depth-first, pre-order flattening. Roots are level 0.
pub fn flatten_category_tree(nodes: &[CategoryNode]) -> Vec<LeveledCategory> {
    let mut flat = Vec::new();
    push_flattened(nodes, 0, &mut flat);
    flat
}

fn push_flattened(nodes: &[CategoryNode], level: usize, out: &mut Vec<LeveledCategory>) {
    for node in nodes {
        out.push(LeveledCategory {
            category: node.category.clone(),
            level,
        });
        push_flattened(&node.children, level + 1, out);
    }
}

/// Direct children of `parent_id`, in input order. `None` selects the roots.
pub fn find_category_children(categories: &[Category], parent_id: Option<i64>) -> Vec<Category> {
    categories
        .iter()
        .filter(|c| c.parent_id == parent_id)
        .cloned()
        .collect()
}

/// Breadcrumb from the root ancestor down to `category_id`, inclusive.
///
/// Returns an empty path when the id is unknown. The walk stops at a null or
/// unresolved `parent_id`, and fails with [`HierarchyError::CorruptHierarchy`]
/// once it has visited more records than there are distinct ids.
pub fn category_path(
    categories: &[Category],
    category_id: i64,
) -> Result<Vec<Category>, HierarchyError> {
    let by_id: HashMap<i64, &Category> = categories.iter().map(|c| (c.id, c)).collect();

    let Some(mut current) = by_id.get(&category_id).copied() else {
        return Ok(Vec::new());
    };

    let mut path = vec![current.clone()];
    while let Some(parent_id) = current.parent_id {
        let Some(parent) = by_id.get(&parent_id).copied() else {
            break;
        };
        if path.len() >= by_id.len() {
            tracing::warn!("Cycle detected in parent chain of category {}", category_id);
            return Err(HierarchyError::CorruptHierarchy(category_id));
        }
        path.push(parent.clone());
        current = parent;
    }

    path.reverse();
    Ok(path)
}

/// Depth of `category_id`, or [`LEVEL_NOT_FOUND`] when it is not in the list
pub fn category_level(categories: &[Category], category_id: i64) -> Result<i64, HierarchyError> {
    let path = category_path(categories, category_id)?;
    Ok(path.len() as i64 - 1)
}

/// Case-insensitive substring match on name or slug.
///
/// A blank term borrows the input unchanged.
pub fn filter_categories<'a>(categories: &'a [Category], term: &str) -> Cow<'a, [Category]> {
    let term = term.trim();
    if term.is_empty() {
        return Cow::Borrowed(categories);
    }

    let needle = term.to_lowercase();
    Cow::Owned(
        categories
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle) || c.slug.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect(),
    )
}

/// Stable sort into a new vector; equal keys keep their input order in both directions.
pub fn sort_categories(
    categories: &[Category],
    field: CategorySortField,
    order: SortOrder,
) -> Vec<Category> {
    let mut sorted = categories.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare_by_field(a, b, field);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn compare_by_field(a: &Category, b: &Category, field: CategorySortField) -> Ordering {
    match field {
        CategorySortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        CategorySortField::CreatedAt => a.created_at.cmp(&b.created_at),
        CategorySortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

/// True when no active, non-deleted category has `id` as its parent.
///
/// Inactive or soft-deleted children do not block deletion.
pub fn can_delete_category(categories: &[Category], id: i64) -> bool {
    !categories
        .iter()
        .any(|c| c.parent_id == Some(id) && c.is_live())
}

/// Number of direct active, non-deleted children
pub fn count_subcategories(categories: &[Category], parent_id: i64) -> usize {
    categories
        .iter()
        .filter(|c| c.parent_id == Some(parent_id) && c.is_live())
        .count()
}
