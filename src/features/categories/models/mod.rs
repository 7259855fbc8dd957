pub mod category;

pub use category::{Category, CategoryNode, CategorySortField, LeveledCategory, SortOrder};
