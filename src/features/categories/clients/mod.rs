pub mod catalog_api;
pub mod repository;

pub use catalog_api::CatalogApiClient;
pub use repository::{CategoryRepository, UpsertCategoryRequest};
