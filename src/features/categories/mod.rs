//! Product category feature.
//!
//! Category records live in the upstream catalog API. This feature reads the
//! flat list, derives tree, hierarchy, breadcrumb and search views from it and
//! forwards admin mutations.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/categories` | Active categories, flat or `?tree=true` |
//! | GET | `/api/categories/{slug}` | Active category by slug |
//! | GET | `/api/admin/categories` | Search, sort and paginate all categories |
//! | POST | `/api/admin/categories` | Create a category |
//! | GET | `/api/admin/categories/tree` | Nested tree |
//! | GET | `/api/admin/categories/hierarchy` | Flattened tree with levels |
//! | GET | `/api/admin/categories/check-slug` | Slug validity and availability |
//! | GET | `/api/admin/categories/generate-slug` | Slug suggestion for a name |
//! | GET | `/api/admin/categories/{id}` | Detail with breadcrumb and children |
//! | PUT | `/api/admin/categories/{id}` | Update a category |
//! | DELETE | `/api/admin/categories/{id}` | Soft delete (no active subcategories) |
//! | GET | `/api/admin/categories/{id}/children` | Direct children |
//! | GET | `/api/admin/categories/{id}/path` | Breadcrumb |
//! | PATCH | `/api/admin/categories/{id}/activate` | Activate |
//! | PATCH | `/api/admin/categories/{id}/deactivate` | Deactivate |

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod hierarchy;
pub mod models;
pub mod routes;
pub mod services;
pub mod slug;

pub use services::CategoryService;
