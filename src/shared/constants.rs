/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// CATEGORY CONSTANTS
// =============================================================================

/// Shortest slug accepted for a category
pub const SLUG_MIN_LENGTH: usize = 2;

/// Longest slug accepted for a category
pub const SLUG_MAX_LENGTH: usize = 100;

/// Longest category name accepted by the admin forms
pub const CATEGORY_NAME_MAX_LENGTH: u64 = 255;
