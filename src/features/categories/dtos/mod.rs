pub mod category_dto;

pub use category_dto::{
    CategoryBreadcrumbDto, CategoryDetailDto, CategoryHierarchyItemDto, CategoryListItemDto,
    CategoryQueryParams, CategoryResponseDto, CategoryTreeDto, CreateCategoryDto,
    GenerateSlugQuery, GeneratedSlugDto, ListCategoriesQuery, SlugCheckQuery, SlugCheckResponseDto,
    UpdateCategoryDto,
};
