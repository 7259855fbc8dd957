use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::core::config::CatalogApiConfig;
use crate::core::error::{AppError, Result};
use crate::features::categories::clients::repository::{
    CategoryRepository, UpsertCategoryRequest,
};
use crate::features::categories::models::Category;

#[derive(Debug, Deserialize)]
struct SlugAvailabilityResponse {
    available: bool,
}

/// Error body returned by the catalog API on non-2xx responses
#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    #[serde(alias = "error", alias = "detail")]
    message: String,
}

/// Client for the catalog REST API's category endpoints
pub struct CatalogApiClient {
    config: CatalogApiConfig,
    http_client: reqwest::Client,
}

impl CatalogApiClient {
    pub fn new(config: CatalogApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent("NovaLivingAdmin/0.1")
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!("Catalog API request: {} {}", method, url);

        let builder = self.http_client.request(method, url);
        match &self.config.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, action: &str) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("Failed to {}: {}", action, e);
            AppError::ExternalServiceError(format!("Failed to {}: {}", action, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Catalog API error: HTTP {} - {}", status, body);
            return Err(map_upstream_error(status, &body));
        }

        Ok(response)
    }

    async fn parse<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse {} response: {}", what, e);
            AppError::ExternalServiceError(format!("Failed to parse {} response: {}", what, e))
        })
    }
}

#[async_trait]
impl CategoryRepository for CatalogApiClient {
    async fn list(&self) -> Result<Vec<Category>> {
        let response = self
            .send(self.request(Method::GET, "/categories"), "list categories")
            .await?;
        let categories: Vec<Category> = Self::parse(response, "category list").await?;

        tracing::debug!("Fetched {} categories from catalog API", categories.len());
        Ok(categories)
    }

    async fn create(&self, request: &UpsertCategoryRequest) -> Result<Category> {
        let response = self
            .send(
                self.request(Method::POST, "/categories").json(request),
                "create category",
            )
            .await?;
        let category: Category = Self::parse(response, "category").await?;

        tracing::info!("Created category {} ({})", category.id, category.slug);
        Ok(category)
    }

    async fn update(&self, id: i64, request: &UpsertCategoryRequest) -> Result<Category> {
        let response = self
            .send(
                self.request(Method::PUT, &format!("/categories/{}", id))
                    .json(request),
                "update category",
            )
            .await?;
        let category: Category = Self::parse(response, "category").await?;

        tracing::info!("Updated category {}", id);
        Ok(category)
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<Category> {
        let action = if active { "activate" } else { "deactivate" };
        let response = self
            .send(
                self.request(Method::PATCH, &format!("/categories/{}/{}", id, action)),
                &format!("{} category", action),
            )
            .await?;
        let category: Category = Self::parse(response, "category").await?;

        tracing::info!("Category {} {}d", id, action);
        Ok(category)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.send(
            self.request(Method::DELETE, &format!("/categories/{}", id)),
            "delete category",
        )
        .await?;

        tracing::info!("Deleted category {}", id);
        Ok(())
    }

    async fn is_slug_available(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        let response = self
            .send(
                self.request(Method::GET, &check_slug_path(slug, exclude_id)),
                "check slug",
            )
            .await?;
        let availability: SlugAvailabilityResponse =
            Self::parse(response, "slug availability").await?;
        Ok(availability.available)
    }
}

fn check_slug_path(slug: &str, exclude_id: Option<i64>) -> String {
    let mut path = format!("/categories/check-slug?slug={}", urlencoding::encode(slug));
    if let Some(id) = exclude_id {
        path.push_str(&format!("&exclude_id={}", id));
    }
    path
}

/// Translate a non-2xx catalog API response into an application error
fn map_upstream_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<UpstreamErrorBody>(body)
        .map(|b| b.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("Catalog API returned HTTP {}", status)
            } else {
                body.trim().to_string()
            }
        });

    match status {
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            AppError::Validation(message)
        }
        _ => AppError::ExternalServiceError(format!("Catalog API error: HTTP {} - {}", status, message)),
    }
}
