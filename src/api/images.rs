// Unsplash photo search with a generated-placeholder fallback

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";

const PLACEHOLDER_BASE_URL: &str = "https://via.placeholder.com";
const DEFAULT_PLACEHOLDER_WIDTH: u32 = 800;
const DEFAULT_PLACEHOLDER_HEIGHT: u32 = 400;

#[derive(Error, Debug)]
pub enum ImagesError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },
}

/// Requested display dimensions for a fetched photo
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Deserialize)]
struct SearchPhotosResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
}

/// Client for the photo-search endpoint
#[derive(Clone)]
pub struct ImagesClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ImagesClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Overrides the provider endpoint, e.g. for a local stand-in
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch a photo URL for a location, sized per the options.
    /// `None` when the provider fails or has no results.
    pub async fn city_image(&self, location: &str, options: ImageOptions) -> Option<String> {
        match self.fetch_city_image(location, options).await {
            Ok(image_url) => image_url,
            Err(e) => {
                warn!("photo search for {location:?} failed: {e}");
                None
            }
        }
    }

    /// `city_image` composed with the placeholder fallback
    pub async fn city_image_or_placeholder(
        &self,
        location: &str,
        options: ImageOptions,
    ) -> String {
        match self.city_image(location, options).await {
            Some(image_url) => image_url,
            None => placeholder_image(
                location,
                options.width.unwrap_or(DEFAULT_PLACEHOLDER_WIDTH),
                options.height.unwrap_or(DEFAULT_PLACEHOLDER_HEIGHT),
            ),
        }
    }

    async fn fetch_city_image(
        &self,
        location: &str,
        options: ImageOptions,
    ) -> Result<Option<String>, ImagesError> {
        let url = format!("{}/search/photos", self.base_url);
        let query = format!("{location} city landscape");
        let response = self
            .client
            .get(url)
            .query(&[
                ("query", query.as_str()),
                ("per_page", "1"),
                ("client_id", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(ImagesError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let payload: SearchPhotosResponse = response.json().await?;
        Ok(payload
            .results
            .into_iter()
            .next()
            .map(|photo| apply_dimensions(photo.urls.regular, options)))
    }
}

/// Rewrite the provider's sizing parameters to the requested dimensions
fn apply_dimensions(image_url: String, options: ImageOptions) -> String {
    if options.width.is_none() && options.height.is_none() {
        return image_url;
    }

    let Ok(mut url) = Url::parse(&image_url) else {
        return image_url;
    };
    if let Some(width) = options.width {
        set_query_param(&mut url, "w", &width.to_string());
    }
    if let Some(height) = options.height {
        set_query_param(&mut url, "h", &height.to_string());
    }
    url.to_string()
}

/// Replace a query parameter, dropping any previous occurrence
fn set_query_param(url: &mut Url, key: &str, value: &str) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (k, v) in &kept {
        pairs.append_pair(k, v);
    }
    pairs.append_pair(key, value);
}

/// Generated placeholder URL shown when no photo is available
pub fn placeholder_image(text: &str, width: u32, height: u32) -> String {
    let label = if text.is_empty() { "No Image" } else { text };
    let encoded: String = url::form_urlencoded::byte_serialize(label.as_bytes()).collect();
    format!("{PLACEHOLDER_BASE_URL}/{width}x{height}?text={encoded}")
}
