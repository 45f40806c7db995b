// OpenTripMap client: destination geocoding and nearby attraction lookup

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::storage::Coordinates;

pub const DEFAULT_BASE_URL: &str = "https://api.opentripmap.com/0.1/en";

/// Search radius used when the caller has no preference, in meters
pub const DEFAULT_RADIUS_M: u32 = 1000;
/// Result cap used when the caller has no preference
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },
}

/// A geocoded destination match
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub xid: Option<String>,
    pub name: String,
    pub country: Option<String>,
    pub timezone: Option<String>,
    pub point: Option<Coordinates>,
}

/// Details for a single place, looked up by its xid
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub xid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kinds: Option<String>,
    #[serde(default)]
    pub point: Option<Coordinates>,
}

/// A point of interest near a destination, flattened for display
#[derive(Debug, Clone, PartialEq)]
pub struct Attraction {
    pub id: String,
    pub name: String,
    pub kind: String,
}

#[derive(Deserialize)]
struct GeonameResponse {
    #[serde(default)]
    xid: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    point: Option<Coordinates>,
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    properties: FeatureProperties,
}

#[derive(Deserialize, Default)]
struct FeatureProperties {
    #[serde(default)]
    xid: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    kinds: Option<String>,
}

/// Client for the place-name geocoding and radius-search endpoints
#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl PlacesClient {
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

    /// Geocode a free-text query to a destination.
    ///
    /// `Ok(None)` when the provider has no usable match; errors propagate
    /// so the caller can surface them.
    pub async fn search_destination(
        &self,
        query: &str,
    ) -> Result<Option<Destination>, PlacesError> {
        let url = format!("{}/places/geoname", self.base_url);
        let response = self
            .client
            .get(url)
            .query(&[("name", query), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let response = check_status(response).await?;
        let payload: GeonameResponse = response.json().await?;

        // A match without a name is as good as no match
        let Some(name) = payload.name.filter(|n| !n.is_empty()) else {
            return Ok(None);
        };

        Ok(Some(Destination {
            xid: payload.xid,
            name,
            country: payload.country,
            timezone: payload.timezone,
            point: payload.point,
        }))
    }

    /// Fetch full details for a place by its xid
    pub async fn destination_details(&self, xid: &str) -> Result<PlaceDetails, PlacesError> {
        let url = format!("{}/places/xid/{}", self.base_url, xid);
        let response = self
            .client
            .get(url)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// List points of interest around a coordinate.
    ///
    /// Provider failures degrade to an empty list; attractions are a
    /// nice-to-have, not something to fail a page over.
    pub async fn nearby_attractions(
        &self,
        lat: f64,
        lon: f64,
        radius_m: u32,
        limit: u32,
    ) -> Vec<Attraction> {
        match self.fetch_nearby(lat, lon, radius_m, limit).await {
            Ok(attractions) => attractions,
            Err(e) => {
                warn!("attraction lookup at ({lat}, {lon}) failed: {e}");
                Vec::new()
            }
        }
    }

    async fn fetch_nearby(
        &self,
        lat: f64,
        lon: f64,
        radius_m: u32,
        limit: u32,
    ) -> Result<Vec<Attraction>, PlacesError> {
        let url = format!("{}/places/radius", self.base_url);
        let response = self
            .client
            .get(url)
            .query(&[
                ("radius", radius_m.to_string()),
                ("lon", lon.to_string()),
                ("lat", lat.to_string()),
                ("limit", limit.to_string()),
                ("apikey", self.api_key.clone()),
            ])
            .send()
            .await?;

        let response = check_status(response).await?;
        let payload: FeatureCollection = response.json().await?;
        Ok(flatten_features(payload))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PlacesError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "failed to read error body".to_string());
    Err(PlacesError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Flatten the GeoJSON feature collection to display records
fn flatten_features(collection: FeatureCollection) -> Vec<Attraction> {
    collection
        .features
        .into_iter()
        .map(|feature| {
            let id = feature
                .id
                .or(feature.properties.xid)
                .unwrap_or_default();
            let name = feature
                .properties
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Unnamed Attraction".to_string());
            let kind = feature
                .properties
                .kinds
                .as_deref()
                .and_then(|kinds| kinds.split(',').next())
                .filter(|k| !k.is_empty())
                .unwrap_or("attraction")
                .to_string();
            Attraction { id, name, kind }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_features() {
        let payload: FeatureCollection = serde_json::from_str(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "id": "123",
                        "properties": {
                            "xid": "W123",
                            "name": "Louvre Museum",
                            "kinds": "museums,cultural,interesting_places"
                        }
                    },
                    {
                        "type": "Feature",
                        "properties": {
                            "xid": "W456",
                            "name": "",
                            "kinds": ""
                        }
                    },
                    {
                        "type": "Feature",
                        "properties": {}
                    }
                ]
            }"#,
        )
        .unwrap();

        let attractions = flatten_features(payload);

        assert_eq!(
            attractions[0],
            Attraction {
                id: "123".to_string(),
                name: "Louvre Museum".to_string(),
                kind: "museums".to_string(),
            }
        );
        // Falls back to the xid when the feature has no id of its own
        assert_eq!(attractions[1].id, "W456");
        assert_eq!(attractions[1].name, "Unnamed Attraction");
        assert_eq!(attractions[1].kind, "attraction");
        assert_eq!(attractions[2].id, "");
    }

    #[test]
    fn test_geoname_response_parsing() {
        let payload: GeonameResponse = serde_json::from_str(
            r#"{
                "name": "Paris",
                "country": "FR",
                "timezone": "Europe/Paris",
                "lat": 48.85341,
                "lon": 2.3488,
                "point": { "lat": 48.85341, "lon": 2.3488 },
                "status": "OK"
            }"#,
        )
        .unwrap();

        assert_eq!(payload.name.as_deref(), Some("Paris"));
        assert_eq!(payload.country.as_deref(), Some("FR"));
        let point = payload.point.unwrap();
        assert_eq!(point.lat, 48.85341);
        assert_eq!(point.lon, 2.3488);
        assert_eq!(payload.xid, None);
    }

    #[test]
    fn test_place_details_parsing_tolerates_sparse_payload() {
        let details: PlaceDetails =
            serde_json::from_str(r#"{"xid": "W123", "kinds": "museums"}"#).unwrap();

        assert_eq!(details.xid.as_deref(), Some("W123"));
        assert_eq!(details.name, None);
        assert_eq!(details.point, None);
    }

    #[test]
    fn test_base_url_override() {
        let client = PlacesClient::new("key").with_base_url("http://localhost:9000");
        assert_eq!(client.base_url, "http://localhost:9000");
    }

    fn unreachable_base_url() -> String {
        // Grab a free port, then release it so the connection is refused
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_nearby_attractions_degrade_to_empty_on_failure() {
        let client = PlacesClient::new("key").with_base_url(unreachable_base_url());
        let attractions = client.nearby_attractions(48.85, 2.35, 1000, 10).await;
        assert!(attractions.is_empty());
    }

    #[tokio::test]
    async fn test_search_destination_surfaces_failure() {
        let client = PlacesClient::new("key").with_base_url(unreachable_base_url());
        assert!(client.search_destination("Paris").await.is_err());
    }
}
