// External data providers
// Plain request/response clients; no retries, no in-app timeouts

pub mod images;
pub mod places;

pub use images::{placeholder_image, ImageOptions, ImagesClient, ImagesError};
pub use places::{
    Attraction, Destination, PlaceDetails, PlacesClient, PlacesError, DEFAULT_LIMIT,
    DEFAULT_RADIUS_M,
};
