// Module declarations
pub mod api;
pub mod config;
pub mod storage;

pub use api::{ImageOptions, ImagesClient, PlacesClient};
pub use config::Config;
pub use storage::{
    get_default_db_path, DatabaseManager, NewTrip, Trip, TripPatch, TripStore,
};
