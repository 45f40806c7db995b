// Local persistence for trips and favorites
// This module handles the durable key-value store and the trip state on top

pub mod crud;
pub mod database;
pub mod store;
pub mod trips;

pub use database::{get_default_db_path, DatabaseManager, StorageError, StorageResult};
pub use store::{StateChange, TripCommand, TripState, TripStore, FAVORITES_KEY, TRIPS_KEY};
pub use trips::{Coordinates, NewTrip, Trip, TripError, TripPatch};
