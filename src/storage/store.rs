// Trip store: in-memory trips and favorites synchronized with the local store
// Mutations are commands applied by a pure transition, then written through

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::database::DatabaseManager;
use super::trips::{validate_date_range, NewTrip, Trip, TripError, TripPatch};

/// Local store entry holding the ordered trip collection
pub const TRIPS_KEY: &str = "wandermate_trips";
/// Local store entry holding the favorited trip ids
pub const FAVORITES_KEY: &str = "wandermate_favorites";

/// Mutation accepted by the trip state
#[derive(Debug, Clone)]
pub enum TripCommand {
    /// Append a fully formed trip to the collection
    Add(Trip),
    /// Replace the trip with the same id, in place
    Replace(Trip),
    /// Remove a trip and its favorite mark, if present
    Delete(String),
    /// Complement membership of an id in the favorites
    ToggleFavorite(String),
}

/// Which collections a transition touched
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StateChange {
    pub trips: bool,
    pub favorites: bool,
}

/// The in-memory collections behind the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripState {
    trips: Vec<Trip>,
    favorites: Vec<String>,
}

impl TripState {
    /// Pure transition: mutate in memory and report what changed.
    /// Persisting the result is the store's separate follow-up step.
    pub fn apply(&mut self, command: TripCommand) -> StateChange {
        match command {
            TripCommand::Add(trip) => {
                self.trips.push(trip);
                StateChange {
                    trips: true,
                    favorites: false,
                }
            }
            TripCommand::Replace(trip) => match self.trips.iter_mut().find(|t| t.id == trip.id) {
                Some(slot) => {
                    *slot = trip;
                    StateChange {
                        trips: true,
                        favorites: false,
                    }
                }
                None => StateChange::default(),
            },
            TripCommand::Delete(id) => {
                let len_before = self.trips.len();
                self.trips.retain(|t| t.id != id);
                let removed = self.trips.len() != len_before;

                let favorites_before = self.favorites.len();
                if removed {
                    // A deleted trip does not linger in the favorites
                    self.favorites.retain(|f| f != &id);
                }
                StateChange {
                    trips: removed,
                    favorites: self.favorites.len() != favorites_before,
                }
            }
            TripCommand::ToggleFavorite(id) => {
                if let Some(pos) = self.favorites.iter().position(|f| f == &id) {
                    self.favorites.remove(pos);
                } else {
                    self.favorites.push(id);
                }
                StateChange {
                    trips: false,
                    favorites: true,
                }
            }
        }
    }
}

/// Single source of truth for trips and favorites
///
/// Constructed with `load`, owned by the caller, and mutated through the
/// operations below. Every accepted mutation is written through to the
/// local store as a whole collection; a failed write is logged and the
/// in-memory state stays authoritative for the session.
pub struct TripStore {
    db: Arc<DatabaseManager>,
    state: TripState,
    last_id_millis: i64,
}

impl TripStore {
    /// Read the persisted collections, falling back to empty ones when an
    /// entry is missing, unreadable, or malformed
    pub fn load(db: Arc<DatabaseManager>) -> Self {
        let trips: Vec<Trip> = read_entry_or_default(&db, TRIPS_KEY);
        let favorites: Vec<String> = read_entry_or_default(&db, FAVORITES_KEY);

        // Seed the id source past every stored id so a restart can never
        // reissue one, even against a lagging clock
        let last_id_millis = trips
            .iter()
            .filter_map(|t| t.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);

        Self {
            db,
            state: TripState { trips, favorites },
            last_id_millis,
        }
    }

    /// Create a trip from the supplied fields, minting its id and creation
    /// timestamp, and return the stored record
    pub fn create_trip(&mut self, input: NewTrip) -> Result<Trip, TripError> {
        validate_date_range(input.start_date, input.end_date)?;

        let trip = Trip {
            id: self.next_id(),
            name: input.name,
            location: input.location,
            start_date: input.start_date,
            end_date: input.end_date,
            description: input.description,
            notes: input.notes,
            budget: input.budget,
            image: input.image,
            coordinates: input.coordinates,
            created_at: Utc::now(),
            updated_at: None,
        };

        let change = self.state.apply(TripCommand::Add(trip.clone()));
        self.persist(change);
        Ok(trip)
    }

    /// Merge a patch onto an existing trip, preserving collection order.
    /// Returns `Ok(None)` when no trip has the given id.
    pub fn update_trip(&mut self, id: &str, patch: TripPatch) -> Result<Option<Trip>, TripError> {
        let Some(existing) = self.state.trips.iter().find(|t| t.id == id) else {
            return Ok(None);
        };

        let mut updated = existing.clone();
        updated.apply_patch(patch);
        validate_date_range(updated.start_date, updated.end_date)?;
        updated.updated_at = Some(Utc::now());

        let change = self.state.apply(TripCommand::Replace(updated.clone()));
        self.persist(change);
        Ok(Some(updated))
    }

    /// Remove a trip by id; `false` when no such trip existed
    pub fn delete_trip(&mut self, id: &str) -> bool {
        let change = self.state.apply(TripCommand::Delete(id.to_string()));
        self.persist(change);
        change.trips
    }

    /// Flip the favorite mark on an id and return the new membership.
    /// The id need not belong to an existing trip.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let change = self.state.apply(TripCommand::ToggleFavorite(id.to_string()));
        self.persist(change);
        self.is_favorite(id)
    }

    /// The ordered trip collection
    pub fn trips(&self) -> &[Trip] {
        &self.state.trips
    }

    /// Look up a single trip by id
    pub fn get_trip(&self, id: &str) -> Option<&Trip> {
        self.state.trips.iter().find(|t| t.id == id)
    }

    /// Favorited trip ids, in the order they were marked
    pub fn favorites(&self) -> &[String] {
        &self.state.favorites
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.state.favorites.iter().any(|f| f == id)
    }

    /// Mint the next trip id from the millisecond clock, strictly greater
    /// than every id issued or loaded before it
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        let id = if now > self.last_id_millis {
            now
        } else {
            self.last_id_millis + 1
        };
        self.last_id_millis = id;
        id.to_string()
    }

    /// Write the touched collections through to the local store
    fn persist(&self, change: StateChange) {
        if change.trips {
            self.write_entry(TRIPS_KEY, &self.state.trips);
        }
        if change.favorites {
            self.write_entry(FAVORITES_KEY, &self.state.favorites);
        }
    }

    fn write_entry<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("failed to encode {key}: {e}");
                return;
            }
        };
        match self.db.set_entry(key, &json) {
            Ok(()) => debug!("persisted {key}"),
            // No retry: memory stays authoritative until the next write
            Err(e) => warn!("failed to persist {key}: {e}"),
        }
    }
}

fn read_entry_or_default<T>(db: &DatabaseManager, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match db.get_entry(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("malformed {key} entry, starting empty: {e}");
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            warn!("could not read {key}, starting empty: {e}");
            T::default()
        }
    }
}
