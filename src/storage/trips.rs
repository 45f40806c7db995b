// Trip data model and mutation inputs
// Serde layout mirrors the JSON persisted under the wandermate_trips entry

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TripError {
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// Geographic point attached to a trip's destination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A Trip represents one planned journey
///
/// The id is minted by the store at creation time and never changes.
/// Start and end dates are independently optional; when both are present
/// the store enforces end >= start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Trip {
    /// Overwrite fields present in the patch, leaving the rest untouched
    pub fn apply_patch(&mut self, patch: TripPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = Some(start_date);
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = Some(end_date);
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(budget) = patch.budget {
            self.budget = Some(budget);
        }
        if let Some(image) = patch.image {
            self.image = Some(image);
        }
        if let Some(coordinates) = patch.coordinates {
            self.coordinates = Some(coordinates);
        }
    }
}

/// Input for creating a new trip
///
/// Identifier and timestamps are assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

/// Input for updating an existing trip; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

/// Check the end >= start invariant when both dates are present
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), TripError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(TripError::EndBeforeStart { start, end });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_trip_json_layout() {
        let json = r#"{
            "id": "1754300000000",
            "name": "Paris",
            "location": "France",
            "startDate": "2026-01-01",
            "endDate": "2026-01-05",
            "description": "",
            "notes": "bring an umbrella",
            "budget": 1200.5,
            "image": "https://images.example.com/paris.jpg",
            "coordinates": { "lat": 48.8566, "lon": 2.3522 },
            "createdAt": "2026-08-04T12:00:00Z"
        }"#;

        let trip: Trip = serde_json::from_str(json).unwrap();
        assert_eq!(trip.id, "1754300000000");
        assert_eq!(trip.start_date, Some(date("2026-01-01")));
        assert_eq!(trip.end_date, Some(date("2026-01-05")));
        assert_eq!(trip.budget, Some(1200.5));
        assert_eq!(trip.coordinates.unwrap().lat, 48.8566);
        assert_eq!(trip.updated_at, None);

        // Field names stay camelCase on the way back out
        let out = serde_json::to_value(&trip).unwrap();
        assert!(out.get("startDate").is_some());
        assert!(out.get("createdAt").is_some());
        assert!(out.get("updatedAt").is_none());
    }

    #[test]
    fn test_trip_json_tolerates_missing_optionals() {
        let json = r#"{
            "id": "1",
            "name": "Kyoto",
            "location": "Japan",
            "createdAt": "2026-08-04T12:00:00Z"
        }"#;

        let trip: Trip = serde_json::from_str(json).unwrap();
        assert_eq!(trip.start_date, None);
        assert_eq!(trip.description, "");
        assert_eq!(trip.budget, None);
    }

    #[test]
    fn test_apply_patch_overwrites_only_present_fields() {
        let mut trip: Trip = serde_json::from_str(
            r#"{"id":"1","name":"Kyoto","location":"Japan","notes":"old","createdAt":"2026-08-04T12:00:00Z"}"#,
        )
        .unwrap();

        trip.apply_patch(TripPatch {
            notes: Some("new".to_string()),
            budget: Some(900.0),
            ..Default::default()
        });

        assert_eq!(trip.name, "Kyoto");
        assert_eq!(trip.notes, "new");
        assert_eq!(trip.budget, Some(900.0));
    }

    #[test]
    fn test_validate_date_range() {
        assert!(validate_date_range(None, None).is_ok());
        assert!(validate_date_range(Some(date("2026-01-01")), None).is_ok());
        assert!(validate_date_range(None, Some(date("2026-01-01"))).is_ok());
        assert!(validate_date_range(Some(date("2026-01-01")), Some(date("2026-01-01"))).is_ok());
        assert!(validate_date_range(Some(date("2026-01-01")), Some(date("2026-01-05"))).is_ok());

        let err = validate_date_range(Some(date("2026-01-05")), Some(date("2026-01-01")))
            .unwrap_err();
        assert_eq!(
            err,
            TripError::EndBeforeStart {
                start: date("2026-01-05"),
                end: date("2026-01-01"),
            }
        );
    }
}
