// Runtime configuration supplied through the environment
// API keys are required; endpoints and the store path have defaults

use std::env;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::api::{images, places, ImagesClient, PlacesClient};

pub const OPENTRIPMAP_KEY_VAR: &str = "WANDERMATE_OPENTRIPMAP_KEY";
pub const UNSPLASH_KEY_VAR: &str = "WANDERMATE_UNSPLASH_KEY";
pub const OPENTRIPMAP_URL_VAR: &str = "WANDERMATE_OPENTRIPMAP_URL";
pub const UNSPLASH_URL_VAR: &str = "WANDERMATE_UNSPLASH_URL";
pub const DB_PATH_VAR: &str = "WANDERMATE_DB_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub opentripmap_key: String,
    pub unsplash_key: String,
    pub opentripmap_url: String,
    pub unsplash_url: String,
    /// Store database path override; platform data dir when absent
    pub db_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            opentripmap_key: require(OPENTRIPMAP_KEY_VAR)?,
            unsplash_key: require(UNSPLASH_KEY_VAR)?,
            opentripmap_url: try_load(OPENTRIPMAP_URL_VAR, places::DEFAULT_BASE_URL),
            unsplash_url: try_load(UNSPLASH_URL_VAR, images::DEFAULT_BASE_URL),
            db_path: env::var(DB_PATH_VAR).ok().map(PathBuf::from),
        })
    }

    pub fn places_client(&self) -> PlacesClient {
        PlacesClient::new(&self.opentripmap_key).with_base_url(&self.opentripmap_url)
    }

    pub fn images_client(&self) -> ImagesClient {
        ImagesClient::new(&self.unsplash_key).with_base_url(&self.unsplash_url)
    }
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVar(key))
}

fn try_load(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}
