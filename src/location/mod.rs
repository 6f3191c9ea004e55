use async_trait::async_trait;
use thiserror::Error;

use crate::config::settings::LocationConfig;
use crate::models::{Coordinates, CoordinatesError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("no location fix available: {0}")]
    NoFix(String),
    #[error("invalid coordinates: {0}")]
    Invalid(#[from] CoordinatesError),
}

/// Source of the user's position for a fetch cycle.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn request_permission(&self) -> Permission;

    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Position taken from the config file, optionally overridden from the
/// command line. `allow = false` in config acts as a denied permission.
#[derive(Debug, Clone)]
pub struct ConfiguredLocation {
    allow: bool,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl ConfiguredLocation {
    pub fn from_config(config: &LocationConfig) -> Self {
        Self {
            allow: config.allow,
            latitude: config.latitude,
            longitude: config.longitude,
        }
    }

    /// Explicit coordinates count as an explicit grant.
    pub fn with_override(mut self, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        if latitude.is_some() || longitude.is_some() {
            self.allow = true;
            self.latitude = latitude.or(self.latitude);
            self.longitude = longitude.or(self.longitude);
        }
        self
    }
}

#[async_trait]
impl LocationProvider for ConfiguredLocation {
    async fn request_permission(&self) -> Permission {
        if self.allow {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)?),
            _ => Err(LocationError::NoFix(
                "set one with `meeqat location set <lat> <lon>`".to_string(),
            )),
        }
    }
}
