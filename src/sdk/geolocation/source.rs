use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("The user denied the location request")]
    Denied,

    #[error("No location capability is available")]
    Unsupported,

    #[error("Timed out waiting for a position fix")]
    Timeout,

    #[error("Position unavailable: {0}")]
    Unavailable(String),
}

/// A one-shot position reading. Each call is an independent attempt.
#[async_trait(?Send)]
pub trait PositionSource {
    async fn current_position(&self) -> Result<GeoPosition, GeolocationError>;
}

/// A position known before the session starts (command-line flags, a pinned device).
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionSource {
    position: GeoPosition,
}

impl FixedPositionSource {
    pub fn new(position: GeoPosition) -> Self {
        Self { position }
    }
}

#[async_trait(?Send)]
impl PositionSource for FixedPositionSource {
    async fn current_position(&self) -> Result<GeoPosition, GeolocationError> {
        Ok(self.position)
    }
}

/// Stands in for a client without any location capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailablePositionSource;

#[async_trait(?Send)]
impl PositionSource for UnavailablePositionSource {
    async fn current_position(&self) -> Result<GeoPosition, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}
