use std::time::Duration;

use super::source::{GeoPosition, GeolocationError, PositionSource};
use crate::sdk::error::FlowError;
use crate::sdk::present::map::{MapSurface, MarkerStyle};
use crate::sdk::present::view::{ResultView, Tone};

/// Zoom level used when the map re-centers on the user.
pub const USER_ZOOM: u8 = 13;

const USER_POPUP: &str = "You are here";

/// Runs the startup position reading and applies its side effects.
///
/// Failure is an ordinary outcome: the caller gets `None` and the user gets a
/// warning, nothing propagates further.
#[derive(Debug, Clone, Copy)]
pub struct GeolocationAcquirer {
    timeout: Option<Duration>,
}

impl GeolocationAcquirer {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub async fn acquire<S, M, V>(&self, source: &S, map: &mut M, view: &mut V) -> Option<GeoPosition>
    where
        S: PositionSource + ?Sized,
        M: MapSurface + ?Sized,
        V: ResultView + ?Sized,
    {
        match self.read(source).await {
            Ok(position) => {
                log::info!(
                    "Position acquired: {:.5}, {:.5}",
                    position.latitude,
                    position.longitude
                );
                map.set_view(position, USER_ZOOM);
                let marker = map.add_marker(position, MarkerStyle::UserLocation);
                map.bind_popup(marker, USER_POPUP);
                Some(position)
            }
            Err(err) => {
                log::warn!("Continuing without a position: {}", err);
                view.notice(Tone::Warning, &FlowError::from(err).to_string());
                None
            }
        }
    }

    async fn read<S>(&self, source: &S) -> Result<GeoPosition, GeolocationError>
    where
        S: PositionSource + ?Sized,
    {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, source.current_position())
                .await
                .unwrap_or(Err(GeolocationError::Timeout)),
            None => source.current_position().await,
        }
    }
}
