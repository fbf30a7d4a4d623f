use serde::{Deserialize, Serialize};

use super::error::ClientError;
use crate::sdk::error::FlowError;
use crate::sdk::geolocation::GeoPosition;

/// One ranked place as returned by the server. Order in the response is the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub avg_cost: f64,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Road distance from the user, computed server-side from the request coordinates.
    pub real_distance: Option<f64>,
    /// Older servers report a straight catalogue distance instead.
    pub distance_km: Option<f64>,
    pub open_hour: Option<u32>,
    #[serde(default)]
    pub short_description: String,
}

impl RecommendationResult {
    pub fn position(&self) -> Option<GeoPosition> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPosition::new(lat, lng)),
            _ => None,
        }
    }

    pub fn distance(&self) -> Option<f64> {
        self.real_distance.or(self.distance_km)
    }
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct RecommendationsBody {
    #[serde(default)]
    pub results: Option<Vec<RecommendationResult>>,
}

/// Everything a recommendation round trip can end in.
#[derive(Debug)]
pub enum RecommendationOutcome {
    /// At least one result, in server order.
    Success(Vec<RecommendationResult>),
    Empty,
    ServerError { status: u16, message: String },
    NetworkError(ClientError),
}

impl RecommendationOutcome {
    pub fn into_results(self) -> Result<Vec<RecommendationResult>, FlowError> {
        match self {
            RecommendationOutcome::Success(results) => Ok(results),
            RecommendationOutcome::Empty => Err(FlowError::EmptyResult),
            RecommendationOutcome::ServerError { message, .. } => {
                Err(FlowError::ServerError(message))
            }
            RecommendationOutcome::NetworkError(err) => Err(FlowError::NetworkError(err)),
        }
    }
}
