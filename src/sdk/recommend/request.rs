use chrono::{Local, Timelike};
use serde::Serialize;

use super::error::RequestBlocked;
use crate::sdk::config::RequestPolicy;
use crate::sdk::geolocation::GeoPosition;
use crate::sdk::locations::SelectorState;

/// Raw form values as typed by the user. Numeric fields stay strings until coercion.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub kind: String,
    pub avg_cost: String,
    pub distance_km: String,
    pub weather: String,
    pub travel_type: String,
    pub budget_level: String,
    pub travel_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub avg_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub weather: String,
    pub travel_type: String,
    pub budget_level: String,
    pub travel_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_lng: Option<f64>,
    pub open_hour: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder {
    policy: RequestPolicy,
}

impl RequestBuilder {
    pub fn new(policy: RequestPolicy) -> Self {
        Self { policy }
    }

    /// Builds a request stamped with the current local hour.
    pub fn build(
        &self,
        form: &FormState,
        selector: &SelectorState,
        position: Option<GeoPosition>,
    ) -> Result<RecommendationRequest, RequestBlocked> {
        self.build_at(form, selector, position, Local::now().hour())
    }

    pub fn build_at(
        &self,
        form: &FormState,
        selector: &SelectorState,
        position: Option<GeoPosition>,
        open_hour: u32,
    ) -> Result<RecommendationRequest, RequestBlocked> {
        if self.policy.require_position && position.is_none() {
            log::warn!("Blocking recommendation request: no user position");
            return Err(RequestBlocked);
        }

        // Distance-aware deployments get the real distance from the coordinates instead.
        let distance_km = (!self.policy.require_position)
            .then(|| coerce_number(&form.distance_km, self.policy.default_distance_km));

        Ok(RecommendationRequest {
            kind: form.kind.trim().to_string(),
            avg_cost: coerce_number(&form.avg_cost, 0.0),
            distance_km,
            weather: form.weather.trim().to_string(),
            travel_type: form.travel_type.trim().to_string(),
            budget_level: form.budget_level.trim().to_string(),
            travel_mode: form.travel_mode.trim().to_string(),
            country: selector.country().map(str::to_string),
            state: selector.state().map(str::to_string),
            city: selector.city().map(str::to_string),
            user_lat: position.map(|p| p.latitude),
            user_lng: position.map(|p| p.longitude),
            open_hour,
        })
    }
}

/// Blank, unparseable or non-finite input becomes `fallback`.
fn coerce_number(raw: &str, fallback: f64) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(fallback)
}
