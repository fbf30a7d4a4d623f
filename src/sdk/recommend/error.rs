use serde::Deserialize;
use thiserror::Error;

/// Body the recommendation server sends with a non-success status.
#[derive(Deserialize, Debug, Default)]
pub struct ServerErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
}

/// Transport-level failure: the server never produced a usable answer.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Underlying request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// The request needs a user position and none was acquired. No network call is made.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Your location is required for recommendations; allow location access and try again")]
pub struct RequestBlocked;
