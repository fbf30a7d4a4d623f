use thiserror::Error;

use crate::sdk::geolocation::GeolocationError;
use crate::sdk::locations::HierarchyError;
use crate::sdk::present::Tone;
use crate::sdk::recommend::{ClientError, RequestBlocked};

/// Every way the recommendation flow can degrade. None of them is fatal; the
/// `Display` text is what the user sees.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Location access was denied; showing results without distances")]
    GeolocationDenied,

    #[error("Location is not supported on this device")]
    GeolocationUnsupported,

    #[error("Timed out waiting for your location")]
    GeolocationTimeout,

    #[error("Your location is unavailable: {0}")]
    GeolocationUnavailable(String),

    #[error("Could not load the location list: {0}")]
    HierarchyLoadFailed(#[from] HierarchyError),

    #[error(transparent)]
    RequestBlocked(#[from] RequestBlocked),

    #[error("Error: {0}")]
    ServerError(String),

    #[error("Network error. Check your connection and try again.")]
    NetworkError(#[source] ClientError),

    #[error("No recommendations found.")]
    EmptyResult,
}

impl FlowError {
    pub fn tone(&self) -> Tone {
        match self {
            FlowError::EmptyResult => Tone::Info,
            FlowError::GeolocationDenied
            | FlowError::GeolocationUnsupported
            | FlowError::GeolocationTimeout
            | FlowError::GeolocationUnavailable(_)
            | FlowError::HierarchyLoadFailed(_)
            | FlowError::RequestBlocked(_) => Tone::Warning,
            FlowError::ServerError(_) | FlowError::NetworkError(_) => Tone::Error,
        }
    }
}

impl From<GeolocationError> for FlowError {
    fn from(err: GeolocationError) -> Self {
        match err {
            GeolocationError::Denied => FlowError::GeolocationDenied,
            GeolocationError::Unsupported => FlowError::GeolocationUnsupported,
            GeolocationError::Timeout => FlowError::GeolocationTimeout,
            GeolocationError::Unavailable(reason) => FlowError::GeolocationUnavailable(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_and_network_errors_read_differently() {
        let server = FlowError::ServerError("db down".to_string());
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let network = FlowError::NetworkError(ClientError::Decode(decode));

        assert_eq!(server.to_string(), "Error: db down");
        assert_ne!(server.to_string(), network.to_string());
        assert_eq!(server.tone(), Tone::Error);
        assert_eq!(network.tone(), Tone::Error);
    }

    #[test]
    fn geolocation_failures_are_warnings() {
        for err in [
            GeolocationError::Denied,
            GeolocationError::Unsupported,
            GeolocationError::Timeout,
            GeolocationError::Unavailable("no fix".to_string()),
        ] {
            assert_eq!(FlowError::from(err).tone(), Tone::Warning);
        }
    }

    #[test]
    fn blocked_request_prompts_for_location() {
        let err = FlowError::from(RequestBlocked);
        assert!(err.to_string().contains("location"));
    }
}
