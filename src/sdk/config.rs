use std::{env, fmt::Display, str::FromStr, time::Duration};

use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_GEOLOCATION_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_DISTANCE_KM: f64 = 5.0;

const BASE_URL_KEY: &str = "NEARBY_BASE_URL";
const GEOLOCATION_TIMEOUT_KEY: &str = "NEARBY_GEOLOCATION_TIMEOUT_SECS";
const HTTP_TIMEOUT_KEY: &str = "NEARBY_HTTP_TIMEOUT_SECS";
const REQUIRE_POSITION_KEY: &str = "NEARBY_REQUIRE_POSITION";
const DEFAULT_DISTANCE_KEY: &str = "NEARBY_DEFAULT_DISTANCE_KM";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

/// Decides whether a recommendation request may go out without a user position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestPolicy {
    pub require_position: bool,
    /// Radius sent when the position is optional and the form has no usable distance.
    pub default_distance_km: f64,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            require_position: true,
            default_distance_km: DEFAULT_DISTANCE_KM,
        }
    }
}

/// Deployment configuration. None of this is user input.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    /// `None` waits for the position source indefinitely.
    pub geolocation_timeout: Option<Duration>,
    /// `None` leaves the recommendation round trip unbounded.
    pub http_timeout: Option<Duration>,
    pub policy: RequestPolicy,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so callers and tests need not touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url: String = load(&lookup, BASE_URL_KEY, DEFAULT_BASE_URL.to_string())?;
        let geolocation_secs: u64 = load(
            &lookup,
            GEOLOCATION_TIMEOUT_KEY,
            DEFAULT_GEOLOCATION_TIMEOUT_SECS,
        )?;
        let http_secs: u64 = load(&lookup, HTTP_TIMEOUT_KEY, 0)?;
        let require_position: bool = load(&lookup, REQUIRE_POSITION_KEY, true)?;
        let default_distance_km: f64 = load(&lookup, DEFAULT_DISTANCE_KEY, DEFAULT_DISTANCE_KM)?;

        if !default_distance_km.is_finite() || default_distance_km < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: DEFAULT_DISTANCE_KEY,
                value: default_distance_km.to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }

        Ok(Self {
            base_url: Url::parse(&base_url)?,
            geolocation_timeout: seconds(geolocation_secs),
            http_timeout: seconds(http_secs),
            policy: RequestPolicy {
                require_position,
                default_distance_km,
            },
        })
    }

    pub fn locations_endpoint(&self) -> Result<Url, url::ParseError> {
        self.base_url.join("api/locations")
    }

    pub fn recommend_endpoint(&self) -> Result<Url, url::ParseError> {
        self.base_url.join("api/recommend")
    }
}

fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn load<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            }),
        None => {
            log::info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.geolocation_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.http_timeout, None);
        assert_eq!(config.policy, RequestPolicy::default());
    }

    #[test]
    fn zero_geolocation_timeout_means_wait_forever() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[(GEOLOCATION_TIMEOUT_KEY, "0")])).unwrap();
        assert_eq!(config.geolocation_timeout, None);
    }

    #[test]
    fn position_optional_deployment() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (REQUIRE_POSITION_KEY, "false"),
            (DEFAULT_DISTANCE_KEY, "12.5"),
        ]))
        .unwrap();
        assert!(!config.policy.require_position);
        assert_eq!(config.policy.default_distance_km, 12.5);
    }

    #[test]
    fn invalid_value_names_the_key() {
        let err = ClientConfig::from_lookup(lookup_from(&[(REQUIRE_POSITION_KEY, "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains(REQUIRE_POSITION_KEY));
    }

    #[test]
    fn negative_default_distance_is_rejected() {
        let err =
            ClientConfig::from_lookup(lookup_from(&[(DEFAULT_DISTANCE_KEY, "-1")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == DEFAULT_DISTANCE_KEY));
    }

    #[test]
    fn endpoints_hang_off_the_base_url() {
        let config = ClientConfig::from_lookup(lookup_from(&[(
            BASE_URL_KEY,
            "http://reco.internal:8080",
        )]))
        .unwrap();
        assert_eq!(
            config.recommend_endpoint().unwrap().as_str(),
            "http://reco.internal:8080/api/recommend"
        );
        assert_eq!(
            config.locations_endpoint().unwrap().as_str(),
            "http://reco.internal:8080/api/locations"
        );
    }
}
