use reqwest::Client;
use url::Url;

use super::error::{ClientError, ServerErrorPayload};
use super::request::RecommendationRequest;
use super::types::{RecommendationOutcome, RecommendationsBody};
use crate::sdk::config::ClientConfig;

const UNKNOWN_SERVER_ERROR: &str = "unknown";

pub struct RecommendationClient {
    client: Client,
    endpoint: Url,
}

impl RecommendationClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config.recommend_endpoint()?))
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// POSTs the request and folds every way the round trip can end into one outcome.
    pub async fn send(&self, request: &RecommendationRequest) -> RecommendationOutcome {
        match self.round_trip(request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("Recommendation request to {} failed: {}", self.endpoint, err);
                RecommendationOutcome::NetworkError(err)
            }
        }
    }

    async fn round_trip(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationOutcome, ClientError> {
        log::debug!("[CLIENT] POST {}", self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ServerErrorPayload>(&text)
                .ok()
                .and_then(|payload| payload.error)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_SERVER_ERROR.to_string());
            log::error!("Server returned {}: {}", status, message);
            return Ok(RecommendationOutcome::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let body: RecommendationsBody = serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "Failed to parse recommendations. URL: {}\nError: {}. Body: {}",
                self.endpoint,
                e,
                text
            );
            e
        })?;

        Ok(match body.results {
            Some(results) if !results.is_empty() => {
                log::info!("Received {} recommendations", results.len());
                RecommendationOutcome::Success(results)
            }
            _ => {
                log::warn!("Server returned no recommendations");
                RecommendationOutcome::Empty
            }
        })
    }
}
