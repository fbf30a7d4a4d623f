pub mod client;
pub mod error;
pub mod request;
pub mod types;

pub use client::RecommendationClient;
pub use error::{ClientError, RequestBlocked};
pub use request::{FormState, RecommendationRequest, RequestBuilder};
pub use types::{RecommendationOutcome, RecommendationResult};
