use std::sync::Arc;

use super::error::HierarchyError;
use super::source::LocationSource;
use super::tree::LocationTree;

/// Holds the location tree for the lifetime of a session. The source is asked at most
/// once successfully; the tree is never mutated afterwards.
#[derive(Debug, Default)]
pub struct LocationHierarchyCache {
    tree: Option<Arc<LocationTree>>,
}

impl LocationHierarchyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> Option<Arc<LocationTree>> {
        self.tree.clone()
    }

    pub async fn load<S>(&mut self, source: &S) -> Result<Arc<LocationTree>, HierarchyError>
    where
        S: LocationSource + ?Sized,
    {
        if let Some(tree) = &self.tree {
            log::debug!("[CACHE HIT] location tree");
            return Ok(Arc::clone(tree));
        }

        let tree = Arc::new(source.fetch().await.map_err(|e| {
            log::error!("Failed to load location hierarchy: {}", e);
            e
        })?);
        log::info!("Loaded {} countries", tree.countries().count());
        self.tree = Some(Arc::clone(&tree));
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::locations::HttpLocationSource;
    use httpmock::prelude::*;
    use reqwest::Client;
    use serde_json::json;
    use url::Url;

    #[tokio::test]
    async fn fetches_once_per_session() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/locations");
                then.status(200).json_body(json!({"India": {"Goa": ["Panaji"]}}));
            })
            .await;
        let source = HttpLocationSource::with_client(
            Client::new(),
            Url::parse(&server.url("/api/locations")).unwrap(),
        );

        let mut cache = LocationHierarchyCache::new();
        let first = cache.load(&source).await.unwrap();
        let second = cache.load(&source).await.unwrap();

        mock.assert_hits_async(1).await;
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn failure_leaves_the_cache_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/locations");
                then.status(200).body("{ not json");
            })
            .await;
        let source = HttpLocationSource::with_client(
            Client::new(),
            Url::parse(&server.url("/api/locations")).unwrap(),
        );

        let mut cache = LocationHierarchyCache::new();
        assert!(matches!(
            cache.load(&source).await,
            Err(HierarchyError::Decode(_))
        ));
        assert!(cache.tree().is_none());
    }
}
