use std::path::PathBuf;

use async_trait::async_trait;
use csv::ReaderBuilder;
use reqwest::Client;
use url::Url;

use super::error::HierarchyError;
use super::tree::LocationTree;
use crate::sdk::config::ClientConfig;

/// Where the country/state/city hierarchy comes from.
#[async_trait(?Send)]
pub trait LocationSource {
    async fn fetch(&self) -> Result<LocationTree, HierarchyError>;
}

/// `GET /api/locations` on the recommendation host.
pub struct HttpLocationSource {
    client: Client,
    endpoint: Url,
}

impl HttpLocationSource {
    pub fn new(config: &ClientConfig) -> Result<Self, HierarchyError> {
        Ok(Self::with_client(Client::new(), config.locations_endpoint()?))
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait(?Send)]
impl LocationSource for HttpLocationSource {
    async fn fetch(&self) -> Result<LocationTree, HierarchyError> {
        log::debug!("[LOCATIONS] GET {}", self.endpoint);
        let response = self.client.get(self.endpoint.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HierarchyError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "Failed to parse location tree. URL: {}\nError: {}. Body: {}",
                self.endpoint,
                e,
                text
            );
            e.into()
        })
    }
}

/// A `country,state,city` CSV with a header row. A blank city registers a state without cities.
pub struct CsvLocationSource {
    path: PathBuf,
}

impl CsvLocationSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<LocationTree, HierarchyError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .flexible(true)
            .from_path(&self.path)?;

        let mut tree = LocationTree::default();
        for result in rdr.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let field = |index: usize, name: &str| -> Result<String, HierarchyError> {
                match record.get(index).map(str::trim) {
                    Some(value) if !value.is_empty() => Ok(value.to_string()),
                    _ => Err(HierarchyError::MalformedRow {
                        line,
                        reason: format!("missing {name}"),
                    }),
                }
            };
            let country = field(0, "country")?;
            let state = field(1, "state")?;
            let city = record.get(2).map(str::trim).unwrap_or_default();
            tree.insert(&country, &state, city);
        }

        log::debug!(
            "[LOCATIONS] Read {} countries from {}",
            tree.countries().count(),
            self.path.display()
        );
        Ok(tree)
    }
}

#[async_trait(?Send)]
impl LocationSource for CsvLocationSource {
    async fn fetch(&self) -> Result<LocationTree, HierarchyError> {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::io::Write;

    #[tokio::test]
    async fn http_source_reads_the_tree() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/locations");
                then.status(200)
                    .json_body(json!({"India": {"Goa": ["Panaji"]}}));
            })
            .await;

        let source = HttpLocationSource::with_client(
            Client::new(),
            Url::parse(&server.url("/api/locations")).unwrap(),
        );
        let tree = source.fetch().await.unwrap();
        assert_eq!(tree.cities("India", "Goa").unwrap(), &["Panaji".to_string()]);
    }

    #[tokio::test]
    async fn http_source_reports_bad_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/locations");
                then.status(503);
            })
            .await;

        let source = HttpLocationSource::with_client(
            Client::new(),
            Url::parse(&server.url("/api/locations")).unwrap(),
        );
        assert!(matches!(
            source.fetch().await,
            Err(HierarchyError::Status(503))
        ));
    }

    #[tokio::test]
    async fn csv_source_builds_the_hierarchy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "country,state,city").unwrap();
        writeln!(file, "India,Karnataka,Mysuru").unwrap();
        writeln!(file, "India,Karnataka,Bengaluru").unwrap();
        writeln!(file, "India,Goa,Panaji").unwrap();
        writeln!(file, "Nepal,Bagmati,").unwrap();

        let tree = CsvLocationSource::new(file.path()).fetch().await.unwrap();

        assert_eq!(tree.countries().collect::<Vec<_>>(), vec!["India", "Nepal"]);
        assert_eq!(
            tree.cities("India", "Karnataka").unwrap(),
            &["Mysuru".to_string(), "Bengaluru".to_string()]
        );
        assert!(tree.cities("Nepal", "Bagmati").unwrap().is_empty());
    }

    #[tokio::test]
    async fn csv_row_without_state_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "country,state,city").unwrap();
        writeln!(file, "India,,Panaji").unwrap();

        let err = CsvLocationSource::new(file.path()).fetch().await.unwrap_err();
        assert!(matches!(err, HierarchyError::MalformedRow { line: 2, .. }));
    }
}
