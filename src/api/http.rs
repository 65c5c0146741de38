//! HTTP data source backed by the dashboard API.

use super::source::{decode_hotspots, decode_records, decode_summary, DataSource};
use crate::data::Dataset;
use crate::domain::{CountyRecord, DashboardError, Result, Summary};
use crate::map::CountyBoundaries;
use reqwest::blocking::Client;

/// Blocking HTTP client for the backend API.
///
/// Each call issues one `GET`; there are no retries and no timeouts beyond the
/// client defaults.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: Client,
}

impl HttpSource {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Full URL of a backend path.
    #[must_use]
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let _span = tracing::debug_span!("http_get", url = %url).entered();

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| DashboardError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Network(format!("{url}: HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .map_err(|e| DashboardError::Network(format!("{url}: {e}")))?;

        tracing::debug!(status = status.as_u16(), bytes = bytes.len(), "response received");
        Ok(bytes.to_vec())
    }

    fn get_dataset(&self, dataset: Dataset) -> Result<Vec<u8>> {
        self.get_bytes(&self.url_for(dataset.endpoint()))
    }
}

impl DataSource for HttpSource {
    fn fetch_summary(&self) -> Result<Summary> {
        let body = self.get_dataset(Dataset::Summary)?;
        decode_summary(Dataset::Summary.endpoint(), &body)
    }

    fn fetch_counties(&self) -> Result<Vec<CountyRecord>> {
        let body = self.get_dataset(Dataset::Counties)?;
        decode_records(Dataset::Counties.endpoint(), &body)
    }

    fn fetch_eji_counties(&self) -> Result<Vec<CountyRecord>> {
        let body = self.get_dataset(Dataset::EjiCounties)?;
        decode_records(Dataset::EjiCounties.endpoint(), &body)
    }

    fn fetch_hotspots(&self) -> Result<Vec<CountyRecord>> {
        let body = self.get_dataset(Dataset::Hotspots)?;
        decode_hotspots(Dataset::Hotspots.endpoint(), &body)
    }

    fn fetch_boundaries(&self, url: &str) -> Result<CountyBoundaries> {
        let body = self.get_bytes(url)?;
        let text = String::from_utf8(body)
            .map_err(|e| DashboardError::Decode(format!("county boundaries: {e}")))?;
        CountyBoundaries::from_geojson(&text)
    }
}
