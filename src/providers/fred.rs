use crate::core::indicators::{DATE_FORMAT, InflationProvider};
use crate::providers::util::ensure_success;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, instrument};

const OBSERVATIONS_PATH: &str = "/fred/series/observations";
/// FRED marks missing observations with a lone dot.
const MISSING_VALUE: &str = ".";

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

/// US consumer price index from the St. Louis Fed FRED API.
pub struct FredProvider {
    base_url: String,
    series_id: String,
    api_key: Option<String>,
    client: Client,
}

impl FredProvider {
    pub fn new(base_url: &str, series_id: &str, api_key: Option<String>, client: Client) -> Self {
        FredProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            series_id: series_id.to_string(),
            api_key,
            client,
        }
    }
}

#[async_trait]
impl InflationProvider for FredProvider {
    #[instrument(skip(self))]
    async fn cpi_since(&self, start: NaiveDate) -> Result<Vec<f64>> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!("FRED API key not configured");
        };
        let start = start.format(DATE_FORMAT).to_string();
        let url = Url::parse_with_params(
            &format!("{}{}", self.base_url, OBSERVATIONS_PATH),
            &[
                ("series_id", self.series_id.as_str()),
                ("api_key", api_key),
                ("file_type", "json"),
                ("observation_start", start.as_str()),
            ],
        )
        .context("Invalid FRED base URL")?;
        debug!("Requesting {} observations since {}", self.series_id, start);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send request for series {}", self.series_id))?;
        let body: ObservationsResponse = ensure_success(response)?
            .json()
            .await
            .with_context(|| format!("Failed to parse observations for {}", self.series_id))?;

        let mut observations: Vec<(NaiveDate, f64)> = body
            .observations
            .iter()
            .filter(|o| o.value != MISSING_VALUE)
            .filter_map(|o| {
                let date = NaiveDate::parse_from_str(&o.date, DATE_FORMAT).ok()?;
                let value = o.value.parse::<f64>().ok()?;
                Some((date, value))
            })
            .collect();
        observations.sort_by_key(|(date, _)| *date);
        Ok(observations.into_iter().map(|(_, value)| value).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::util::build_client;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base_url: &str, api_key: Option<&str>) -> FredProvider {
        FredProvider::new(
            base_url,
            "CPIAUCSL",
            api_key.map(String::from),
            build_client(Duration::from_secs(5)).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_cpi_since() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(OBSERVATIONS_PATH))
            .and(query_param("series_id", "CPIAUCSL"))
            .and(query_param("api_key", "key"))
            .and(query_param("file_type", "json"))
            .and(query_param("observation_start", "2025-01-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "observations": [
                    {"date": "2025-02-01", "value": "319.1"},
                    {"date": "2025-01-01", "value": "317.6"},
                    {"date": "2025-03-01", "value": "."}
                ]
            })))
            .mount(&mock_server)
            .await;

        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let values = provider(&mock_server.uri(), Some("key")).cpi_since(start).await.unwrap();
        assert_eq!(values, vec![317.6, 319.1]);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let mock_server = MockServer::start().await;
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let err = provider(&mock_server.uri(), None).cpi_since(start).await.unwrap_err();
        assert!(err.to_string().contains("API key"));
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }
}
