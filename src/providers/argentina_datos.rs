use crate::core::indicators::{DATE_FORMAT, SeriesPoint, SeriesProvider};
use crate::providers::util::ensure_success;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

const UVA_PATH: &str = "/v1/finanzas/indices/uva";
const DOLLARS_PATH: &str = "/v1/cotizaciones/dolares";

#[derive(Debug, Deserialize)]
struct IndexEntry {
    fecha: Option<String>,
    valor: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DollarQuote {
    casa: Option<String>,
    fecha: Option<String>,
    compra: Option<f64>,
}

fn point(fecha: Option<&str>, value: Option<f64>) -> Option<SeriesPoint> {
    let date = NaiveDate::parse_from_str(fecha?, DATE_FORMAT).ok()?;
    Some(SeriesPoint { date, value: value? })
}

/// UVA index and dollar quotes from argentinadatos.com.
pub struct ArgentinaDatosProvider {
    base_url: String,
    client: Client,
}

impl ArgentinaDatosProvider {
    pub fn new(base_url: &str, client: Client) -> Self {
        ArgentinaDatosProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Requesting series from {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;
        ensure_success(response)?
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {url}"))
    }
}

#[async_trait]
impl SeriesProvider for ArgentinaDatosProvider {
    #[instrument(skip(self))]
    async fn uva_series(&self) -> Result<Vec<SeriesPoint>> {
        let entries: Vec<IndexEntry> = self.fetch(UVA_PATH).await?;
        Ok(entries
            .iter()
            .filter_map(|e| point(e.fecha.as_deref(), e.valor))
            .collect())
    }

    #[instrument(skip(self))]
    async fn dollar_series(&self, house: &str) -> Result<Vec<SeriesPoint>> {
        let quotes: Vec<DollarQuote> = self.fetch(DOLLARS_PATH).await?;
        Ok(quotes
            .iter()
            .filter(|q| q.casa.as_deref() == Some(house))
            .filter_map(|q| point(q.fecha.as_deref(), q.compra))
            .collect())
    }
}
