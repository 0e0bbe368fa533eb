use crate::core::SettlementLookup;
use crate::providers::util::ensure_success;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

const QUOTES_PATH: &str = "/api/Cotizaciones/FCI/Obtener";
/// Fund type and categories of the public PPI fund screener that list
/// same-day money-market and T+0 funds.
const FUND_TYPE: u32 = 160;
const CATEGORIES: [u32; 2] = [17, 4];
const STATUS_OK: i64 = 0;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuotesRequest {
    tipo: u32,
    categoria: Vec<u32>,
    familia: Vec<u32>,
    riesgo: Vec<u32>,
    plazo_rescate: Vec<u32>,
    permanencia_sugerida: Vec<u32>,
    moneda: Vec<u32>,
    patrimonio: Vec<u32>,
    benchmark: Vec<u32>,
}

impl Default for QuotesRequest {
    fn default() -> Self {
        QuotesRequest {
            tipo: FUND_TYPE,
            categoria: CATEGORIES.to_vec(),
            familia: vec![],
            riesgo: vec![],
            plazo_rescate: vec![],
            permanencia_sugerida: vec![],
            moneda: vec![],
            patrimonio: vec![],
            benchmark: vec![],
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuotesResponse {
    status: i64,
    #[serde(default)]
    payload: Vec<Value>,
}

/// ISIN of one payload entry. Entries without an `item` object or a string
/// `isin` are skipped.
fn entry_isin(entry: &Value) -> Option<&str> {
    entry.get("item")?.get("isin")?.as_str()
}

/// Same-day settlement lookup against the Portfolio Personal fund screener.
pub struct PpiSettlementLookup {
    base_url: String,
    client: Client,
}

impl PpiSettlementLookup {
    pub fn new(base_url: &str, client: Client) -> Self {
        PpiSettlementLookup {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9,es-AR;q=0.8,es;q=0.7"),
        );
        headers.insert("authorizedclient", HeaderValue::from_static("321321321"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert("clientkey", HeaderValue::from_static("pp123456"));
        headers
    }
}

#[async_trait]
impl SettlementLookup for PpiSettlementLookup {
    #[instrument(skip(self))]
    async fn same_day_codes(&self) -> Result<Vec<String>> {
        let url = format!("{}{}", self.base_url, QUOTES_PATH);
        debug!("Requesting same-day funds from {}", url);

        let response = self
            .client
            .post(&url)
            .headers(Self::headers())
            .json(&QuotesRequest::default())
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;
        let body: QuotesResponse = ensure_success(response)?
            .json()
            .await
            .context("Failed to parse PPI fund quotes")?;

        if body.status != STATUS_OK {
            return Err(anyhow!("PPI returned status {}", body.status));
        }

        let codes: Vec<String> = body
            .payload
            .iter()
            .filter_map(entry_isin)
            .map(|isin| isin.trim().to_string())
            .filter(|isin| !isin.is_empty())
            .collect();
        debug!("PPI reported {} same-day funds", codes.len());
        Ok(codes)
    }
}
