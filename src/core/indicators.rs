//! Macroeconomic reference figures shown next to the fund rankings:
//! US CPI inflation, UVA index inflation and the "dólar bolsa" variation,
//! all measured year-to-date.

use super::benchmark::{DAYS_IN_YEAR, round_to};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use tracing::{debug, warn};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Exchange house of the "dólar bolsa" (MEP) quote.
pub const DOLLAR_BOLSA: &str = "bolsa";

/// A dated value of an economic series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[async_trait]
pub trait SeriesProvider: Send + Sync {
    async fn uva_series(&self) -> Result<Vec<SeriesPoint>>;
    async fn dollar_series(&self, house: &str) -> Result<Vec<SeriesPoint>>;
}

#[async_trait]
pub trait InflationProvider: Send + Sync {
    /// Consumer price index observations since `start`, oldest first.
    async fn cpi_since(&self, start: NaiveDate) -> Result<Vec<f64>>;
}

/// Either a computed value or the reason it is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reading<T> {
    Value(T),
    Failed { error: String },
}

impl<T> Reading<T> {
    pub fn failed(error: impl Into<String>) -> Self {
        Reading::Failed {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UvaInflation {
    #[serde(rename = "ytd_%")]
    pub ytd: f64,
    #[serde(rename = "anualizada_estimada_%")]
    pub annualized: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialIndicators {
    pub calculation_date: String,
    pub days_elapsed_current_year: i64,
    pub reference_date_yesterday: String,
    pub reference_date_start_year_api: String,
    #[serde(rename = "inflacion_usa_ytd_%")]
    pub us_inflation_ytd: Reading<f64>,
    #[serde(rename = "inflacion_uva")]
    pub uva_inflation: Reading<UvaInflation>,
    #[serde(rename = "variacion_dolar_bolsa_compra_ytd_%")]
    pub dollar_bolsa_ytd: Reading<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct ReferenceDates {
    pub today: NaiveDate,
    /// Last quote of the previous year, the base of every YTD figure.
    pub start: NaiveDate,
}

impl ReferenceDates {
    pub fn yesterday(&self) -> NaiveDate {
        self.today - Duration::days(1)
    }

    pub fn start_of_year(&self) -> NaiveDate {
        NaiveDate::from_yo_opt(self.today.year(), 1).unwrap_or(self.today)
    }

    /// Days since January 1st, counting both ends.
    pub fn days_elapsed(&self) -> i64 {
        (self.today - self.start_of_year()).num_days() + 1
    }
}

/// Percent change between the values at `start` and `end`, if both exist
/// and the start is non-zero.
pub fn variation_between(points: &[SeriesPoint], start: NaiveDate, end: NaiveDate) -> Option<f64> {
    let value_at = |date: NaiveDate| points.iter().find(|p| p.date == date).map(|p| p.value);
    match (value_at(start), value_at(end)) {
        (Some(s), Some(e)) if s != 0.0 => Some(((e / s) - 1.0) * 100.0),
        _ => None,
    }
}

pub fn uva_inflation(points: &[SeriesPoint], dates: &ReferenceDates) -> Reading<UvaInflation> {
    let Some(total) = variation_between(points, dates.start, dates.yesterday()) else {
        return Reading::failed("Missing required UVA data points or start value is zero.");
    };
    let days = dates.days_elapsed();
    let annualized = if days > 0 {
        total / days as f64 * DAYS_IN_YEAR
    } else {
        0.0
    };
    Reading::Value(UvaInflation {
        ytd: round_to(total, 2),
        annualized: round_to(annualized, 2),
    })
}

pub fn dollar_variation(points: &[SeriesPoint], dates: &ReferenceDates) -> Reading<f64> {
    match variation_between(points, dates.start, dates.yesterday()) {
        Some(total) => Reading::Value(round_to(total, 2)),
        None => Reading::failed("Missing required Dolar Bolsa data points or start value is zero."),
    }
}

/// Inflation between the first and last observation of the year.
pub fn cpi_inflation(observations: &[f64]) -> Reading<f64> {
    if observations.len() < 2 {
        return Reading::failed(format!(
            "Insufficient data points ({}) for YTD calculation",
            observations.len()
        ));
    }
    let first = observations[0];
    let last = observations[observations.len() - 1];
    if first == 0.0 {
        return Reading::failed("Starting CPI value is zero");
    }
    Reading::Value(round_to(((last / first) - 1.0) * 100.0, 3))
}

pub async fn collect_indicators(
    series: &dyn SeriesProvider,
    inflation: &dyn InflationProvider,
    dates: ReferenceDates,
) -> FinancialIndicators {
    let (cpi, uva, dollar) = futures::join!(
        inflation.cpi_since(dates.start_of_year()),
        series.uva_series(),
        series.dollar_series(DOLLAR_BOLSA),
    );

    let us_inflation_ytd = match cpi {
        Ok(observations) => cpi_inflation(&observations),
        Err(e) => {
            warn!(error = %e, "Failed to fetch US CPI");
            Reading::failed(format!("Error fetching US inflation: {e}"))
        }
    };
    let uva_inflation = match uva {
        Ok(points) => uva_inflation(&points, &dates),
        Err(e) => {
            warn!(error = %e, "Failed to fetch UVA series");
            Reading::failed("Failed to fetch UVA data from API.")
        }
    };
    let dollar_bolsa_ytd = match dollar {
        Ok(points) => dollar_variation(&points, &dates),
        Err(e) => {
            warn!(error = %e, "Failed to fetch dollar quotes");
            Reading::failed("Failed to fetch Dolar data from API.")
        }
    };
    debug!(?us_inflation_ytd, ?uva_inflation, ?dollar_bolsa_ytd, "Collected indicators");

    FinancialIndicators {
        calculation_date: dates.today.format(DATE_FORMAT).to_string(),
        days_elapsed_current_year: dates.days_elapsed(),
        reference_date_yesterday: dates.yesterday().format(DATE_FORMAT).to_string(),
        reference_date_start_year_api: dates.start.format(DATE_FORMAT).to_string(),
        us_inflation_ytd,
        uva_inflation,
        dollar_bolsa_ytd,
    }
}
