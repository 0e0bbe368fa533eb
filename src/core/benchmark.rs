//! Comparison metrics for remunerated bank accounts with a balance ceiling.

use rust_decimal::{Decimal, prelude::*};
use serde::{Deserialize, Serialize};

pub const DAYS_IN_YEAR: f64 = 365.0;
pub const DAYS_IN_MONTH: f64 = 30.0;

/// An account offer: nominal annual rate (TNA) paid up to `ceiling`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BenchmarkOffer {
    pub rate: f64,
    pub ceiling: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BenchmarkMetrics {
    Computed {
        nombre: String,
        monto_inicial_recomendado: f64,
        #[serde(rename = "rendimiento_mejor_%")]
        best_daily_yield: f64,
        #[serde(rename = "rendimiento_topeado_%")]
        capped_daily_yield: f64,
    },
    Invalid {
        nombre: String,
        error: String,
    },
}

/// Rounds half-to-even at `dp` decimal places.
pub fn round_to(value: f64, dp: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(dp))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

impl BenchmarkOffer {
    /// Starting balance that grows to the ceiling after a month of daily
    /// compounding, and the resulting daily yields in percent.
    pub fn metrics(&self) -> BenchmarkMetrics {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(self.rate) || !valid(self.ceiling) {
            return BenchmarkMetrics::Invalid {
                nombre: self.label.clone(),
                error: "Invalid input: TNA and limite must be non-negative numbers.".to_string(),
            };
        }

        let daily_rate = self.rate / DAYS_IN_YEAR;
        let initial = self.ceiling / (1.0 + daily_rate).powf(DAYS_IN_MONTH);
        let best_daily = if initial == 0.0 {
            0.0
        } else {
            ((self.ceiling / initial) - 1.0) / DAYS_IN_MONTH
        };

        BenchmarkMetrics::Computed {
            nombre: self.label.clone(),
            monto_inicial_recomendado: round_to(initial, 0),
            best_daily_yield: round_to(best_daily * 100.0, 3),
            capped_daily_yield: round_to(daily_rate * 100.0, 3),
        }
    }
}

pub fn default_offers() -> Vec<BenchmarkOffer> {
    [
        (0.228, 500_000.0, "Cuenta Remunerada Banco Bica 30% TNA"),
        (0.3564, 600_000.0, "Cuenta Remunerada NaranjaX 31% TNA"),
        (0.4082, 1_000_000.0, "Cuenta Remunerada Uala 35% TNA"),
        (0.020184, 1_000_000.0, "Cuenta Remunerada IOL 2% TNA"),
        (0.3470, 1_000_000.0, "Cuenta Remunerada Uala Base 30% TNA"),
    ]
    .into_iter()
    .map(|(rate, ceiling, label)| BenchmarkOffer {
        rate,
        ceiling,
        label: label.to_string(),
    })
    .collect()
}

pub fn compute_all(offers: &[BenchmarkOffer]) -> Vec<BenchmarkMetrics> {
    offers.iter().map(BenchmarkOffer::metrics).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(rate: f64, ceiling: f64) -> BenchmarkOffer {
        BenchmarkOffer {
            rate,
            ceiling,
            label: "Test".to_string(),
        }
    }

    #[test]
    fn test_metrics_for_known_offers() {
        assert_eq!(
            offer(0.228, 500_000.0).metrics(),
            BenchmarkMetrics::Computed {
                nombre: "Test".to_string(),
                monto_inicial_recomendado: 490_720.0,
                best_daily_yield: 0.063,
                capped_daily_yield: 0.062,
            }
        );
        assert_eq!(
            offer(0.4082, 1_000_000.0).metrics(),
            BenchmarkMetrics::Computed {
                nombre: "Test".to_string(),
                monto_inicial_recomendado: 967_024.0,
                best_daily_yield: 0.114,
                capped_daily_yield: 0.112,
            }
        );
    }

    #[test]
    fn test_zero_ceiling_has_no_yield_gain() {
        match offer(0.3, 0.0).metrics() {
            BenchmarkMetrics::Computed {
                monto_inicial_recomendado,
                best_daily_yield,
                ..
            } => {
                assert_eq!(monto_inicial_recomendado, 0.0);
                assert_eq!(best_daily_yield, 0.0);
            }
            other => panic!("Expected computed metrics, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_inputs_are_rejected() {
        let metrics = offer(-0.1, 1000.0).metrics();
        assert!(matches!(metrics, BenchmarkMetrics::Invalid { .. }));

        let json = serde_json::to_value(offer(0.1, f64::NAN).metrics()).unwrap();
        assert_eq!(json["nombre"], "Test");
        assert!(json["error"].as_str().unwrap().starts_with("Invalid input"));
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(compute_all(&default_offers())).unwrap();
        let first = &json[0];
        assert_eq!(first["nombre"], "Cuenta Remunerada Banco Bica 30% TNA");
        assert_eq!(first["monto_inicial_recomendado"], 490_720.0);
        assert_eq!(first["rendimiento_mejor_%"], 0.063);
        assert_eq!(first["rendimiento_topeado_%"], 0.062);
        assert_eq!(json.as_array().unwrap().len(), 5);
    }
}
