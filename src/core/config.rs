use super::benchmark::{BenchmarkOffer, default_offers};
use super::ranking::TOP_N_COUNT;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

pub const FRED_API_KEY_ENV: &str = "FRED_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Downloaded CAFCI spreadsheet.
    pub workbook: PathBuf,
    /// Normalized tab-separated table.
    pub table: PathBuf,
    /// Report page that receives the data blocks.
    pub report: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            workbook: PathBuf::from("fci.xlsx"),
            table: PathBuf::from("fci.tsv"),
            report: PathBuf::from("index.html"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EndpointConfig {
    pub base_url: String,
}

impl EndpointConfig {
    fn new(base_url: &str) -> Self {
        EndpointConfig {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct FredConfig {
    pub base_url: String,
    pub series_id: String,
    pub api_key: Option<String>,
}

impl Default for FredConfig {
    fn default() -> Self {
        FredConfig {
            base_url: "https://api.stlouisfed.org".to_string(),
            series_id: "CPIAUCSL".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProvidersConfig {
    pub cafci: EndpointConfig,
    pub ppi: EndpointConfig,
    pub argentina_datos: EndpointConfig,
    pub fred: FredConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            cafci: EndpointConfig::new("https://api.cafci.org.ar"),
            ppi: EndpointConfig::new("https://api.portfoliopersonal.com"),
            argentina_datos: EndpointConfig::new("https://api.argentinadatos.com"),
            fred: FredConfig::default(),
        }
    }
}

fn default_same_day_funds() -> Vec<String> {
    vec![
        "Cocos Daruma Renta Mixta - Clase A".to_string(),
        "Cocos Ahorro Dólares - Clase A".to_string(),
    ]
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub providers: ProvidersConfig,
    /// Funds known to settle same day regardless of the published term.
    pub same_day_funds: Vec<String>,
    pub benchmarks: Vec<BenchmarkOffer>,
    /// Last quote date of the previous year, base of the YTD indicators.
    pub ytd_start_date: NaiveDate,
    pub top_n: usize,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            paths: PathsConfig::default(),
            providers: ProvidersConfig::default(),
            same_day_funds: default_same_day_funds(),
            benchmarks: default_offers(),
            ytd_start_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
            top_n: TOP_N_COUNT,
            request_timeout_secs: 10,
        }
    }
}

impl AppConfig {
    /// Loads the default config file, or the built-in defaults when it does not exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default().with_env_overrides());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("ar", "fcirank", "fcirank")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config.with_env_overrides())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn with_env_overrides(mut self) -> Self {
        let configured = self
            .providers
            .fred
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        if !configured {
            self.providers.fred.api_key = std::env::var(FRED_API_KEY_ENV)
                .ok()
                .filter(|k| !k.trim().is_empty());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
paths:
  table: "data/fci.tsv"
providers:
  ppi:
    base_url: "http://localhost:9000"
  fred:
    api_key: "secret"
same_day_funds:
  - "Fondo Uno - Clase A"
benchmarks:
  - rate: 0.3
    ceiling: 1000000
    label: "Cuenta 30%"
top_n: 5
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.paths.table, PathBuf::from("data/fci.tsv"));
        assert_eq!(config.paths.workbook, PathBuf::from("fci.xlsx"));
        assert_eq!(config.providers.ppi.base_url, "http://localhost:9000");
        assert_eq!(config.providers.cafci.base_url, "https://api.cafci.org.ar");
        assert_eq!(config.providers.fred.series_id, "CPIAUCSL");
        assert_eq!(config.providers.fred.api_key.as_deref(), Some("secret"));
        assert_eq!(config.same_day_funds, vec!["Fondo Uno - Clase A"]);
        assert_eq!(config.benchmarks.len(), 1);
        assert_eq!(config.benchmarks[0].ceiling, 1_000_000.0);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.same_day_funds.len(), 2);
        assert_eq!(config.benchmarks.len(), 5);
        assert_eq!(config.top_n, TOP_N_COUNT);
        assert_eq!(config.ytd_start_date.to_string(), "2024-12-31");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_from_path(dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
