//! Loads the persisted flat table into typed fund records.

use super::fund::{
    Column, DEFAULT_CLASSIFICATION_CODE, FundRecord, FundTable, UNSPECIFIED_TERM,
};
use super::overrides::{OverrideProvider, apply_override};
use super::table::FlatTable;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, warn};

const CLASS_MARKER: &str = "Clase";
const CLASS_A_MARKER: &str = "Clase A";

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub class_a_only: bool,
    /// Enables the optional override providers (the built-in fund list).
    pub use_overrides: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            class_a_only: false,
            use_overrides: true,
        }
    }
}

pub struct RecordLoader {
    providers: Vec<Arc<dyn OverrideProvider>>,
}

impl RecordLoader {
    /// Providers are applied in the given order.
    pub fn new(providers: Vec<Arc<dyn OverrideProvider>>) -> Self {
        Self { providers }
    }

    /// Reads the TSV at `path` and loads it. A missing or unreadable file
    /// yields an empty table.
    pub async fn load_path<P: AsRef<Path>>(&self, path: P, options: LoadOptions) -> FundTable {
        match FlatTable::read_tsv(path.as_ref()) {
            Ok(table) => self.load(&table, options).await,
            Err(e) => {
                error!(error = %e, "Failed to load prepared fund table");
                FundTable::default()
            }
        }
    }

    pub async fn load(&self, table: &FlatTable, options: LoadOptions) -> FundTable {
        let mut table = table.clone();
        table.trim_headers();

        let mut fund_table = coerce_records(&table);

        for provider in &self.providers {
            if provider.is_optional() && !options.use_overrides {
                debug!("Skipping optional override provider {}", provider.name());
                continue;
            }
            let set = provider.overrides().await;
            let changed = apply_override(&mut fund_table.records, &set);
            debug!("Override provider {} changed {} funds", provider.name(), changed);
        }

        if options.class_a_only {
            fund_table = filter_class_a(&fund_table);
        }
        fund_table
    }
}

/// Keeps "Clase A" share classes and funds without a class suffix.
pub fn filter_class_a(table: &FundTable) -> FundTable {
    if !table.has(Column::Name) {
        warn!("Column '{}' not found for class filtering", Column::Name.header());
        return table.clone();
    }
    table.retain_copy(|r| is_class_a_or_unclassed(&r.name))
}

pub fn is_class_a_or_unclassed(name: &str) -> bool {
    let has_class = name.contains(CLASS_MARKER);
    (has_class && name.contains(CLASS_A_MARKER)) || !has_class
}

/// Digits before the first decimal or thousands separator; 0 when unparseable.
pub fn parse_min_investment(raw: &str) -> u64 {
    let integral = raw.split(['.', ',']).next().unwrap_or_default();
    integral.trim().parse().unwrap_or(0)
}

/// Classification code with quotes, commas and spaces removed.
pub fn parse_classification(raw: &str) -> i64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '"' | ',' | ' '))
        .collect();
    cleaned
        .parse::<i64>()
        .ok()
        .or_else(|| {
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.trunc() as i64)
        })
        .unwrap_or(DEFAULT_CLASSIFICATION_CODE)
}

/// Liquidity term as text. Numeric cells drop a zero fraction (`0.0` reads
/// `0`) and blank cells become [`UNSPECIFIED_TERM`].
pub fn normalize_liquidity_term(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return UNSPECIFIED_TERM.to_string();
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => format!("{}", v as i64),
        _ => raw.to_string(),
    }
}

fn coerce_records(table: &FlatTable) -> FundTable {
    let mut columns = HashSet::new();
    let mut indices = Vec::with_capacity(Column::ALL.len());
    for column in Column::ALL {
        let idx = table.column(column.header());
        if idx.is_some() {
            columns.insert(column);
        } else {
            warn!("Column '{}' not found in fund table", column.header());
        }
        indices.push(idx);
    }
    let index_of = |column: Column| indices[column as usize];
    let cell = |row: usize, column: Column| index_of(column).map_or("", |col| table.cell(row, col));

    let records = (0..table.len())
        .map(|row| FundRecord {
            code: cell(row, Column::Code).trim().to_string(),
            name: cell(row, Column::Name).to_string(),
            liquidity_term: normalize_liquidity_term(cell(row, Column::LiquidityTerm)),
            classification: parse_classification(cell(row, Column::Classification)),
            currency: cell(row, Column::Currency).trim().to_string(),
            min_investment: parse_min_investment(cell(row, Column::MinInvestment)),
            daily_variation: cell(row, Column::DailyVariation).to_string(),
            ytd_variation: cell(row, Column::YtdVariation).to_string(),
        })
        .collect();

    FundTable::new(records, columns)
}
