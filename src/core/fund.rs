//! Fund records and the column names of the normalized CAFCI table.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const COL_NAME: &str = "Fondo_Fondo";
pub const COL_CODE: &str = "Código CAFCI_Código CAFCI";
pub const COL_LIQUIDITY_TERM: &str = "Plazo Liq._Plazo Liq.";
pub const COL_CLASSIFICATION: &str = "Código de Clasificación_Código de Clasificación";
pub const COL_CURRENCY: &str = "Moneda Fondo_Moneda Fondo";
pub const COL_MIN_INVESTMENT: &str = "Mínimo de Inversión_Mínimo de Inversión";
pub const COL_DAILY_VARIATION: &str = "Variac. %";
/// Year-to-date variation, measured from the close of the previous year.
pub const COL_YTD_VARIATION: &str = "30/12/24";

pub const SAME_DAY_TERM: &str = "0";
pub const NEXT_DAY_TERM: &str = "1";
/// Liquidity term assigned to rows whose cell is blank.
pub const UNSPECIFIED_TERM: &str = "nan";

pub const MONEY_MARKET_CODE: i64 = 3;
pub const DEFAULT_CLASSIFICATION_CODE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Code,
    LiquidityTerm,
    Classification,
    Currency,
    MinInvestment,
    DailyVariation,
    YtdVariation,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Name,
        Column::Code,
        Column::LiquidityTerm,
        Column::Classification,
        Column::Currency,
        Column::MinInvestment,
        Column::DailyVariation,
        Column::YtdVariation,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Name => COL_NAME,
            Column::Code => COL_CODE,
            Column::LiquidityTerm => COL_LIQUIDITY_TERM,
            Column::Classification => COL_CLASSIFICATION,
            Column::Currency => COL_CURRENCY,
            Column::MinInvestment => COL_MIN_INVESTMENT,
            Column::DailyVariation => COL_DAILY_VARIATION,
            Column::YtdVariation => COL_YTD_VARIATION,
        }
    }
}

/// One row of the working table.
///
/// The variations stay as the raw cell text: they are only coerced when a
/// ranking needs them, and a blank or non-numeric value must drop the row
/// from that ranking instead of counting as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FundRecord {
    pub code: String,
    pub name: String,
    pub liquidity_term: String,
    pub classification: i64,
    pub currency: String,
    pub min_investment: u64,
    pub daily_variation: String,
    pub ytd_variation: String,
}

impl FundRecord {
    pub fn daily(&self) -> Option<f64> {
        parse_numeric(&self.daily_variation)
    }

    pub fn ytd(&self) -> Option<f64> {
        parse_numeric(&self.ytd_variation)
    }

    pub fn is_money_market(&self) -> bool {
        self.classification == MONEY_MARKET_CODE
    }
}

/// Parses a numeric cell, rejecting blanks and non-finite values.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Loaded records plus the set of columns the source table actually had.
#[derive(Debug, Clone, Default)]
pub struct FundTable {
    pub records: Vec<FundRecord>,
    pub columns: HashSet<Column>,
}

impl FundTable {
    pub fn new(records: Vec<FundRecord>, columns: HashSet<Column>) -> Self {
        Self { records, columns }
    }

    /// A table with every known column present.
    pub fn with_all_columns(records: Vec<FundRecord>) -> Self {
        Self::new(records, Column::ALL.into_iter().collect())
    }

    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Copy of this table holding only the records matching `predicate`.
    pub fn retain_copy(&self, predicate: impl Fn(&FundRecord) -> bool) -> Self {
        Self {
            records: self.records.iter().filter(|r| predicate(r)).cloned().collect(),
            columns: self.columns.clone(),
        }
    }
}

/// Display projection of a ranked fund. Field names match the table headers
/// so the embedded JSON keeps the keys the report page reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFund {
    #[serde(rename = "Fondo_Fondo")]
    pub name: String,
    #[serde(rename = "Variac. %")]
    pub daily_variation: Option<f64>,
    #[serde(rename = "30/12/24")]
    pub ytd_variation: Option<f64>,
    #[serde(rename = "Moneda Fondo_Moneda Fondo")]
    pub currency: String,
    #[serde(rename = "Código de Clasificación_Código de Clasificación")]
    pub classification: i64,
    #[serde(rename = "Mínimo de Inversión_Mínimo de Inversión")]
    pub min_investment: u64,
}

impl From<&FundRecord> for RankedFund {
    fn from(record: &FundRecord) -> Self {
        RankedFund {
            name: record.name.clone(),
            daily_variation: record.daily(),
            ytd_variation: record.ytd(),
            currency: record.currency.clone(),
            classification: record.classification,
            min_investment: record.min_investment,
        }
    }
}
