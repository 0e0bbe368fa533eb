//! Top-N selection by daily or year-to-date variation.

use super::fund::{Column, FundRecord, FundTable, RankedFund};
use tracing::{debug, warn};

pub const TOP_N_COUNT: usize = 10;

const REQUIRED_COLUMNS: [Column; 6] = [
    Column::Name,
    Column::DailyVariation,
    Column::YtdVariation,
    Column::Currency,
    Column::Classification,
    Column::MinInvestment,
];

/// Returns at most `n` funds sorted by the chosen variation, highest first.
///
/// Rows whose ranking value is blank or non-numeric are left out. Ties keep
/// the table order. An empty result is returned when a display column is
/// missing.
pub fn top_performers(table: &FundTable, n: usize, use_ytd: bool) -> Vec<RankedFund> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !table.has(**c))
        .map(Column::header)
        .collect();
    if !missing.is_empty() {
        warn!("Missing columns for top performance analysis: {:?}", missing);
        return Vec::new();
    }

    let value_of = |r: &FundRecord| if use_ytd { r.ytd() } else { r.daily() };

    let mut ranked: Vec<(f64, &FundRecord)> = table
        .records
        .iter()
        .filter_map(|r| value_of(r).map(|v| (v, r)))
        .collect();
    debug!(
        "{} of {} funds have a numeric ranking value",
        ranked.len(),
        table.len()
    );

    ranked.sort_by(|(a, _), (b, _)| b.total_cmp(a));
    ranked
        .into_iter()
        .take(n)
        .map(|(_, r)| RankedFund::from(r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filters::by_liquidity_term;
    use std::collections::HashSet;

    fn record(name: &str, term: &str, daily: &str, ytd: &str) -> FundRecord {
        FundRecord {
            code: String::new(),
            name: name.to_string(),
            liquidity_term: term.to_string(),
            classification: 100,
            currency: "ARS".to_string(),
            min_investment: 0,
            daily_variation: daily.to_string(),
            ytd_variation: ytd.to_string(),
        }
    }

    fn names(funds: &[RankedFund]) -> Vec<&str> {
        funds.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_filter_then_top_one() {
        let table = FundTable::with_all_columns(vec![
            record("Fondo A", "0", "5.2", ""),
            record("Fondo B", "1", "9.1", ""),
            record("Fondo C", "0", "7.0", ""),
        ]);
        let same_day: HashSet<String> = ["0".to_string()].into();
        let top = top_performers(&by_liquidity_term(&table, &same_day), 1, false);

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "Fondo C");
        assert_eq!(top[0].daily_variation, Some(7.0));
    }

    #[test]
    fn test_non_numeric_values_are_excluded() {
        let table = FundTable::with_all_columns(vec![
            record("A", "0", "", "1.0"),
            record("B", "0", "n/a", "2.0"),
            record("C", "0", "-0.5", "bad"),
        ]);

        let daily = top_performers(&table, 10, false);
        assert_eq!(names(&daily), vec!["C"]);

        let ytd = top_performers(&table, 10, true);
        assert_eq!(names(&ytd), vec!["B", "A"]);
        assert!(ytd.iter().all(|f| f.ytd_variation.is_some()));
    }

    #[test]
    fn test_sorted_descending_stable_and_truncated() {
        let records: Vec<FundRecord> = (0..15)
            .map(|i| record(&format!("F{i}"), "0", &format!("{}", i % 5), ""))
            .collect();
        let top = top_performers(&FundTable::with_all_columns(records), TOP_N_COUNT, false);

        assert_eq!(top.len(), TOP_N_COUNT);
        let values: Vec<f64> = top.iter().map(|f| f.daily_variation.unwrap()).collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
        // Ties keep table order
        assert_eq!(&names(&top)[..3], &["F4", "F9", "F14"]);
    }

    #[test]
    fn test_missing_display_column_yields_empty() {
        let mut table = FundTable::with_all_columns(vec![record("A", "0", "1.0", "1.0")]);
        table.columns.remove(&Column::YtdVariation);
        assert!(top_performers(&table, 10, false).is_empty());
    }
}
