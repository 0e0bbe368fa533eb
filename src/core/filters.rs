//! Independent predicate filters over a fund table. Each returns a filtered
//! copy and passes the table through unchanged when its column is absent.

use super::fund::{Column, FundTable, NEXT_DAY_TERM, SAME_DAY_TERM};
use std::collections::HashSet;
use tracing::warn;

pub const MAX_MIN_INVESTMENT: u64 = 100_001;

pub fn default_liquidity_terms() -> HashSet<String> {
    [SAME_DAY_TERM, NEXT_DAY_TERM].into_iter().map(String::from).collect()
}

pub fn usd_currencies() -> HashSet<String> {
    ["USD", "USB"].into_iter().map(String::from).collect()
}

fn column_missing(table: &FundTable, column: Column) -> bool {
    if table.has(column) {
        return false;
    }
    warn!("Column '{}' not found for filtering", column.header());
    true
}

pub fn by_liquidity_term(table: &FundTable, allowed: &HashSet<String>) -> FundTable {
    if column_missing(table, Column::LiquidityTerm) {
        return table.clone();
    }
    table.retain_copy(|r| allowed.contains(&r.liquidity_term))
}

pub fn by_currency(table: &FundTable, currencies: &HashSet<String>) -> FundTable {
    if column_missing(table, Column::Currency) {
        return table.clone();
    }
    table.retain_copy(|r| currencies.contains(&r.currency))
}

pub fn by_money_market(table: &FundTable, include: bool) -> FundTable {
    if column_missing(table, Column::Classification) {
        return table.clone();
    }
    table.retain_copy(|r| r.is_money_market() == include)
}

/// Keeps funds whose minimum investment is strictly below `max_amount`.
pub fn by_min_investment(table: &FundTable, max_amount: u64) -> FundTable {
    if column_missing(table, Column::MinInvestment) {
        return table.clone();
    }
    table.retain_copy(|r| r.min_investment < max_amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fund::FundRecord;

    fn record(name: &str, term: &str, currency: &str, class: i64, min: u64) -> FundRecord {
        FundRecord {
            code: String::new(),
            name: name.to_string(),
            liquidity_term: term.to_string(),
            classification: class,
            currency: currency.to_string(),
            min_investment: min,
            daily_variation: "0.1".to_string(),
            ytd_variation: String::new(),
        }
    }

    fn sample() -> FundTable {
        FundTable::with_all_columns(vec![
            record("A", "0", "ARS", 3, 1000),
            record("B", "1", "USD", 100, 100_000),
            record("C", "2", "USB", 3, 100_001),
            record("D", "0", "USD", 5, 0),
            record("E", "nan", "", 100, 500_000),
        ])
    }

    fn names(table: &FundTable) -> Vec<&str> {
        table.records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_liquidity_term_filter() {
        let table = sample();
        assert_eq!(
            names(&by_liquidity_term(&table, &default_liquidity_terms())),
            vec!["A", "B", "D"]
        );

        let same_day: HashSet<String> = [SAME_DAY_TERM.to_string()].into();
        assert_eq!(names(&by_liquidity_term(&table, &same_day)), vec!["A", "D"]);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_same_day_is_subset_of_default_terms() {
        let table = sample();
        let same_day: HashSet<String> = [SAME_DAY_TERM.to_string()].into();
        let narrow = by_liquidity_term(&table, &same_day);
        let wide = by_liquidity_term(&table, &default_liquidity_terms());
        assert!(narrow.records.iter().all(|r| wide.records.contains(r)));
    }

    #[test]
    fn test_currency_filter() {
        assert_eq!(names(&by_currency(&sample(), &usd_currencies())), vec!["B", "C", "D"]);
    }

    #[test]
    fn test_money_market_filter() {
        assert_eq!(names(&by_money_market(&sample(), true)), vec!["A", "C"]);
        assert_eq!(names(&by_money_market(&sample(), false)), vec!["B", "D", "E"]);
    }

    #[test]
    fn test_min_investment_filter() {
        assert_eq!(
            names(&by_min_investment(&sample(), MAX_MIN_INVESTMENT)),
            vec!["A", "B", "D"]
        );
    }

    #[test]
    fn test_missing_column_passes_through() {
        let mut table = sample();
        table.columns.remove(&Column::Currency);
        table.columns.remove(&Column::LiquidityTerm);

        assert_eq!(by_currency(&table, &usd_currencies()).len(), 5);
        assert_eq!(by_liquidity_term(&table, &HashSet::new()).len(), 5);
        assert_eq!(by_money_market(&table, true).len(), 2);
    }
}
