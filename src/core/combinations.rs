//! The fixed set of filter combinations published in the report, and the
//! runner that produces one ranking per combination.

use super::filters::{
    by_currency, by_liquidity_term, by_min_investment, by_money_market, usd_currencies,
};
use super::fund::{RankedFund, SAME_DAY_TERM};
use super::loader::{LoadOptions, RecordLoader};
use super::ranking::top_performers;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, info};

pub const BASE_ID: &str = "base";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCombination {
    pub class_a_only: bool,
    pub use_ytd: bool,
    pub money_market_only: bool,
    pub usd_only: bool,
}

const fn combo(
    class_a_only: bool,
    use_ytd: bool,
    money_market_only: bool,
    usd_only: bool,
) -> FilterCombination {
    FilterCombination {
        class_a_only,
        use_ytd,
        money_market_only,
        usd_only,
    }
}

/// Every combination of the four flags, in report order.
pub static COMBINATIONS: [FilterCombination; 16] = [
    combo(false, false, false, false),
    combo(false, false, false, true),
    combo(false, false, true, false),
    combo(false, false, true, true),
    combo(false, true, false, false),
    combo(false, true, false, true),
    combo(false, true, true, false),
    combo(false, true, true, true),
    combo(true, false, false, false),
    combo(true, false, false, true),
    combo(true, false, true, false),
    combo(true, false, true, true),
    combo(true, true, false, false),
    combo(true, true, false, true),
    combo(true, true, true, false),
    combo(true, true, true, true),
];

impl FilterCombination {
    /// Active flag tags joined in the order sa, ytd, mm, usd; `base` when none is set.
    pub fn id(&self) -> String {
        let tags: Vec<&str> = [
            (self.class_a_only, "sa"),
            (self.use_ytd, "ytd"),
            (self.money_market_only, "mm"),
            (self.usd_only, "usd"),
        ]
        .into_iter()
        .filter_map(|(active, tag)| active.then_some(tag))
        .collect();

        if tags.is_empty() {
            BASE_ID.to_string()
        } else {
            tags.join("_")
        }
    }

    pub fn find(id: &str) -> Option<&'static FilterCombination> {
        COMBINATIONS.iter().find(|c| c.id() == id)
    }
}

pub struct CombinationRunner<'a> {
    loader: &'a RecordLoader,
    table_path: PathBuf,
    top_n: usize,
    max_investment: Option<u64>,
}

impl<'a> CombinationRunner<'a> {
    pub fn new(loader: &'a RecordLoader, table_path: impl Into<PathBuf>, top_n: usize) -> Self {
        Self {
            loader,
            table_path: table_path.into(),
            top_n,
            max_investment: None,
        }
    }

    /// Only ranks funds whose minimum investment is below `max_investment`.
    pub fn with_max_investment(mut self, max_investment: Option<u64>) -> Self {
        self.max_investment = max_investment;
        self
    }

    /// Loads a fresh copy of the table and ranks it for one combination.
    ///
    /// Money-market and USD filters compose independently, so the mm+usd
    /// combinations rank money-market funds quoted in dollars.
    pub async fn run(&self, combination: &FilterCombination) -> Vec<RankedFund> {
        let options = LoadOptions {
            class_a_only: combination.class_a_only,
            use_overrides: true,
        };
        let table = self.loader.load_path(&self.table_path, options).await;
        if table.is_empty() {
            debug!("No funds loaded for {}", combination.id());
            return Vec::new();
        }

        let same_day: HashSet<String> = [SAME_DAY_TERM.to_string()].into();
        let mut table = by_liquidity_term(&table, &same_day);
        if combination.money_market_only {
            table = by_money_market(&table, true);
        }
        if combination.usd_only {
            table = by_currency(&table, &usd_currencies());
        }
        if let Some(max_investment) = self.max_investment {
            table = by_min_investment(&table, max_investment);
        }
        top_performers(&table, self.top_n, combination.use_ytd)
    }

    /// Ranks every combination. `on_progress` is called after each one.
    pub async fn run_all(
        &self,
        on_progress: &dyn Fn(&FilterCombination),
    ) -> BTreeMap<String, Vec<RankedFund>> {
        let mut results = BTreeMap::new();
        for combination in &COMBINATIONS {
            let ranked = self.run(combination).await;
            debug!("Combination {} ranked {} funds", combination.id(), ranked.len());
            results.insert(combination.id(), ranked);
            on_progress(combination);
        }
        info!("Ranked {} filter combinations", results.len());
        results
    }
}
