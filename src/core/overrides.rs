//! Liquidity-term overrides.
//!
//! Some funds settle same-day even though the CAFCI export says otherwise.
//! Each [`OverrideProvider`] yields a set of identifiers whose liquidity term
//! is forced to [`SAME_DAY_TERM`]. Providers run in the order the loader was
//! given them, before any filtering.

use super::fund::{FundRecord, SAME_DAY_TERM};
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::debug;

/// Which record field an override set is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOn {
    FundName,
    FundCode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverrideSet {
    pub match_on: MatchOn,
    pub identifiers: HashSet<String>,
}

impl OverrideSet {
    fn matches(&self, record: &FundRecord) -> bool {
        let key = match self.match_on {
            MatchOn::FundName => &record.name,
            MatchOn::FundCode => &record.code,
        };
        self.identifiers.contains(key)
    }
}

#[async_trait]
pub trait OverrideProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Optional providers only run when the caller enables overrides.
    fn is_optional(&self) -> bool {
        false
    }

    async fn overrides(&self) -> OverrideSet;
}

/// Source of fund codes a remote service reports as settling same-day.
#[async_trait]
pub trait SettlementLookup: Send + Sync {
    async fn same_day_codes(&self) -> anyhow::Result<Vec<String>>;
}

/// Fixed list of fund names known to settle same-day.
pub struct NamedFundsOverride {
    names: HashSet<String>,
}

impl NamedFundsOverride {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl OverrideProvider for NamedFundsOverride {
    fn name(&self) -> &str {
        "named-funds"
    }

    fn is_optional(&self) -> bool {
        true
    }

    async fn overrides(&self) -> OverrideSet {
        OverrideSet {
            match_on: MatchOn::FundName,
            identifiers: self.names.clone(),
        }
    }
}

/// Forces the liquidity term of matching records to same-day and returns how
/// many records changed. Already overridden records are left untouched.
pub fn apply_override(records: &mut [FundRecord], set: &OverrideSet) -> usize {
    let mut changed = 0;
    for record in records.iter_mut().filter(|r| set.matches(r)) {
        if record.liquidity_term != SAME_DAY_TERM {
            record.liquidity_term = SAME_DAY_TERM.to_string();
            changed += 1;
        }
    }
    debug!(match_on = ?set.match_on, changed, "Applied liquidity term override");
    changed
}
