use crate::core::overrides::{MatchOn, OverrideProvider, OverrideSet};
use crate::core::SettlementLookup;
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Memoizes a [`SettlementLookup`] for the lifetime of the wrapper.
///
/// The inner lookup runs at most once. A failed lookup is remembered as an
/// empty set so later loads in the same run do not retry it.
pub struct CachingSettlementLookup<L: SettlementLookup> {
    inner: L,
    codes: OnceCell<HashSet<String>>,
}

impl<L: SettlementLookup> CachingSettlementLookup<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            codes: OnceCell::new(),
        }
    }

    pub async fn codes(&self) -> &HashSet<String> {
        self.codes
            .get_or_init(|| async {
                debug!("Cache miss for same-day settlement codes");
                match self.inner.same_day_codes().await {
                    Ok(codes) => codes.into_iter().collect(),
                    Err(e) => {
                        warn!(error = %e, "Same-day settlement lookup failed, no funds overridden");
                        HashSet::new()
                    }
                }
            })
            .await
    }
}

#[async_trait]
impl<L: SettlementLookup> OverrideProvider for CachingSettlementLookup<L> {
    fn name(&self) -> &str {
        "settlement-lookup"
    }

    async fn overrides(&self) -> OverrideSet {
        OverrideSet {
            match_on: MatchOn::FundCode,
            identifiers: self.codes().await.clone(),
        }
    }
}
