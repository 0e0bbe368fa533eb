pub mod benchmarks;
pub mod indicators;
pub mod normalize;
pub mod rank;
pub mod setup;
pub mod ui;
pub mod update;

use crate::core::config::AppConfig;
use crate::core::overrides::NamedFundsOverride;
use crate::core::{OverrideProvider, RecordLoader};
use crate::providers::CachingSettlementLookup;
use crate::providers::ppi::PpiSettlementLookup;
use reqwest::Client;
use std::sync::Arc;

/// Loader with the configured fund-name overrides followed by the memoized
/// PPI settlement lookup.
pub fn record_loader(config: &AppConfig, client: &Client) -> RecordLoader {
    let named: Arc<dyn OverrideProvider> =
        Arc::new(NamedFundsOverride::new(config.same_day_funds.iter().cloned()));
    let settlement: Arc<dyn OverrideProvider> = Arc::new(CachingSettlementLookup::new(
        PpiSettlementLookup::new(&config.providers.ppi.base_url, client.clone()),
    ));
    RecordLoader::new(vec![named, settlement])
}
