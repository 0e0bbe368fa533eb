//! Core business logic abstractions

pub mod benchmark;
pub mod combinations;
pub mod config;
pub mod error;
pub mod filters;
pub mod fund;
pub mod indicators;
pub mod loader;
pub mod log;
pub mod normalize;
pub mod overrides;
pub mod ranking;
pub mod report;
pub mod table;

// Re-export main types for cleaner imports
pub use combinations::{COMBINATIONS, CombinationRunner, FilterCombination};
pub use error::PipelineError;
pub use fund::{FundRecord, FundTable, RankedFund};
pub use indicators::{InflationProvider, SeriesProvider};
pub use loader::{LoadOptions, RecordLoader};
pub use overrides::{OverrideProvider, SettlementLookup};
pub use table::FlatTable;
