pub mod argentina_datos;
pub mod cafci;
pub mod caching;
pub mod fred;
pub mod ppi;
pub mod util;

pub use caching::CachingSettlementLookup;
