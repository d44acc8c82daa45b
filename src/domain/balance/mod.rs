pub mod aggregator;
pub mod asset;
pub mod source;
pub mod units;

pub use aggregator::{zero_balances, BalanceAggregator, Balances, DEFAULT_SOURCE_TIMEOUT};
pub use asset::{AddressFormat, Asset};
pub use source::{BalanceSource, FetchError};
