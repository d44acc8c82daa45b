pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{ClaimService, PaymentService};
pub use domain::balance::{BalanceAggregator, Balances};
pub use infra::config::Settings;
pub use storage::{MemoryStore, PgStore};
