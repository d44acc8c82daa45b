pub mod router;
pub mod types;
pub mod handlers {
    pub mod balances;
    pub mod claims;
    pub mod common;
    pub mod health;
    pub mod payments;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
