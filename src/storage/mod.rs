pub mod claims;
pub mod memory;
pub mod payments;
pub mod postgres;

pub use claims::{Claim, ClaimStore, ClaimUpsert, UpsertOutcome};
pub use memory::MemoryStore;
pub use payments::{NewPaymentVerification, PaymentStore, PaymentVerification, VerificationStatus};
pub use postgres::PgStore;
