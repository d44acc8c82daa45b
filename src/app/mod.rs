pub mod claim_service;
pub mod payment_service;

pub use claim_service::{ClaimRegistration, ClaimService};
pub use payment_service::{PaymentService, PaymentSubmission, VerifyError};
