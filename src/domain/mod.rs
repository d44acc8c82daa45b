pub mod balance;
pub mod payment;
pub mod wallet;
