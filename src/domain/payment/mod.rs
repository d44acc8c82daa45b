pub mod checks;
pub mod indexer;
pub mod transfer;

pub use checks::{check_transaction, normalize_tx_hash, AcceptedTransfer, PaymentPolicy, Rejection};
pub use indexer::{IndexedLog, IndexedTransaction, TransactionIndexer};
pub use transfer::{find_transfer, TokenTransfer, TRANSFER_TOPIC};
