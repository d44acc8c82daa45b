pub mod config;
pub mod indexer;
pub mod rpc;
