pub mod moralis;

pub use moralis::MoralisIndexer;
