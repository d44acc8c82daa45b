pub mod detect;

pub use detect::{detect_provider, EthereumFlags, InjectedProviders, ProviderDescriptor, ProviderKind};
