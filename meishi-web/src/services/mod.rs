//! Browser integrations

pub mod ethereum;

pub use ethereum::InjectedProvider;
