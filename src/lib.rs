pub mod analyzers;
pub mod config;
pub mod error;
pub mod inspect;
pub mod loader;
pub mod output;
