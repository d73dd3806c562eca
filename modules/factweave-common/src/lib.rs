pub mod config;
pub mod salvage;
pub mod types;

pub use config::Config;
pub use types::*;
