pub mod config;
pub mod error;
pub mod exchange;
pub mod types;

pub use config::{Config, TradeLimits};
pub use error::{Error, Result};
pub use exchange::SpotExchange;
pub use types::*;
