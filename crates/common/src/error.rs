use thiserror::Error;

/// Error taxonomy for the trading agent.
///
/// `Connectivity`, `InsufficientData` and `Order` are caught at the cycle
/// boundary and skip the current cycle. `Config` is fatal at startup.
#[derive(Debug, Error)]
pub enum Error {
    #[error("exchange connectivity error: {0}")]
    Connectivity(String),

    #[error("insufficient market data: {0}")]
    InsufficientData(String),

    #[error("order rejected by exchange: {0}")]
    Order(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for errors the cycle loop absorbs (skip-and-retry); false for
    /// errors that should abort startup.
    pub fn is_cycle_error(&self) -> bool {
        !matches!(self, Error::Config(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
