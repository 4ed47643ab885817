pub mod binance;
pub mod cycle;
pub mod schedule;

pub use binance::BinanceClient;
pub use cycle::CycleRunner;
