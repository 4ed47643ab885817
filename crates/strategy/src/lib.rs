pub mod evaluator;
pub mod indicators;
pub mod params;
pub mod position;
pub mod snapshot;

pub use evaluator::SignalEvaluator;
pub use params::{ClampBounds, EntryRule, ExitRule, MacdParams, StochRsiParams, StrategyParams};
pub use position::PositionTracker;
pub use snapshot::{IndicatorEngine, IndicatorSnapshot, MIN_CANDLES};
