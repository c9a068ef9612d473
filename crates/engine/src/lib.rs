pub mod analysis;
pub mod builder;
pub mod config;
pub mod error;
pub mod signals;
pub mod summary;
pub mod trend;

pub use analysis::{Analysis, Engine};
pub use builder::{AugmentedPoint, AugmentedSeries, IndicatorPoint, IndicatorSetBuilder};
pub use config::{ConfigError, EngineConfig};
pub use error::EngineError;
pub use signals::{generate_signals, SignalGenerator, SignalThresholds};
pub use summary::{
    change_percentage, MaPosition, MacdBias, Momentum, TechnicalSummary, VolumeState,
};
pub use trend::TrendClassifier;
