use rust_decimal::Decimal;
use serde::Serialize;
use swingsig_core::{Series, Signal, Trend};
use swingsig_indicators::IndicatorError;
use swingsig_risk::{PositionSize, RiskMetrics};
use tracing::{info, instrument};

use crate::builder::{AugmentedSeries, IndicatorSetBuilder};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::signals::SignalGenerator;
use crate::summary::TechnicalSummary;
use crate::trend::TrendClassifier;

/// Result of a full analysis pass over one series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub instrument: String,
    pub signals: Vec<Signal>,
    pub trend: Trend,
    pub risk: RiskMetrics,
    pub summary: TechnicalSummary,
    pub augmented: AugmentedSeries,
}

impl Analysis {
    pub fn latest_close(&self) -> Option<Decimal> {
        self.augmented.latest().map(|p| p.bar.close)
    }
}

/// Runs the indicator set, signal rules, trend classifier and risk
/// calculator with one validated configuration.
///
/// The engine holds no state between calls; each [`analyze`](Self::analyze)
/// depends only on its input series.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    builder: IndicatorSetBuilder,
    generator: SignalGenerator,
    classifier: TrendClassifier,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let classifier = TrendClassifier::new(config.trend_periods.clone())?;
        Ok(Self {
            builder: IndicatorSetBuilder::new(config.periods),
            generator: SignalGenerator::new(config.thresholds),
            classifier,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn builder(&self) -> &IndicatorSetBuilder {
        &self.builder
    }

    /// Bars needed before [`analyze`](Self::analyze) can succeed.
    pub fn min_bars(&self) -> usize {
        let longest_trend = self.classifier.periods().iter().copied().max().unwrap_or(1);
        self.builder.warmup_len().max(longest_trend).max(2)
    }

    #[instrument(skip_all, fields(instrument = %series.instrument(), bars = series.len()))]
    pub fn analyze(&self, series: &Series) -> Result<Analysis, EngineError> {
        let augmented = self.builder.build(series)?;

        let (latest, previous) =
            augmented
                .latest_pair()
                .ok_or(IndicatorError::InsufficientData {
                    indicator: "signal evaluation",
                    required: 2,
                    available: augmented.len(),
                })?;

        let signals = self.generator.generate(latest, previous);
        let trend = self.classifier.classify(&series.closes())?;
        let atr = latest.indicators.atr.ok_or(IndicatorError::InsufficientData {
            indicator: "ATR",
            required: self.builder.params().atr(),
            available: augmented.len(),
        })?;
        let risk = swingsig_risk::compute(latest.bar.close, atr, &self.config.risk)?;
        let summary = TechnicalSummary::from_points(latest, previous, self.generator.thresholds());

        info!(
            signals = signals.len(),
            trend = %trend,
            close = %latest.bar.close,
            "Analysis complete"
        );

        Ok(Analysis {
            instrument: series.instrument().to_string(),
            signals,
            trend,
            risk,
            summary,
            augmented,
        })
    }

    /// Position size for `equity` entering at `entry_price` under the
    /// configured risk settings.
    pub fn position_size(
        &self,
        equity: Decimal,
        entry_price: Decimal,
    ) -> Result<PositionSize, EngineError> {
        Ok(swingsig_risk::position_size(
            equity,
            entry_price,
            &self.config.risk,
        )?)
    }
}
