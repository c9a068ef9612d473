use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use swingsig_core::{Bar, IndicatorParams, Series};
use swingsig_indicators::series::{self, ensure_len};
use swingsig_indicators::Warmup;
use tracing::debug;

use crate::error::EngineError;

/// Bollinger band width in population standard deviations.
pub const BOLLINGER_STD_DEV: Decimal = Decimal::TWO;

/// Indicator values for one bar; `None` inside that indicator's warm-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub rsi: Option<Decimal>,
    pub macd: Option<Decimal>,
    pub macd_signal: Option<Decimal>,
    pub macd_hist: Option<Decimal>,
    pub bb_upper: Option<Decimal>,
    pub bb_middle: Option<Decimal>,
    pub bb_lower: Option<Decimal>,
    pub volume_sma: Option<Decimal>,
    pub atr: Option<Decimal>,
    pub ema_trend: Option<Decimal>,
    pub sma_short: Option<Decimal>,
    pub sma_long: Option<Decimal>,
}

/// An input bar alongside its indicator values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedPoint {
    pub bar: Bar,
    pub indicators: IndicatorPoint,
}

/// The input series with every indicator aligned by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedSeries {
    pub instrument: String,
    pub params: IndicatorParams,
    pub points: Vec<AugmentedPoint>,
}

impl AugmentedSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&AugmentedPoint> {
        self.points.last()
    }

    /// `(latest, previous)`, when the series has at least two points.
    pub fn latest_pair(&self) -> Option<(&AugmentedPoint, &AugmentedPoint)> {
        match self.points.as_slice() {
            [.., previous, latest] => Some((latest, previous)),
            _ => None,
        }
    }

    /// The last `n` points, oldest first.
    pub fn tail(&self, n: usize) -> &[AugmentedPoint] {
        &self.points[self.points.len().saturating_sub(n)..]
    }
}

/// Computes the full indicator set for a series.
#[derive(Debug, Clone)]
pub struct IndicatorSetBuilder {
    params: IndicatorParams,
}

impl IndicatorSetBuilder {
    pub fn new(params: IndicatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Inputs each indicator needs before its first value.
    ///
    /// Computed from the windows alone, without building indicator state.
    pub fn requirements(&self) -> [(&'static str, usize); 8] {
        let p = &self.params;
        [
            ("RSI", p.rsi().saturating_add(1)),
            ("MACD", p.macd_slow().saturating_add(p.macd_signal()) - 1),
            ("Bollinger Bands", p.bb_period()),
            ("Volume SMA", p.volume_sma()),
            ("ATR", p.atr()),
            ("EMA", p.ema_trend()),
            ("SMA (short)", p.sma_short()),
            ("SMA (long)", p.sma_long()),
        ]
    }

    /// Shortest series for which [`build`](Self::build) succeeds.
    pub fn warmup_len(&self) -> usize {
        self.requirements()
            .iter()
            .map(|(_, required)| *required)
            .max()
            .unwrap_or(1)
    }

    /// Build the set, failing if the series is shorter than the largest
    /// indicator requirement.
    pub fn build(&self, series: &Series) -> Result<AugmentedSeries, EngineError> {
        self.build_with(series, Warmup::Strict)
    }

    /// Build the set for any series length, leaving warm-up values as `None`.
    pub fn build_partial(&self, series: &Series) -> Result<AugmentedSeries, EngineError> {
        self.build_with(series, Warmup::Partial)
    }

    fn build_with(&self, series: &Series, warmup: Warmup) -> Result<AugmentedSeries, EngineError> {
        let p = &self.params;

        if warmup == Warmup::Strict {
            if let Some((indicator, required)) =
                self.requirements().into_iter().max_by_key(|(_, r)| *r)
            {
                ensure_len(indicator, required, series.len(), warmup)?;
            }
        }

        let closes = series.closes();
        let volumes = series.volumes();

        let rsi = series::rsi(&closes, p.rsi(), warmup)?;
        let macd = series::macd(&closes, p.macd_fast(), p.macd_slow(), p.macd_signal(), warmup)?;
        let bands = series::bollinger(&closes, p.bb_period(), BOLLINGER_STD_DEV, warmup)?;
        let volume_sma = series::sma(&volumes, p.volume_sma(), warmup)?;
        let atr = series::atr(&series.highs(), &series.lows(), &closes, p.atr(), warmup)?;
        let ema_trend = series::ema(&closes, p.ema_trend(), warmup)?;
        let sma_short = series::sma(&closes, p.sma_short(), warmup)?;
        let sma_long = series::sma(&closes, p.sma_long(), warmup)?;

        let points = series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| AugmentedPoint {
                bar: bar.clone(),
                indicators: IndicatorPoint {
                    rsi: rsi[i],
                    macd: macd.macd[i],
                    macd_signal: macd.signal[i],
                    macd_hist: macd.histogram[i],
                    bb_upper: bands[i].map(|b| b.upper),
                    bb_middle: bands[i].map(|b| b.middle),
                    bb_lower: bands[i].map(|b| b.lower),
                    volume_sma: volume_sma[i],
                    atr: atr[i],
                    ema_trend: ema_trend[i],
                    sma_short: sma_short[i],
                    sma_long: sma_long[i],
                },
            })
            .collect();

        debug!(
            instrument = %series.instrument(),
            bars = series.len(),
            ?warmup,
            "Built indicator set"
        );

        Ok(AugmentedSeries {
            instrument: series.instrument().to_string(),
            params: *p,
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use swingsig_indicators::IndicatorError;

    fn series(n: usize) -> Series {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let bars = (0..n)
            .map(|i| {
                let close = dec!(100) + Decimal::from(i % 7) - Decimal::from(i % 3);
                Bar {
                    timestamp: start + Duration::days(i as i64),
                    open: close,
                    high: close + dec!(1),
                    low: close - dec!(1),
                    close,
                    volume: Decimal::from(1000 + (i % 5) * 100),
                }
            })
            .collect();
        Series::new("TEST", bars).unwrap()
    }

    #[test]
    fn test_default_warmup_is_long_sma() {
        let builder = IndicatorSetBuilder::new(IndicatorParams::default());
        assert_eq!(builder.warmup_len(), 50);
    }

    #[test]
    fn test_strict_reports_largest_requirement() {
        let builder = IndicatorSetBuilder::new(IndicatorParams::default());
        let err = builder.build(&series(40)).unwrap_err();
        assert_eq!(
            err,
            EngineError::Indicator(IndicatorError::InsufficientData {
                indicator: "SMA (long)",
                required: 50,
                available: 40,
            })
        );
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_huge_window_is_insufficient_data() {
        let params = IndicatorParams::new(14, 12, 26, 9, 20, 1usize << 40).unwrap();
        let builder = IndicatorSetBuilder::new(params);
        let err = builder.build(&series(60)).unwrap_err();
        assert!(err.is_insufficient_data());
        assert_eq!(
            err,
            EngineError::Indicator(IndicatorError::InsufficientData {
                indicator: "Volume SMA",
                required: 1 << 40,
                available: 60,
            })
        );
    }

    #[test]
    fn test_requirements_saturate() {
        let params =
            IndicatorParams::new(usize::MAX, 12, usize::MAX - 1, usize::MAX, 20, 20).unwrap();
        let builder = IndicatorSetBuilder::new(params);
        let reqs = builder.requirements();
        assert_eq!(reqs[0], ("RSI", usize::MAX));
        assert_eq!(reqs[1], ("MACD", usize::MAX - 1));
        assert_eq!(builder.warmup_len(), usize::MAX);
        assert!(builder.build(&series(60)).unwrap_err().is_insufficient_data());
    }

    #[test]
    fn test_partial_keeps_every_bar() {
        let builder = IndicatorSetBuilder::new(IndicatorParams::default());
        let out = builder.build_partial(&series(20)).unwrap();
        assert_eq!(out.len(), 20);
        let latest = out.latest().unwrap();
        assert!(latest.indicators.bb_middle.is_some());
        assert!(latest.indicators.rsi.is_some());
        assert!(latest.indicators.macd.is_none());
        assert!(latest.indicators.sma_long.is_none());
    }

    #[test]
    fn test_build_keeps_bars_untouched() {
        let input = series(60);
        let builder = IndicatorSetBuilder::new(IndicatorParams::default());
        let out = builder.build(&input).unwrap();
        assert_eq!(out.instrument, "TEST");
        assert_eq!(out.len(), input.len());
        for (point, bar) in out.points.iter().zip(input.bars()) {
            assert_eq!(&point.bar, bar);
        }
        let (latest, previous) = out.latest_pair().unwrap();
        assert_eq!(latest.bar.timestamp, input.bars()[59].timestamp);
        assert_eq!(previous.bar.timestamp, input.bars()[58].timestamp);
        assert_eq!(out.tail(3).len(), 3);
        assert_eq!(out.tail(100).len(), 60);
    }
}
