use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use swingsig_core::{
    Bar, IndicatorParams, Series, SignalIndicator, SignalStrength, SignalType, Trend,
};
use swingsig_engine::{
    generate_signals, trend::classify_against, AugmentedPoint, Engine, EngineConfig,
    IndicatorPoint, IndicatorSetBuilder, TrendClassifier,
};
use swingsig_indicators::{series, Warmup};
use swingsig_risk::RiskParams;

fn series_from(closes: &[Decimal]) -> Series {
    let start = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: start + Duration::hours(i as i64),
            open: close,
            high: close + dec!(0.75),
            low: close - dec!(0.5),
            close,
            volume: Decimal::from(10_000 + (i % 11) * 350),
        })
        .collect();
    Series::new("SAMPLE", bars).unwrap()
}

/// Saw-tooth drifting upward, with enough reversals to exercise every rule.
fn sample_closes(n: usize) -> Vec<Decimal> {
    (0..n)
        .map(|i| dec!(50) + Decimal::from(i) / dec!(4) + Decimal::from((i * 7) % 13) - dec!(6))
        .collect()
}

fn first_defined(column: &[Option<Decimal>]) -> Option<usize> {
    column.iter().position(Option::is_some)
}

fn columns(points: &[AugmentedPoint]) -> Vec<(&'static str, Vec<Option<Decimal>>)> {
    let pick = |f: fn(&IndicatorPoint) -> Option<Decimal>| {
        points.iter().map(|p| f(&p.indicators)).collect::<Vec<_>>()
    };
    vec![
        ("rsi", pick(|i| i.rsi)),
        ("macd", pick(|i| i.macd)),
        ("macd_signal", pick(|i| i.macd_signal)),
        ("macd_hist", pick(|i| i.macd_hist)),
        ("bb_upper", pick(|i| i.bb_upper)),
        ("bb_middle", pick(|i| i.bb_middle)),
        ("bb_lower", pick(|i| i.bb_lower)),
        ("volume_sma", pick(|i| i.volume_sma)),
        ("atr", pick(|i| i.atr)),
        ("ema_trend", pick(|i| i.ema_trend)),
        ("sma_short", pick(|i| i.sma_short)),
        ("sma_long", pick(|i| i.sma_long)),
    ]
}

fn expected_first_index(params: &IndicatorParams, column: &str) -> usize {
    match column {
        "rsi" => params.rsi(),
        "macd" => params.macd_slow() - 1,
        "macd_signal" | "macd_hist" => params.macd_slow() + params.macd_signal() - 2,
        "bb_upper" | "bb_middle" | "bb_lower" => params.bb_period() - 1,
        "volume_sma" => params.volume_sma() - 1,
        "atr" => params.atr() - 1,
        "ema_trend" => params.ema_trend() - 1,
        "sma_short" => params.sma_short() - 1,
        "sma_long" => params.sma_long() - 1,
        other => panic!("unknown column {other}"),
    }
}

#[test]
fn test_warmup_boundaries_per_column() {
    let params = IndicatorParams::default();
    let set = IndicatorSetBuilder::new(params)
        .build(&series_from(&sample_closes(120)))
        .unwrap();

    for (name, column) in columns(&set.points) {
        let first = expected_first_index(&params, name);
        assert_eq!(first_defined(&column), Some(first), "{name}");
        assert!(column[first..].iter().all(Option::is_some), "{name} has a gap");
    }
}

#[test]
fn test_column_relationships() {
    let closes = sample_closes(90);
    let set = IndicatorSetBuilder::new(IndicatorParams::default())
        .build(&series_from(&closes))
        .unwrap();
    let sma20 = series::sma(&closes, 20, Warmup::Strict).unwrap();

    for (i, point) in set.points.iter().enumerate() {
        let ind = &point.indicators;
        assert_eq!(ind.bb_middle, sma20[i]);
        assert_eq!(ind.sma_short, sma20[i]);
        if let (Some(m), Some(s), Some(h)) = (ind.macd, ind.macd_signal, ind.macd_hist) {
            assert_eq!(h, m - s);
        }
        if let (Some(u), Some(mid), Some(l)) = (ind.bb_upper, ind.bb_middle, ind.bb_lower) {
            assert!(l <= mid && mid <= u);
        }
        if let Some(rsi) = ind.rsi {
            assert!(rsi >= Decimal::ZERO && rsi <= Decimal::ONE_HUNDRED);
        }
    }
}

#[test]
fn test_build_is_idempotent() {
    let input = series_from(&sample_closes(75));
    let builder = IndicatorSetBuilder::new(IndicatorParams::default());
    let first = builder.build(&input).unwrap();
    let second = builder.build(&input).unwrap();
    assert_eq!(first, second);
    assert_eq!(input.len(), 75);
}

#[test]
fn test_documented_signal_example() {
    let bar = series_from(&[dec!(100)]).bars()[0].clone();
    let latest = AugmentedPoint {
        bar: bar.clone(),
        indicators: IndicatorPoint {
            rsi: Some(dec!(25)),
            macd: Some(dec!(1.2)),
            macd_signal: Some(dec!(1.0)),
            ..Default::default()
        },
    };
    let previous = AugmentedPoint {
        bar,
        indicators: IndicatorPoint {
            rsi: Some(dec!(35)),
            macd: Some(dec!(0.8)),
            macd_signal: Some(dec!(0.9)),
            ..Default::default()
        },
    };

    let signals = generate_signals(&latest, &previous);
    let rendered: Vec<String> = signals.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "STRONG BUY RSI: Oversold condition",
            "MEDIUM BUY MACD: Bullish crossover"
        ]
    );
    assert_eq!(signals[0].strength, SignalStrength::Strong);
    assert_eq!(signals[1].indicator, SignalIndicator::Macd);
    assert!(signals.iter().all(|s| s.kind == SignalType::Buy));
}

#[test]
fn test_documented_trend_examples() {
    assert_eq!(
        classify_against(dec!(110), &[dec!(100), dec!(105)]),
        Trend::StrongUptrend
    );
    assert_eq!(
        classify_against(dec!(102), &[dec!(105), dec!(100)]),
        Trend::WeakUptrend
    );
}

#[test]
fn test_documented_risk_example() {
    let m = swingsig_risk::compute(dec!(100), dec!(1), &RiskParams::default()).unwrap();
    assert_eq!(m.stop_loss, dec!(98.0));
    assert_eq!(m.take_profit, dec!(106.0));
    assert_eq!(m.risk_reward_ratio, dec!(3.0));
}

#[test]
fn test_engine_end_to_end() {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    let input = series_from(&sample_closes(100));
    let analysis = engine.analyze(&input).unwrap();

    let latest = input.latest().unwrap();
    assert_eq!(analysis.latest_close(), Some(latest.close));
    assert_eq!(
        analysis.trend,
        TrendClassifier::default().classify(&input.closes()).unwrap()
    );
    assert_eq!(analysis.risk.stop_loss, latest.close * dec!(0.98));
    assert!(analysis.risk.atr > Decimal::ZERO);

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["instrument"], "SAMPLE");
    assert_eq!(json["augmented"]["points"].as_array().unwrap().len(), 100);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_partial_build_defines_suffix_only(
        raw in prop::collection::vec(100u32..10_000, 1..90),
        rsi in 2usize..20,
        bb in 2usize..25,
    ) {
        let closes: Vec<Decimal> = raw.iter().map(|v| Decimal::new(i64::from(*v), 2)).collect();
        let params = IndicatorParams::new(rsi, 5, 13, 4, bb, 10).unwrap();
        let set = IndicatorSetBuilder::new(params)
            .build_partial(&series_from(&closes))
            .unwrap();
        prop_assert_eq!(set.len(), closes.len());

        for (name, column) in columns(&set.points) {
            let first = expected_first_index(&params, name);
            for (i, value) in column.iter().enumerate() {
                prop_assert_eq!(value.is_some(), i >= first, "{} at {}", name, i);
            }
        }
    }

    #[test]
    fn prop_strict_build_fails_only_below_warmup(len in 1usize..80) {
        let builder = IndicatorSetBuilder::new(IndicatorParams::default());
        let result = builder.build(&series_from(&sample_closes(len)));
        if len < builder.warmup_len() {
            prop_assert!(result.unwrap_err().is_insufficient_data());
        } else {
            prop_assert!(result.is_ok());
        }
    }
}
