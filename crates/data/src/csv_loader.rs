use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use swingsig_core::{Bar, DataError, Series};

/// Load a validated series from a CSV file.
pub fn load_series_from_csv(path: &Path, instrument: &str) -> Result<Series, DataError> {
    let file = std::fs::File::open(path)?;
    parse_series(file, instrument)
}

/// Parse OHLCV rows into a validated series.
///
/// Expected columns (case-insensitive, flexible ordering):
/// `timestamp` (or `date`, `datetime`, `time`), `open`, `high`, `low`,
/// `close`, and optionally `volume`. Rows are sorted by timestamp; duplicate
/// timestamps are rejected by [`Series::new`].
pub fn parse_series<R: Read>(reader: R, instrument: &str) -> Result<Series, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| DataError::ParseError(format!("Failed to read headers: {}", e)))?
        .clone();

    let col_map = resolve_bar_columns(&headers)?;

    let mut bars = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| DataError::ParseError(format!("CSV record error: {}", e)))?;
        let field = |idx: usize, name: &str| {
            record.get(idx).ok_or_else(|| {
                DataError::ParseError(format!("Row {} is missing the {} column", row + 1, name))
            })
        };

        let timestamp = parse_timestamp(field(col_map.timestamp, "timestamp")?)?;
        let open = parse_decimal(field(col_map.open, "open")?, "open")?;
        let high = parse_decimal(field(col_map.high, "high")?, "high")?;
        let low = parse_decimal(field(col_map.low, "low")?, "low")?;
        let close = parse_decimal(field(col_map.close, "close")?, "close")?;
        let volume = match col_map.volume {
            Some(idx) => parse_decimal(field(idx, "volume")?, "volume")?,
            None => Decimal::ZERO,
        };

        bars.push(Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    bars.sort_by_key(|b| b.timestamp);
    Series::new(instrument, bars)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

struct BarColumnMap {
    timestamp: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

fn resolve_bar_columns(headers: &csv::StringRecord) -> Result<BarColumnMap, DataError> {
    let required = |names: &[&str], label: &str| {
        find_column(headers, names)
            .ok_or_else(|| DataError::ParseError(format!("No {} column found", label)))
    };

    Ok(BarColumnMap {
        timestamp: required(&["timestamp", "date", "datetime", "time"], "timestamp")?,
        open: required(&["open", "o"], "open")?,
        high: required(&["high", "h"], "high")?,
        low: required(&["low", "l"], "low")?,
        close: required(&["close", "c", "adj close"], "close")?,
        volume: find_column(headers, &["volume", "vol", "v"]),
    })
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    // Earlier names win, so `close` is preferred over `adj close`.
    names.iter().find_map(|name| {
        headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(name))
    })
}

fn parse_decimal(s: &str, field: &str) -> Result<Decimal, DataError> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|e| DataError::ParseError(format!("Failed to parse {} '{}': {}", field, s, e)))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DataError> {
    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Without offset, assume UTC
    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%Y%m%d %H:%M:%S",
    ];
    for fmt in &formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    // Unix seconds
    if let Some(dt) = s.parse::<i64>().ok().and_then(|ts| DateTime::from_timestamp(ts, 0)) {
        return Ok(dt);
    }

    Err(DataError::ParseError(format!(
        "Unable to parse timestamp: '{}'",
        s
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_sorted_series() {
        let csv = "\
Date,Open,High,Low,Close,Volume
2024-01-03,101,103,100,102.5,1200
2024-01-02,100,102,99,101,1000
";
        let series = parse_series(csv.as_bytes(), "ACME").unwrap();
        assert_eq!(series.instrument(), "ACME");
        assert_eq!(series.len(), 2);
        assert_eq!(
            series.bars()[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
        );
        assert_eq!(series.closes(), vec![dec!(101), dec!(102.5)]);
        assert_eq!(series.volumes(), vec![dec!(1000), dec!(1200)]);
    }

    #[test]
    fn test_flexible_headers_and_missing_volume() {
        let csv = "\
time, c, o, h, l
1704067200, 10, 9, 11, 8
1704067260, 10.5, 10, 11, 9.5
";
        let series = parse_series(csv.as_bytes(), "X").unwrap();
        let first = &series.bars()[0];
        assert_eq!(first.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(first.open, dec!(9));
        assert_eq!(first.close, dec!(10));
        assert_eq!(first.volume, Decimal::ZERO);
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        for s in [
            "2024-03-05T14:30:00Z",
            "2024-03-05T16:30:00+02:00",
            "2024-03-05 14:30:00",
            "2024-03-05 14:30",
            "03/05/2024 14:30",
        ] {
            assert_eq!(parse_timestamp(s).unwrap(), expected, "{s}");
        }
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_duplicate_timestamps_rejected() {
        let csv = "\
timestamp,open,high,low,close,volume
2024-01-02,100,102,99,101,1000
2024-01-02,100,102,99,101,1000
";
        let err = parse_series(csv.as_bytes(), "DUP").unwrap_err();
        assert!(matches!(err, DataError::InvalidSeries(_)));
        assert!(err.to_string().contains("duplicate timestamp"));
    }

    #[test]
    fn test_missing_column_and_bad_number() {
        let err =
            parse_series("date,open,high,low\n2024-01-02,1,2,1\n".as_bytes(), "X").unwrap_err();
        assert!(err.to_string().contains("No close column found"));

        let err = parse_series(
            "date,open,high,low,close\n2024-01-02,1,2,1,abc\n".as_bytes(),
            "X",
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to parse close 'abc'"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SPY.csv");
        std::fs::write(
            &path,
            "datetime,open,high,low,close,vol\n2024-05-01T09:30:00,500,501,499,500.5,2e6\n",
        )
        .unwrap();

        let series = load_series_from_csv(&path, "SPY").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.volumes(), vec![dec!(2000000)]);

        let missing = load_series_from_csv(&dir.path().join("QQQ.csv"), "QQQ").unwrap_err();
        assert!(matches!(missing, DataError::IoError(_)));
    }

    #[test]
    fn test_header_only_is_empty_series() {
        let err = parse_series("date,open,high,low,close\n".as_bytes(), "X").unwrap_err();
        assert!(matches!(err, DataError::InvalidSeries(_)));
    }
}
