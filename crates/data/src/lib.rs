pub mod csv_loader;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use swingsig_core::{DataError, DataProvider, Interval, Series};
use tracing::{debug, warn};

/// A CSV-file-based data provider.
///
/// Looks for `{SYMBOL}_{interval}.csv` first (e.g. `AAPL_daily.csv`), then
/// falls back to `{SYMBOL}.csv`.
pub struct CsvDataProvider {
    pub directory: PathBuf,
}

impl CsvDataProvider {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The file that would be loaded for `instrument` at `interval`, if any.
    pub fn resolve_path(&self, instrument: &str, interval: Interval) -> Option<PathBuf> {
        [
            self.directory.join(format!("{}_{}.csv", instrument, interval)),
            self.directory.join(format!("{}.csv", instrument)),
        ]
        .into_iter()
        .find(|p| p.is_file())
    }
}

#[async_trait]
impl DataProvider for CsvDataProvider {
    async fn load_series(&self, instrument: &str, interval: Interval) -> Result<Series, DataError> {
        let path = self.resolve_path(instrument, interval).ok_or_else(|| {
            DataError::NotFound(format!(
                "No CSV file for {} ({}) in {}",
                instrument,
                interval,
                self.directory.display()
            ))
        })?;

        let interval_file = format!("{}_{}.csv", instrument, interval);
        if interval != Interval::Daily && !path.ends_with(&interval_file) {
            warn!(
                instrument,
                %interval,
                path = %path.display(),
                "No interval-specific file, using the undated fallback"
            );
        }

        let bytes = tokio::fs::read(&path).await?;
        let series = csv_loader::parse_series(bytes.as_slice(), instrument)?;
        debug!(path = %path.display(), bars = series.len(), "Loaded series from CSV");
        Ok(series)
    }

    async fn available_instruments(&self) -> Result<Vec<String>, DataError> {
        let mut instruments = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.directory).await?;
        while let Some(entry) = entries.next_entry().await? {
            if let Some(name) = instrument_name(&entry.path()) {
                instruments.push(name);
            }
        }
        instruments.sort();
        instruments.dedup();
        Ok(instruments)
    }
}

/// Instrument symbol for a CSV path, with any `_{interval}` suffix removed.
fn instrument_name(path: &Path) -> Option<String> {
    if path.extension().map_or(true, |e| e != "csv") {
        return None;
    }
    let stem = path.file_stem()?.to_string_lossy();
    let symbol = match stem.rsplit_once('_') {
        Some((symbol, suffix)) if suffix.parse::<Interval>().is_ok() => symbol,
        _ => stem.as_ref(),
    };
    Some(symbol.to_string())
}
