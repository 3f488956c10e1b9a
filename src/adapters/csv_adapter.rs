//! CSV file data adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with a header row. Columns are
//! located by name (case-insensitive): `date` and `close` are required,
//! `open`, `high`, `low` and `volume` are optional. Anything else (e.g.
//! `Adj Close`) is ignored.

use crate::domain::error::ConfluenceError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    close: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, ConfluenceError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| {
            find(name).ok_or_else(|| ConfluenceError::DataSource {
                reason: format!("missing {} column", name),
            })
        };

        Ok(Columns {
            date: required("date")?,
            close: required("close")?,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            volume: find("volume"),
        })
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_all(&self, symbol: &str) -> Result<Option<Vec<OhlcvBar>>, ConfluenceError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| ConfluenceError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| ConfluenceError::DataSource {
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = Columns::from_headers(headers)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| ConfluenceError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;
            bars.push(parse_record(&record, &columns)?);
        }

        bars.sort_by_key(|b| b.date);
        Ok(Some(bars))
    }
}

fn parse_field(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, ConfluenceError> {
    record
        .get(idx)
        .ok_or_else(|| ConfluenceError::DataSource {
            reason: format!("missing {} value", name),
        })?
        .trim()
        .parse()
        .map_err(|e| ConfluenceError::DataSource {
            reason: format!("invalid {} value: {}", name, e),
        })
}

fn parse_record(record: &csv::StringRecord, columns: &Columns) -> Result<OhlcvBar, ConfluenceError> {
    let date_str = record
        .get(columns.date)
        .ok_or_else(|| ConfluenceError::DataSource {
            reason: "missing date value".into(),
        })?;
    // tolerate timestamps such as "2015-01-02 00:00:00"
    let date_part = date_str.trim().split([' ', 'T']).next().unwrap_or_default();
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
        ConfluenceError::DataSource {
            reason: format!("invalid date format: {}", e),
        }
    })?;

    let close = parse_field(record, columns.close, "close")?;
    let optional = |idx: Option<usize>, name: &str| match idx {
        Some(i) => parse_field(record, i, name),
        None => Ok(close),
    };

    let volume = match columns.volume {
        Some(i) => parse_field(record, i, "volume")? as i64,
        None => 0,
    };

    Ok(OhlcvBar {
        date,
        open: optional(columns.open, "open")?,
        high: optional(columns.high, "high")?,
        low: optional(columns.low, "low")?,
        close,
        volume,
    })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ConfluenceError> {
        let bars = self.read_all(symbol)?.unwrap_or_default();
        Ok(bars
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, ConfluenceError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| ConfluenceError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ConfluenceError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ConfluenceError> {
        let bars = self.read_all(symbol)?.unwrap_or_default();
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}
