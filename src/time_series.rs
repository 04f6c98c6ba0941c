use crate::error::EngineError;
use crate::record::DailyRecord;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Half-open date window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    /// First day included
    pub start: NaiveDate,
    /// First day excluded
    pub end: NaiveDate,
}

impl DateWindow {
    /// Creates a new window. A window with `start > end` is rejected.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, EngineError> {
        if start > end {
            return Err(EngineError::InvalidWindow { start, end });
        }
        Ok(DateWindow { start, end })
    }

    /// Creates a DateWindow from a standard Range.
    pub fn from_range(range: Range<NaiveDate>) -> Result<Self, EngineError> {
        Self::new(range.start, range.end)
    }

    /// The `days` calendar days ending on and including `last_day`.
    pub fn trailing_days(last_day: NaiveDate, days: i64) -> Result<Self, EngineError> {
        let end = day_after(last_day)?;
        let start = end
            .checked_sub_signed(Duration::days(days.max(0)))
            .ok_or(EngineError::DateOutOfRange(last_day))?;
        Ok(DateWindow { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of calendar days covered.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days().max(0)
    }
}

/// The exclusive end of a window whose last included day is `date`.
pub fn day_after(date: NaiveDate) -> Result<NaiveDate, EngineError> {
    date.succ_opt().ok_or(EngineError::DateOutOfRange(date))
}

/// Filters `records` to those dated inside `window`.
///
/// Chronological order of the input is preserved. Records do not need to be
/// contiguous; an empty result is not an error.
pub fn select_window(records: &[DailyRecord], window: &DateWindow) -> Vec<DailyRecord> {
    records
        .iter()
        .filter(|record| window.contains(record.date))
        .cloned()
        .collect()
}

/// Trait for data source abstraction.
///
/// The dashboard only reads records through this trait, so the synthetic
/// generator can be swapped for any other supplier of daily records.
pub trait DataSource {
    /// Retrieves the daily records dated inside `window`, ordered by date.
    ///
    /// # Errors
    /// Returns an error if the window is inverted or the source cannot be read.
    fn daily_records(&self, window: &DateWindow) -> Result<Vec<DailyRecord>, DataSourceError>;

    /// Every record the source holds, ordered by date.
    fn all_records(&self) -> Result<Vec<DailyRecord>, DataSourceError>;
}

/// Errors that can occur when reading a data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceError {
    /// Invalid window (start > end)
    InvalidWindow,
    /// Generic error message
    Other(String),
}

impl std::fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSourceError::InvalidWindow => write!(f, "Invalid date window"),
            DataSourceError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DataSourceError {}

/// In-memory data source, mostly for tests and for serving a generated series.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    records: Vec<DailyRecord>,
}

impl InMemoryDataSource {
    pub fn new() -> Self {
        InMemoryDataSource {
            records: Vec::new(),
        }
    }

    /// Builds a source from records in any order; they are stored sorted by date.
    pub fn from_records(mut records: Vec<DailyRecord>) -> Self {
        records.sort_by_key(|record| record.date);
        InMemoryDataSource { records }
    }

    /// Adds a record, keeping the series ordered. A record for an existing
    /// date replaces it.
    pub fn add_record(&mut self, record: DailyRecord) {
        match self
            .records
            .binary_search_by_key(&record.date, |existing| existing.date)
        {
            Ok(index) => self.records[index] = record,
            Err(index) => self.records.insert(index, record),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }
}

impl DataSource for InMemoryDataSource {
    fn daily_records(&self, window: &DateWindow) -> Result<Vec<DailyRecord>, DataSourceError> {
        if window.start > window.end {
            return Err(DataSourceError::InvalidWindow);
        }
        Ok(select_window(&self.records, window))
    }

    fn all_records(&self) -> Result<Vec<DailyRecord>, DataSourceError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(d: NaiveDate, revenue: f64) -> DailyRecord {
        DailyRecord::new(d).with_value(crate::record::MetricField::DailyRevenue, revenue)
    }

    #[test]
    fn test_window_is_half_open() {
        let window = DateWindow::new(date(2024, 1, 15), date(2024, 1, 17)).unwrap();
        assert!(window.contains(date(2024, 1, 15)));
        assert!(window.contains(date(2024, 1, 16)));
        assert!(!window.contains(date(2024, 1, 17)));
        assert_eq!(window.num_days(), 2);
    }

    #[test]
    fn test_window_rejects_inverted_range() {
        let result = DateWindow::new(date(2024, 1, 16), date(2024, 1, 15));
        assert_eq!(
            result.unwrap_err(),
            EngineError::InvalidWindow {
                start: date(2024, 1, 16),
                end: date(2024, 1, 15)
            }
        );
    }

    #[test]
    fn test_trailing_days_includes_last_day() {
        let window = DateWindow::trailing_days(date(2024, 3, 31), 30).unwrap();
        assert_eq!(window.start, date(2024, 3, 2));
        assert_eq!(window.end, date(2024, 4, 1));
        assert_eq!(window.num_days(), 30);
    }

    #[test]
    fn test_trailing_days_at_calendar_edges() {
        assert_eq!(
            DateWindow::trailing_days(NaiveDate::MAX, 30).unwrap_err(),
            EngineError::DateOutOfRange(NaiveDate::MAX)
        );

        let near_min = NaiveDate::MIN + Duration::days(5);
        assert_eq!(
            DateWindow::trailing_days(near_min, 30).unwrap_err(),
            EngineError::DateOutOfRange(near_min)
        );
    }

    #[test]
    fn test_select_window_preserves_order_and_skips_gaps() {
        let records = vec![
            record(date(2024, 1, 14), 100.0),
            record(date(2024, 1, 15), 101.0),
            record(date(2024, 1, 18), 102.0),
            record(date(2024, 1, 20), 103.0),
        ];
        let window = DateWindow::new(date(2024, 1, 15), date(2024, 1, 20)).unwrap();

        let selected = select_window(&records, &window);
        let revenue: Vec<f64> = selected.iter().map(|r| r.daily_revenue).collect();
        assert_eq!(revenue, vec![101.0, 102.0]);
    }

    #[test]
    fn test_select_window_outside_range_is_empty() {
        let records = vec![record(date(2024, 1, 14), 100.0), record(date(2024, 1, 15), 101.0)];
        let before = DateWindow::new(date(2023, 1, 1), date(2023, 12, 31)).unwrap();
        let after = DateWindow::new(date(2024, 1, 16), date(2024, 2, 1)).unwrap();

        assert!(select_window(&records, &before).is_empty());
        assert!(select_window(&records, &after).is_empty());
    }

    #[test]
    fn test_in_memory_source_sorts_and_replaces() {
        let mut source = InMemoryDataSource::from_records(vec![
            record(date(2024, 1, 3), 3.0),
            record(date(2024, 1, 1), 1.0),
        ]);
        source.add_record(record(date(2024, 1, 2), 2.0));
        source.add_record(record(date(2024, 1, 3), 30.0));

        let revenue: Vec<f64> = source.records().iter().map(|r| r.daily_revenue).collect();
        assert_eq!(revenue, vec![1.0, 2.0, 30.0]);
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn test_in_memory_source_rejects_inverted_window() {
        let source = InMemoryDataSource::new();
        let window = DateWindow {
            start: date(2024, 1, 2),
            end: date(2024, 1, 1),
        };
        assert_eq!(
            source.daily_records(&window).unwrap_err(),
            DataSourceError::InvalidWindow
        );
    }

    #[test]
    fn test_in_memory_source_filters_window() {
        let source = InMemoryDataSource::from_records(vec![
            record(date(2024, 1, 1), 1.0),
            record(date(2024, 1, 2), 2.0),
            record(date(2024, 1, 3), 3.0),
        ]);
        let window = DateWindow::new(date(2024, 1, 2), date(2024, 1, 3)).unwrap();

        let result = source.daily_records(&window).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].daily_revenue, 2.0);
    }
}
