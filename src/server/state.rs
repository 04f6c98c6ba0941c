//! Shared application state for the API server

use crate::alerts::AlertThresholds;
use crate::record::DailyRecord;
use chrono::NaiveDate;
use std::sync::Arc;

/// Shared, read-only application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Full record series, ordered by date
    pub records: Arc<Vec<DailyRecord>>,
    /// Default "today" when a request does not name one
    pub reference_date: NaiveDate,
    pub thresholds: AlertThresholds,
}

impl AppState {
    pub fn new(
        mut records: Vec<DailyRecord>,
        reference_date: NaiveDate,
        thresholds: AlertThresholds,
    ) -> Self {
        records.sort_by_key(|record| record.date);
        AppState {
            records: Arc::new(records),
            reference_date,
            thresholds,
        }
    }
}
