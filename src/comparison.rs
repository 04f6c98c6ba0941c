//! Analysis periods and comparison baselines.
//!
//! Both resolve against an explicit `reference_date` ("today") so results
//! never depend on the wall clock.

use crate::error::EngineError;
use crate::time_series::{day_after, DateWindow};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trailing period selected for KPI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPeriod {
    #[default]
    Last30Days,
    LastQuarter,
    LastYear,
    AllTime,
}

impl AnalysisPeriod {
    /// Length in days, or `None` for the unbounded period.
    pub fn days(&self) -> Option<i64> {
        match self {
            AnalysisPeriod::Last30Days => Some(30),
            AnalysisPeriod::LastQuarter => Some(90),
            AnalysisPeriod::LastYear => Some(365),
            AnalysisPeriod::AllTime => None,
        }
    }

    /// Resolves the period into a window ending on and including `reference_date`.
    ///
    /// `first_date` is the earliest record of the series; it only matters for
    /// [`AnalysisPeriod::AllTime`].
    ///
    /// # Errors
    /// Returns [`EngineError::DateOutOfRange`] when the window would leave the
    /// representable calendar.
    pub fn window(
        &self,
        reference_date: NaiveDate,
        first_date: Option<NaiveDate>,
    ) -> Result<DateWindow, EngineError> {
        match self.days() {
            Some(days) => DateWindow::trailing_days(reference_date, days),
            None => {
                let end = day_after(reference_date)?;
                let start = first_date.map_or(end, |first| first.min(end));
                Ok(DateWindow { start, end })
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisPeriod::Last30Days => "last_30_days",
            AnalysisPeriod::LastQuarter => "last_quarter",
            AnalysisPeriod::LastYear => "last_year",
            AnalysisPeriod::AllTime => "all_time",
        }
    }
}

impl fmt::Display for AnalysisPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalysisPeriod {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "last_30_days" | "30d" => Ok(AnalysisPeriod::Last30Days),
            "last_quarter" | "90d" => Ok(AnalysisPeriod::LastQuarter),
            "last_year" | "365d" => Ok(AnalysisPeriod::LastYear),
            "all_time" | "all" => Ok(AnalysisPeriod::AllTime),
            _ => Err(EngineError::InvalidPeriod(value.to_string())),
        }
    }
}

/// Baseline a KPI is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// 30 days immediately before the analysis window
    #[default]
    PreviousMonth,
    /// 90 days immediately before the analysis window
    PreviousQuarter,
    /// 365 days immediately before the analysis window
    PreviousYear,
    /// January 1 of the reference year through the reference date
    YearToDateAverage,
    /// The calendar month of the analysis start, one year earlier
    SameMonthPreviousYear,
}

impl ComparisonMode {
    pub const ALL: [ComparisonMode; 5] = [
        ComparisonMode::PreviousMonth,
        ComparisonMode::PreviousQuarter,
        ComparisonMode::PreviousYear,
        ComparisonMode::YearToDateAverage,
        ComparisonMode::SameMonthPreviousYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonMode::PreviousMonth => "previous_month",
            ComparisonMode::PreviousQuarter => "previous_quarter",
            ComparisonMode::PreviousYear => "previous_year",
            ComparisonMode::YearToDateAverage => "year_to_date_average",
            ComparisonMode::SameMonthPreviousYear => "same_month_previous_year",
        }
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComparisonMode {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "previous_month" | "month" => Ok(ComparisonMode::PreviousMonth),
            "previous_quarter" | "quarter" => Ok(ComparisonMode::PreviousQuarter),
            "previous_year" | "year" => Ok(ComparisonMode::PreviousYear),
            "year_to_date_average" | "ytd" => Ok(ComparisonMode::YearToDateAverage),
            "same_month_previous_year" | "yoy" => Ok(ComparisonMode::SameMonthPreviousYear),
            _ => Err(EngineError::InvalidMode(value.to_string())),
        }
    }
}

fn preceding(analysis_window: &DateWindow, days: i64) -> Result<DateWindow, EngineError> {
    let start = analysis_window
        .start
        .checked_sub_signed(Duration::days(days))
        .ok_or(EngineError::DateOutOfRange(analysis_window.start))?;
    Ok(DateWindow {
        start,
        end: analysis_window.start,
    })
}

fn same_month_previous_year(start: NaiveDate) -> Result<DateWindow, EngineError> {
    let month_start = start.with_day(1).unwrap_or(start);
    let first = month_start
        .checked_sub_months(Months::new(12))
        .ok_or(EngineError::DateOutOfRange(start))?;
    let end = first
        .checked_add_months(Months::new(1))
        .ok_or(EngineError::DateOutOfRange(start))?;
    Ok(DateWindow { start: first, end })
}

/// Derives the comparison window for `analysis_window` under `mode`.
///
/// Previous-period modes end exactly where the analysis window starts, so
/// the two never overlap. The year-to-date baseline runs from January 1 of
/// `reference_date`'s year through `reference_date` inclusive.
///
/// # Errors
/// Returns [`EngineError::DateOutOfRange`] when the baseline would start or
/// end outside the representable calendar.
pub fn derive_comparison_window(
    analysis_window: &DateWindow,
    mode: ComparisonMode,
    reference_date: NaiveDate,
) -> Result<DateWindow, EngineError> {
    match mode {
        ComparisonMode::PreviousMonth => preceding(analysis_window, 30),
        ComparisonMode::PreviousQuarter => preceding(analysis_window, 90),
        ComparisonMode::PreviousYear => preceding(analysis_window, 365),
        ComparisonMode::YearToDateAverage => Ok(DateWindow {
            start: NaiveDate::from_yo_opt(reference_date.year(), 1).unwrap_or(reference_date),
            end: day_after(reference_date)?,
        }),
        ComparisonMode::SameMonthPreviousYear => same_month_previous_year(analysis_window.start),
    }
}
