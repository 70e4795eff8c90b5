//! Core data types for the consumption pipeline
//!
//! Raw rows are validated once into `ParsedReading`; every aggregate below is
//! derived from a slice of those and never stored between runs.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use std::fmt;

use crate::error::AppError;

/// One timestamped energy measurement row; `consumption_kwh` is `None` for an empty cell
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Reading {
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) consumption_kwh: Option<f64>,
    pub(crate) total_cost: f64,
}

/// A reading with its calendar date and hour of day derived
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ParsedReading {
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) date: NaiveDate,
    pub(crate) hour: u32,
    pub(crate) consumption_kwh: Option<f64>,
    pub(crate) total_cost: f64,
}

impl ParsedReading {
    /// Consumption for sums, a missing value counts as 0
    pub(crate) fn kwh(&self) -> f64 {
        self.consumption_kwh.unwrap_or(0.0)
    }
}

impl From<Reading> for ParsedReading {
    fn from(reading: Reading) -> Self {
        ParsedReading {
            date: reading.timestamp.date(),
            hour: reading.timestamp.hour(),
            timestamp: reading.timestamp,
            consumption_kwh: reading.consumption_kwh,
            total_cost: reading.total_cost,
        }
    }
}

/// Time-of-day bucket a reading falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub(crate) enum TimeOfDay {
    /// 00:00–04:59 and 22:00–23:59
    Madrugada,
    /// 05:00–16:59
    Pico,
    /// 17:00–21:59
    Noturno,
}

impl TimeOfDay {
    pub(crate) const ALL: [TimeOfDay; 3] = [TimeOfDay::Madrugada, TimeOfDay::Pico, TimeOfDay::Noturno];

    /// Bins are right-open: the edge hour belongs to the following bucket.
    pub(crate) fn from_hour(hour: u32) -> Self {
        match hour {
            0..5 => TimeOfDay::Madrugada,
            5..17 => TimeOfDay::Pico,
            17..22 => TimeOfDay::Noturno,
            _ => TimeOfDay::Madrugada,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            TimeOfDay::Madrugada => "Madrugada",
            TimeOfDay::Pico => "Pico",
            TimeOfDay::Noturno => "Noturno",
        }
    }

    pub(crate) fn hours(self) -> &'static str {
        match self {
            TimeOfDay::Madrugada => "22:00-04:59",
            TimeOfDay::Pico => "05:00-16:59",
            TimeOfDay::Noturno => "17:00-21:59",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A reading paired with its time-of-day bucket
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct CategorizedReading<'a> {
    #[serde(flatten)]
    pub(crate) reading: &'a ParsedReading,
    pub(crate) category: TimeOfDay,
}

/// Per-date totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct DailyAggregate {
    pub(crate) date: NaiveDate,
    pub(crate) consumption_kwh: f64,
    pub(crate) total_cost: f64,
    pub(crate) readings: usize,
}

impl DailyAggregate {
    pub(crate) fn new(date: NaiveDate) -> Self {
        DailyAggregate {
            date,
            consumption_kwh: 0.0,
            total_cost: 0.0,
            readings: 0,
        }
    }

    pub(crate) fn add(&mut self, reading: &ParsedReading) {
        self.consumption_kwh += reading.kwh();
        self.total_cost += reading.total_cost;
        self.readings += 1;
    }
}

/// Daily totals in ascending date order plus the day with the highest consumption
#[derive(Debug, Clone, Default)]
pub(crate) struct DailySeries {
    pub(crate) days: Vec<DailyAggregate>,
    pub(crate) peak: Option<NaiveDate>,
}

impl DailySeries {
    pub(crate) fn peak_day(&self) -> Option<&DailyAggregate> {
        let peak = self.peak?;
        self.days.iter().find(|d| d.date == peak)
    }

    pub(crate) fn total_consumption(&self) -> f64 {
        self.days.iter().map(|d| d.consumption_kwh).sum()
    }

    pub(crate) fn total_cost(&self) -> f64 {
        self.days.iter().map(|d| d.total_cost).sum()
    }
}

/// Mean consumption of all readings sharing an hour of day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct HourlyAggregate {
    pub(crate) hour: u32,
    /// Mean over readings that carry a value, `None` when none of them do
    pub(crate) average_kwh: Option<f64>,
    pub(crate) readings: usize,
}

/// Summed consumption of one time-of-day bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CategoryAggregate {
    pub(crate) category: TimeOfDay,
    pub(crate) consumption_kwh: f64,
    /// Percentage of the period total, 0 when the total is 0
    pub(crate) share_pct: f64,
}

/// Running per-category sums, indexed by `TimeOfDay` declaration order
#[derive(Debug, Default)]
pub(crate) struct CategoryTotals {
    consumption: [f64; 3],
    readings: [usize; 3],
}

impl CategoryTotals {
    pub(crate) fn add(&mut self, category: TimeOfDay, consumption_kwh: f64) {
        self.consumption[category.index()] += consumption_kwh;
        self.readings[category.index()] += 1;
    }

    pub(crate) fn into_aggregates(self) -> Vec<CategoryAggregate> {
        let total: f64 = self.consumption.iter().sum();
        TimeOfDay::ALL
            .into_iter()
            .filter(|c| self.readings[c.index()] > 0)
            .map(|category| {
                let consumption_kwh = self.consumption[category.index()];
                let share_pct = if total == 0.0 {
                    0.0
                } else {
                    consumption_kwh / total * 100.0
                };
                CategoryAggregate {
                    category,
                    consumption_kwh,
                    share_pct,
                }
            })
            .collect()
    }
}

/// Headline figures for the selected period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SummaryStats {
    /// Mean daily consumption over every parsed reading, regardless of filter
    pub(crate) overall_daily_average: Option<f64>,
    /// Mean daily consumption inside the selected period
    pub(crate) period_daily_average: Option<f64>,
    pub(crate) period_total_consumption: f64,
    pub(crate) period_total_cost: f64,
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DateRange {
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
}

impl DateRange {
    pub(crate) fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::InvalidRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// Smallest range covering every reading, `None` when there are none
    pub(crate) fn spanning(readings: &[ParsedReading]) -> Option<Self> {
        let start = readings.iter().map(|r| r.date).min()?;
        let end = readings.iter().map(|r| r.date).max()?;
        Some(DateRange { start, end })
    }

    /// Build the range from optional bounds, filling gaps with the data's min/max date.
    ///
    /// Returns `Ok(None)` when a bound is missing and there is no data to take it from.
    pub(crate) fn resolve(
        since: Option<NaiveDate>,
        until: Option<NaiveDate>,
        readings: &[ParsedReading],
    ) -> Result<Option<Self>, AppError> {
        if let (Some(start), Some(end)) = (since, until) {
            return DateRange::new(start, end).map(Some);
        }
        let Some(span) = DateRange::spanning(readings) else {
            return Ok(None);
        };
        DateRange::new(since.unwrap_or(span.start), until.unwrap_or(span.end)).map(Some)
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Parsed input with the number of rows that had to be dropped
#[derive(Debug, Default)]
pub(crate) struct LoadResult {
    pub(crate) readings: Vec<ParsedReading>,
    pub(crate) skipped: usize,
}
