//! Aggregation logic for parsed readings
//!
//! Converts a slice of readings into the grouped views shown to the user
//! (daily totals, hourly means, time-of-day buckets, summary figures).

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::core::types::{
    CategorizedReading, CategoryAggregate, CategoryTotals, DailyAggregate, DailySeries, DateRange,
    HourlyAggregate, ParsedReading, SummaryStats, TimeOfDay,
};

/// Keep readings whose date lies inside the range, in their original order
pub(crate) fn filter_by_date_range(readings: &[ParsedReading], range: &DateRange) -> Vec<ParsedReading> {
    readings
        .iter()
        .filter(|r| range.contains(r.date))
        .cloned()
        .collect()
}

/// Aggregate readings by day and locate the peak day
pub(crate) fn aggregate_daily(readings: &[ParsedReading]) -> DailySeries {
    let mut by_date: BTreeMap<NaiveDate, DailyAggregate> = BTreeMap::new();

    for reading in readings {
        by_date
            .entry(reading.date)
            .or_insert_with(|| DailyAggregate::new(reading.date))
            .add(reading);
    }

    let days: Vec<DailyAggregate> = by_date.into_values().collect();
    let peak = peak_date(&days);
    DailySeries { days, peak }
}

/// Date with the highest consumption; the earliest one wins a tie
fn peak_date(days: &[DailyAggregate]) -> Option<NaiveDate> {
    let mut peak: Option<&DailyAggregate> = None;
    for day in days {
        if peak.is_none_or(|p| day.consumption_kwh > p.consumption_kwh) {
            peak = Some(day);
        }
    }
    peak.map(|d| d.date)
}

/// Per-hour running sums: every reading is counted, only those with a value are averaged
#[derive(Debug, Default)]
struct HourTotals {
    sum: f64,
    measured: usize,
    readings: usize,
}

/// Mean consumption per hour of day; hours without readings are left out
pub(crate) fn aggregate_hourly(readings: &[ParsedReading]) -> Vec<HourlyAggregate> {
    let mut by_hour: BTreeMap<u32, HourTotals> = BTreeMap::new();

    for reading in readings {
        let totals = by_hour.entry(reading.hour).or_default();
        totals.readings += 1;
        if let Some(kwh) = reading.consumption_kwh {
            totals.sum += kwh;
            totals.measured += 1;
        }
    }

    by_hour
        .into_iter()
        .map(|(hour, totals)| HourlyAggregate {
            hour,
            average_kwh: (totals.measured > 0).then(|| totals.sum / totals.measured as f64),
            readings: totals.readings,
        })
        .collect()
}

pub(crate) fn categorize(readings: &[ParsedReading]) -> Vec<CategorizedReading<'_>> {
    readings
        .iter()
        .map(|reading| CategorizedReading {
            reading,
            category: TimeOfDay::from_hour(reading.hour),
        })
        .collect()
}

/// Sum consumption per time-of-day bucket, skipping empty buckets
pub(crate) fn aggregate_by_category(categorized: &[CategorizedReading<'_>]) -> Vec<CategoryAggregate> {
    let mut totals = CategoryTotals::default();
    for entry in categorized {
        totals.add(entry.category, entry.reading.kwh());
    }
    totals.into_aggregates()
}

/// Mean of the per-date consumption sums
fn daily_average(readings: &[ParsedReading]) -> Option<f64> {
    let days = aggregate_daily(readings).days;
    if days.is_empty() {
        return None;
    }
    let total: f64 = days.iter().map(|d| d.consumption_kwh).sum();
    Some(total / days.len() as f64)
}

pub(crate) fn summary_stats(all: &[ParsedReading], filtered: &[ParsedReading]) -> SummaryStats {
    SummaryStats {
        overall_daily_average: daily_average(all),
        period_daily_average: daily_average(filtered),
        period_total_consumption: filtered.iter().map(ParsedReading::kwh).sum(),
        period_total_cost: filtered.iter().map(|r| r.total_cost).sum(),
    }
}
