//! One full pass of the pipeline over a date range

use crate::core::aggregator::{
    aggregate_by_category, aggregate_daily, aggregate_hourly, categorize, filter_by_date_range,
    summary_stats,
};
use crate::core::types::{
    CategoryAggregate, DailySeries, DateRange, HourlyAggregate, ParsedReading, SummaryStats,
};

/// Every derived table for one selected period
#[derive(Debug)]
pub(crate) struct Analysis {
    pub(crate) range: DateRange,
    pub(crate) readings: Vec<ParsedReading>,
    pub(crate) daily: DailySeries,
    pub(crate) hourly: Vec<HourlyAggregate>,
    pub(crate) categories: Vec<CategoryAggregate>,
    pub(crate) summary: SummaryStats,
}

pub(crate) fn analyze(all: &[ParsedReading], range: DateRange) -> Analysis {
    let readings = filter_by_date_range(all, &range);
    tracing::debug!(
        start = %range.start,
        end = %range.end,
        selected = readings.len(),
        total = all.len(),
        "filtered readings"
    );

    let daily = aggregate_daily(&readings);
    let hourly = aggregate_hourly(&readings);
    let categories = aggregate_by_category(&categorize(&readings));
    let summary = summary_stats(all, &readings);

    Analysis {
        range,
        readings,
        daily,
        hourly,
        categories,
        summary,
    }
}
