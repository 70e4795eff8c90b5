//! Core module - the consumption analysis pipeline

mod aggregator;
mod analysis;
mod parser;
mod types;

pub(crate) use aggregator::categorize;
pub(crate) use analysis::{Analysis, analyze};
pub(crate) use parser::{ParseOptions, parse_readings};
pub(crate) use types::{
    CategoryAggregate, DailyAggregate, DailySeries, DateRange, HourlyAggregate, LoadResult,
    ParsedReading, SummaryStats, TimeOfDay,
};
