use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::cli::SortOrder;
use crate::core::{
    CategoryAggregate, DailySeries, DateRange, HourlyAggregate, ParsedReading, SummaryStats,
    TimeOfDay, categorize,
};
use crate::error::AppError;
use crate::output::json::daily_rows;

#[derive(Serialize)]
struct DailyCsvRow {
    date: NaiveDate,
    consumption_kwh: f64,
    total_cost: f64,
    readings: usize,
    peak: bool,
}

#[derive(Serialize)]
struct SummaryCsvRow {
    start: NaiveDate,
    end: NaiveDate,
    overall_daily_average: Option<f64>,
    period_daily_average: Option<f64>,
    period_total_consumption: f64,
    period_total_cost: f64,
}

#[derive(Serialize)]
struct ReadingCsvRow {
    timestamp: NaiveDateTime,
    date: NaiveDate,
    hour: u32,
    consumption_kwh: Option<f64>,
    total_cost: f64,
    category: TimeOfDay,
}

/// Serialize rows with a header derived from the row type's field names
fn write_rows<T, I>(rows: I) -> Result<String, AppError>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| AppError::Io {
        path: "<csv buffer>".to_string(),
        source: e.into_error(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub(crate) fn output_daily_csv(daily: &DailySeries, order: SortOrder) -> Result<String, AppError> {
    write_rows(daily_rows(daily, order).into_iter().map(|row| DailyCsvRow {
        date: row.day.date,
        consumption_kwh: row.day.consumption_kwh,
        total_cost: row.day.total_cost,
        readings: row.day.readings,
        peak: row.peak,
    }))
}

pub(crate) fn output_hourly_csv(
    hourly: &[HourlyAggregate],
    order: SortOrder,
) -> Result<String, AppError> {
    let mut rows: Vec<&HourlyAggregate> = hourly.iter().collect();
    if order == SortOrder::Desc {
        rows.reverse();
    }
    write_rows(rows)
}

pub(crate) fn output_periods_csv(categories: &[CategoryAggregate]) -> Result<String, AppError> {
    write_rows(categories)
}

pub(crate) fn output_summary_csv(
    summary: &SummaryStats,
    range: &DateRange,
) -> Result<String, AppError> {
    write_rows([SummaryCsvRow {
        start: range.start,
        end: range.end,
        overall_daily_average: summary.overall_daily_average,
        period_daily_average: summary.period_daily_average,
        period_total_consumption: summary.period_total_consumption,
        period_total_cost: summary.period_total_cost,
    }])
}

pub(crate) fn output_readings_csv(
    readings: &[ParsedReading],
    order: SortOrder,
) -> Result<String, AppError> {
    let mut rows: Vec<ReadingCsvRow> = categorize(readings)
        .into_iter()
        .map(|entry| ReadingCsvRow {
            timestamp: entry.reading.timestamp,
            date: entry.reading.date,
            hour: entry.reading.hour,
            consumption_kwh: entry.reading.consumption_kwh,
            total_cost: entry.reading.total_cost,
            category: entry.category,
        })
        .collect();
    if order == SortOrder::Desc {
        rows.reverse();
    }
    write_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Analysis, ParseOptions, analyze, parse_readings};

    fn analysis() -> Analysis {
        let csv = "Data/Hora,Consumo em kWh,Custo Total\n\
            2024-01-01 03:00,4,2\n\
            2024-01-01 18:00,6,3\n\
            2024-01-02 06:00,15,7.5\n";
        let loaded = parse_readings(csv.as_bytes(), ParseOptions::default()).unwrap();
        let range = DateRange::spanning(&loaded.readings).unwrap();
        analyze(&loaded.readings, range)
    }

    #[test]
    fn daily_csv_has_header_and_peak_flag() {
        let out = output_daily_csv(&analysis().daily, SortOrder::Asc).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "date,consumption_kwh,total_cost,readings,peak");
        assert_eq!(lines[1], "2024-01-01,10.0,5.0,2,false");
        assert_eq!(lines[2], "2024-01-02,15.0,7.5,1,true");
    }

    #[test]
    fn hourly_csv_desc() {
        let out = output_hourly_csv(&analysis().hourly, SortOrder::Desc).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "hour,average_kwh,readings");
        assert_eq!(lines[1], "18,6.0,1");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn periods_csv_names_categories() {
        let out = output_periods_csv(&analysis().categories).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "category,consumption_kwh,share_pct");
        assert!(lines[1].starts_with("Madrugada,4.0,"));
        assert!(lines[3].starts_with("Noturno,6.0,"));
    }

    #[test]
    fn summary_csv_single_row() {
        let analysis = analysis();
        let out = output_summary_csv(&analysis.summary, &analysis.range).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("2024-01-01,2024-01-02,"));
    }

    #[test]
    fn readings_csv_includes_category() {
        let analysis = analysis();
        let out = output_readings_csv(&analysis.readings, SortOrder::Asc).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "timestamp,date,hour,consumption_kwh,total_cost,category"
        );
        assert_eq!(lines[1], "2024-01-01T03:00:00,2024-01-01,3,4.0,2.0,Madrugada");
    }

    #[test]
    fn readings_csv_leaves_missing_consumption_blank() {
        let csv = "Data/Hora,Consumo em kWh,Custo Total\n2024-01-01 10:00,,1.5\n";
        let loaded = parse_readings(csv.as_bytes(), ParseOptions::default()).unwrap();
        let out = output_readings_csv(&loaded.readings, SortOrder::Asc).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "2024-01-01T10:00:00,2024-01-01,10,,1.5,Pico");
    }
}

