use serde::Serialize;
use serde_json::json;

use crate::cli::SortOrder;
use crate::core::{
    Analysis, CategoryAggregate, DailyAggregate, DailySeries, DateRange, HourlyAggregate,
    ParsedReading, SummaryStats, categorize,
};
use crate::error::AppError;

/// Daily row with its peak flag, as emitted in JSON and CSV
#[derive(Debug, Serialize)]
pub(super) struct DailyRow<'a> {
    #[serde(flatten)]
    pub(super) day: &'a DailyAggregate,
    pub(super) peak: bool,
}

pub(super) fn daily_rows(daily: &DailySeries, order: SortOrder) -> Vec<DailyRow<'_>> {
    let mut rows: Vec<DailyRow<'_>> = daily
        .days
        .iter()
        .map(|day| DailyRow {
            day,
            peak: daily.peak == Some(day.date),
        })
        .collect();
    if order == SortOrder::Desc {
        rows.reverse();
    }
    rows
}

fn ordered<T: Clone>(items: &[T], order: SortOrder) -> Vec<T> {
    let mut rows = items.to_vec();
    if order == SortOrder::Desc {
        rows.reverse();
    }
    rows
}

pub(crate) fn output_daily_json(daily: &DailySeries, order: SortOrder) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(&daily_rows(daily, order))?)
}

pub(crate) fn output_hourly_json(
    hourly: &[HourlyAggregate],
    order: SortOrder,
) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(&ordered(hourly, order))?)
}

pub(crate) fn output_periods_json(categories: &[CategoryAggregate]) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(categories)?)
}

pub(crate) fn output_summary_json(
    summary: &SummaryStats,
    range: &DateRange,
) -> Result<String, AppError> {
    let output = json!({
        "start": range.start,
        "end": range.end,
        "overall_daily_average": summary.overall_daily_average,
        "period_daily_average": summary.period_daily_average,
        "period_total_consumption": summary.period_total_consumption,
        "period_total_cost": summary.period_total_cost,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

pub(crate) fn output_readings_json(
    readings: &[ParsedReading],
    order: SortOrder,
) -> Result<String, AppError> {
    let categorized = ordered(&categorize(readings), order);
    Ok(serde_json::to_string_pretty(&categorized)?)
}

pub(crate) fn output_report_json(
    analysis: &Analysis,
    skipped: usize,
    order: SortOrder,
) -> Result<String, AppError> {
    let output = json!({
        "start": analysis.range.start,
        "end": analysis.range.end,
        "readings": analysis.readings.len(),
        "skipped_rows": skipped,
        "peak_day": analysis.daily.peak,
        "daily": daily_rows(&analysis.daily, order),
        "hourly": ordered(&analysis.hourly, order),
        "periods": analysis.categories,
        "summary": analysis.summary,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DateRange, ParseOptions, analyze, parse_readings};
    use serde_json::Value;

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
    fn daily_json_marks_peak() {
        let json: Value =
            serde_json::from_str(&output_daily_json(&analysis().daily, SortOrder::Asc).unwrap())
                .unwrap();
        let arr = json.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["date"], "2024-01-01");
        assert_eq!(arr[0]["consumption_kwh"].as_f64(), Some(10.0));
        assert_eq!(arr[0]["peak"], false);
        assert_eq!(arr[1]["peak"], true);
    }

    #[test]
    fn daily_json_desc_order() {
        let json: Value =
            serde_json::from_str(&output_daily_json(&analysis().daily, SortOrder::Desc).unwrap())
                .unwrap();
        assert_eq!(json[0]["date"], "2024-01-02");
    }

    #[test]
    fn periods_json_uses_labels() {
        let json: Value =
            serde_json::from_str(&output_periods_json(&analysis().categories).unwrap()).unwrap();
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["category"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Madrugada", "Pico", "Noturno"]);
    }

    #[test]
    fn readings_json_flattens_category() {
        let analysis = analysis();
        let json: Value =
            serde_json::from_str(&output_readings_json(&analysis.readings, SortOrder::Asc).unwrap())
                .unwrap();
        assert_eq!(json[0]["hour"], 3);
        assert_eq!(json[0]["category"], "Madrugada");
        assert_eq!(json[0]["date"], "2024-01-01");
    }

    #[test]
    fn report_json_contains_every_table() {
        let json: Value =
            serde_json::from_str(&output_report_json(&analysis(), 2, SortOrder::Asc).unwrap())
                .unwrap();
        assert_eq!(json["peak_day"], "2024-01-02");
        assert_eq!(json["skipped_rows"], 2);
        assert_eq!(json["readings"], 3);
        assert_eq!(json["daily"].as_array().unwrap().len(), 2);
        assert_eq!(json["hourly"].as_array().unwrap().len(), 3);
        assert_eq!(json["periods"].as_array().unwrap().len(), 3);
        assert_eq!(json["summary"]["period_total_consumption"].as_f64(), Some(25.0));
    }

    #[test]
    fn summary_json_null_average_for_empty_period() {
        let summary = SummaryStats {
            overall_daily_average: Some(1.0),
            period_daily_average: None,
            period_total_consumption: 0.0,
            period_total_cost: 0.0,
        };
        let range = analysis().range;
        let json: Value =
            serde_json::from_str(&output_summary_json(&summary, &range).unwrap()).unwrap();
        assert!(json["period_daily_average"].is_null());
        assert_eq!(json["start"], "2024-01-01");
    }

    #[test]
    fn empty_period_still_renders_documents() {
        let csv = "Data/Hora,Consumo em kWh,Custo Total\n2024-01-01 03:00,4,2\n";
        let loaded = parse_readings(csv.as_bytes(), ParseOptions::default()).unwrap();
        let start = chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let range = DateRange::new(start, start).unwrap();
        let analysis = analyze(&loaded.readings, range);

        let daily: Value =
            serde_json::from_str(&output_daily_json(&analysis.daily, SortOrder::Asc).unwrap())
                .unwrap();
        assert_eq!(daily, Value::Array(vec![]));

        let summary: Value = serde_json::from_str(
            &output_summary_json(&analysis.summary, &analysis.range).unwrap(),
        )
        .unwrap();
        assert!(summary["period_daily_average"].is_null());
        assert_eq!(summary["overall_daily_average"].as_f64(), Some(4.0));

        let report: Value =
            serde_json::from_str(&output_report_json(&analysis, 0, SortOrder::Asc).unwrap())
                .unwrap();
        assert!(report["peak_day"].is_null());
        assert_eq!(report["readings"], 0);
    }
}
