use comfy_table::{Cell, Color};

use crate::cli::SortOrder;
use crate::core::{
    Analysis, CategoryAggregate, DailySeries, DateRange, HourlyAggregate, ParsedReading,
    SummaryStats, categorize,
};
use crate::output::format::{
    BAR_WIDTH, NumberFormat, bar, create_styled_table, format_cost, format_decimal, format_number,
    format_optional, format_percent, header_cell, right_cell, styled_cell,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions<'a> {
    pub(crate) order: SortOrder,
    pub(crate) use_color: bool,
    pub(crate) number_format: NumberFormat,
    pub(crate) currency: &'a str,
}

impl TableOptions<'_> {
    fn color(&self, color: Color) -> Option<Color> {
        self.use_color.then_some(color)
    }
}

/// Print the summary line below the tables
pub(crate) fn print_summary_line(
    valid: usize,
    skipped: usize,
    number_format: NumberFormat,
    use_color: bool,
) {
    let stats_text = format!(
        "{} readings ({} rows dropped)",
        format_number(valid as i64, number_format),
        format_number(skipped as i64, number_format)
    );
    if use_color && skipped > 0 {
        println!("\n  {stats_text} | \x1b[33mrun with --debug to list dropped rows\x1b[0m\n");
    } else {
        println!("\n  {stats_text}\n");
    }
}

fn ordered<T>(items: &[T], order: SortOrder) -> Vec<&T> {
    let mut rows: Vec<&T> = items.iter().collect();
    if order == SortOrder::Desc {
        rows.reverse();
    }
    rows
}

fn print_titled(title: &str, table: &comfy_table::Table) {
    println!("\n  {title}\n");
    println!("{table}");
}

pub(crate) fn print_daily_table(daily: &DailySeries, opts: &TableOptions<'_>) {
    let c = opts.use_color;
    let nf = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Date", c),
        header_cell("Readings", c),
        header_cell("kWh", c),
        header_cell("Cost", c),
        header_cell("", c),
    ]);

    let max = daily.peak_day().map_or(0.0, |d| d.consumption_kwh);
    let peak_color = opts.color(Color::Yellow);
    let cost_color = opts.color(Color::Green);

    for day in ordered(&daily.days, opts.order) {
        let is_peak = daily.peak == Some(day.date);
        let mut chart = bar(day.consumption_kwh, max, BAR_WIDTH);
        if is_peak {
            chart.push_str(" ◀ peak");
        }
        table.add_row(vec![
            styled_cell(&day.date.to_string(), if is_peak { peak_color } else { None }, is_peak),
            right_cell(&format_number(day.readings as i64, nf), None, false),
            right_cell(&format_decimal(day.consumption_kwh, nf), None, is_peak),
            right_cell(&format_cost(day.total_cost, opts.currency, nf), cost_color, false),
            styled_cell(&chart, if is_peak { peak_color } else { None }, false),
        ]);
    }

    let cyan = opts.color(Color::Cyan);
    let readings: usize = daily.days.iter().map(|d| d.readings).sum();
    table.add_row(vec![
        styled_cell("TOTAL", cyan, true),
        right_cell(&format_number(readings as i64, nf), cyan, true),
        right_cell(&format_decimal(daily.total_consumption(), nf), cyan, true),
        right_cell(&format_cost(daily.total_cost(), opts.currency, nf), cost_color, true),
        Cell::new(""),
    ]);

    print_titled("Daily Consumption", &table);
}

pub(crate) fn print_hourly_table(hourly: &[HourlyAggregate], opts: &TableOptions<'_>) {
    let c = opts.use_color;
    let nf = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Hour", c),
        header_cell("Readings", c),
        header_cell("Avg kWh", c),
        header_cell("", c),
    ]);

    let max = hourly
        .iter()
        .filter_map(|h| h.average_kwh)
        .fold(0.0, f64::max);
    for entry in ordered(hourly, opts.order) {
        table.add_row(vec![
            Cell::new(format!("{:02}:00", entry.hour)),
            right_cell(&format_number(entry.readings as i64, nf), None, false),
            right_cell(&format_optional(entry.average_kwh, nf), None, false),
            Cell::new(bar(entry.average_kwh.unwrap_or(0.0), max, BAR_WIDTH)),
        ]);
    }

    print_titled("Average Consumption by Hour", &table);
}

pub(crate) fn print_category_table(categories: &[CategoryAggregate], opts: &TableOptions<'_>) {
    let c = opts.use_color;
    let nf = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Period", c),
        header_cell("Hours", c),
        header_cell("kWh", c),
        header_cell("Share", c),
        header_cell("", c),
    ]);

    for entry in categories {
        table.add_row(vec![
            Cell::new(entry.category.label()),
            Cell::new(entry.category.hours()),
            right_cell(&format_decimal(entry.consumption_kwh, nf), None, false),
            right_cell(&format_percent(entry.share_pct, nf), opts.color(Color::Green), false),
            Cell::new(bar(entry.share_pct, 100.0, BAR_WIDTH)),
        ]);
    }

    let cyan = opts.color(Color::Cyan);
    let total: f64 = categories.iter().map(|e| e.consumption_kwh).sum();
    table.add_row(vec![
        styled_cell("TOTAL", cyan, true),
        Cell::new(""),
        right_cell(&format_decimal(total, nf), cyan, true),
        Cell::new(""),
        Cell::new(""),
    ]);

    print_titled("Consumption by Time of Day", &table);
}

pub(crate) fn print_summary_table(
    summary: &SummaryStats,
    range: &DateRange,
    opts: &TableOptions<'_>,
) {
    let c = opts.use_color;
    let nf = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![header_cell("Metric", c), header_cell("Value", c)]);

    let rows = [
        (
            "Daily average (all data)",
            format!("{} kWh", format_optional(summary.overall_daily_average, nf)),
        ),
        (
            "Daily average (period)",
            format!("{} kWh", format_optional(summary.period_daily_average, nf)),
        ),
        (
            "Total consumption",
            format!("{} kWh", format_decimal(summary.period_total_consumption, nf)),
        ),
        (
            "Total cost",
            format_cost(summary.period_total_cost, opts.currency, nf),
        ),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), right_cell(&value, None, false)]);
    }

    print_titled(&format!("Summary {} to {}", range.start, range.end), &table);
}

pub(crate) fn print_readings_table(readings: &[ParsedReading], opts: &TableOptions<'_>) {
    let c = opts.use_color;
    let nf = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Timestamp", c),
        header_cell("Period", c),
        header_cell("kWh", c),
        header_cell("Cost", c),
    ]);

    let categorized = categorize(readings);
    for entry in ordered(&categorized, opts.order) {
        table.add_row(vec![
            Cell::new(entry.reading.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::new(entry.category.label()),
            right_cell(&format_optional(entry.reading.consumption_kwh, nf), None, false),
            right_cell(
                &format_cost(entry.reading.total_cost, opts.currency, nf),
                opts.color(Color::Green),
                false,
            ),
        ]);
    }

    print_titled("Readings", &table);
}

/// Every table of the analysis, one after another
pub(crate) fn print_report(analysis: &Analysis, opts: &TableOptions<'_>) {
    print_daily_table(&analysis.daily, opts);
    print_hourly_table(&analysis.hourly, opts);
    print_category_table(&analysis.categories, opts);
    print_summary_table(&analysis.summary, &analysis.range, opts);
}
