mod csv;
mod format;
mod json;
mod table;

pub(crate) use self::csv::{
    output_daily_csv, output_hourly_csv, output_periods_csv, output_readings_csv,
    output_summary_csv,
};
pub(crate) use format::NumberFormat;
pub(crate) use json::{
    output_daily_json, output_hourly_json, output_periods_json, output_readings_json,
    output_report_json, output_summary_json,
};
pub(crate) use table::{
    TableOptions, print_category_table, print_daily_table, print_hourly_table,
    print_readings_table, print_report, print_summary_line, print_summary_table,
};
