use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::cli::{Cli, Commands, OutputFormat, parse_command};
use crate::core::{Analysis, DateRange, LoadResult, ParseOptions, analyze, parse_readings};
use crate::error::AppError;
use crate::output::{
    NumberFormat, TableOptions, output_daily_csv, output_daily_json, output_hourly_csv,
    output_hourly_json, output_periods_csv, output_periods_json, output_readings_csv,
    output_readings_json, output_report_json, output_summary_csv, output_summary_json,
    print_category_table, print_daily_table, print_hourly_table, print_readings_table,
    print_report, print_summary_line, print_summary_table,
};
use crate::utils::parse_date;

fn delimiter_byte(delimiter: char) -> Result<u8, AppError> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(AppError::InvalidDelimiter { input: delimiter })
}

/// Read the meter export from a file, or stdin when no path (or "-") is given
fn load_input(path: Option<&Path>, options: ParseOptions) -> Result<LoadResult, AppError> {
    let input: Box<dyn Read> = match path {
        Some(p) if p != Path::new("-") => {
            let file = File::open(p).map_err(|source| AppError::Io {
                path: p.display().to_string(),
                source,
            })?;
            Box::new(file)
        }
        _ => Box::new(io::stdin().lock()),
    };
    parse_readings(input, options)
}

/// Tell the user nothing matched, keeping stdout clean when it carries JSON or CSV
fn report_empty(format: OutputFormat, message: &str) {
    match format {
        OutputFormat::Table => println!("{message}"),
        OutputFormat::Json | OutputFormat::Csv => eprintln!("{message}"),
    }
}

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) loaded: &'a LoadResult,
    pub(crate) analysis: &'a Analysis,
    pub(crate) table: TableOptions<'a>,
}

fn render_table(command: Commands, ctx: &CommandContext<'_>) {
    let analysis = ctx.analysis;
    let opts = &ctx.table;
    match command {
        Commands::Report => print_report(analysis, opts),
        Commands::Daily => print_daily_table(&analysis.daily, opts),
        Commands::Hourly => print_hourly_table(&analysis.hourly, opts),
        Commands::Periods => print_category_table(&analysis.categories, opts),
        Commands::Summary => print_summary_table(&analysis.summary, &analysis.range, opts),
        Commands::Readings => print_readings_table(&analysis.readings, opts),
    }
    print_summary_line(
        ctx.loaded.readings.len(),
        ctx.loaded.skipped,
        opts.number_format,
        opts.use_color,
    );
}

fn render_json(command: Commands, ctx: &CommandContext<'_>) -> Result<String, AppError> {
    let analysis = ctx.analysis;
    let order = ctx.cli.order;
    match command {
        Commands::Report => output_report_json(analysis, ctx.loaded.skipped, order),
        Commands::Daily => output_daily_json(&analysis.daily, order),
        Commands::Hourly => output_hourly_json(&analysis.hourly, order),
        Commands::Periods => output_periods_json(&analysis.categories),
        Commands::Summary => output_summary_json(&analysis.summary, &analysis.range),
        Commands::Readings => output_readings_json(&analysis.readings, order),
    }
}

fn render_csv(command: Commands, ctx: &CommandContext<'_>) -> Result<String, AppError> {
    let analysis = ctx.analysis;
    let order = ctx.cli.order;
    match command {
        Commands::Report => Err(AppError::UnsupportedFormat {
            command: command.name(),
        }),
        Commands::Daily => output_daily_csv(&analysis.daily, order),
        Commands::Hourly => output_hourly_csv(&analysis.hourly, order),
        Commands::Periods => output_periods_csv(&analysis.categories),
        Commands::Summary => output_summary_csv(&analysis.summary, &analysis.range),
        Commands::Readings => output_readings_csv(&analysis.readings, order),
    }
}

/// Load, analyze and print according to the parsed command line
pub(crate) fn run(cli: &Cli) -> Result<(), AppError> {
    let command = parse_command(cli.command);
    let format = cli.output_format();
    if format == OutputFormat::Csv && command == Commands::Report {
        return Err(AppError::UnsupportedFormat {
            command: command.name(),
        });
    }

    let number_format = NumberFormat::from_locale(cli.locale.as_deref())?;
    let options = ParseOptions {
        delimiter: delimiter_byte(cli.delimiter())?,
        day_first: cli.day_first,
    };
    let since = cli.since.as_deref().map(parse_date).transpose()?;
    let until = cli.until.as_deref().map(parse_date).transpose()?;

    let loaded = load_input(cli.file.as_deref(), options)?;
    let Some(range) = DateRange::resolve(since, until, &loaded.readings)? else {
        report_empty(format, "No readings found.");
        return Ok(());
    };

    // JSON and CSV still get a (possibly empty) document so stdout stays parseable
    let analysis = analyze(&loaded.readings, range);
    if analysis.readings.is_empty() && format == OutputFormat::Table {
        report_empty(
            format,
            &format!("No readings found between {} and {}.", range.start, range.end),
        );
        return Ok(());
    }

    let ctx = CommandContext {
        cli,
        loaded: &loaded,
        analysis: &analysis,
        table: TableOptions {
            order: cli.order,
            use_color: cli.use_color(),
            number_format,
            currency: cli.currency(),
        },
    };

    match format {
        OutputFormat::Table => render_table(command, &ctx),
        OutputFormat::Json => println!("{}", render_json(command, &ctx)?),
        OutputFormat::Csv => print!("{}", render_csv(command, &ctx)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_must_be_ascii() {
        assert_eq!(delimiter_byte(';').unwrap(), b';');
        assert_eq!(delimiter_byte('\t').unwrap(), b'\t');
        assert!(matches!(
            delimiter_byte('é'),
            Err(AppError::InvalidDelimiter { input: 'é' })
        ));
    }

    #[test]
    fn load_input_missing_file_names_path() {
        let err = load_input(
            Some(Path::new("/nonexistent/readings.csv")),
            ParseOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/readings.csv"));
    }
}
