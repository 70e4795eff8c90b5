//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode, ConfigSortOrder};
use crate::consts::DEFAULT_CURRENCY;

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub(crate) enum SortOrder {
    /// Oldest first (default)
    #[default]
    Asc,
    /// Newest first
    Desc,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "kwhstats")]
#[command(about = "Residential energy consumption statistics from CSV meter readings", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// CSV file with "Data/Hora", "Consumo em kWh" and "Custo Total" columns (stdin when omitted or "-")
    #[arg(short, long, global = true, value_name = "PATH")]
    pub(crate) file: Option<PathBuf>,

    /// Start of the period (YYYYMMDD or YYYY-MM-DD), defaults to the first date in the data
    #[arg(short, long, global = true)]
    pub(crate) since: Option<String>,

    /// End of the period (YYYYMMDD or YYYY-MM-DD), defaults to the last date in the data
    #[arg(short, long, global = true)]
    pub(crate) until: Option<String>,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Output as CSV (single-table commands only)
    #[arg(long, global = true, conflicts_with = "json")]
    pub(crate) csv: bool,

    /// Sort order for dated and hourly rows
    #[arg(short, long, global = true, value_enum, default_value = "asc")]
    pub(crate) order: SortOrder,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Locale for number formatting (e.g., "en", "pt", "de")
    #[arg(long, global = true, value_name = "LOCALE")]
    pub(crate) locale: Option<String>,

    /// Currency symbol printed before costs (default "R$")
    #[arg(long, global = true, value_name = "SYMBOL")]
    pub(crate) currency: Option<String>,

    /// Field delimiter of the input CSV (default ",")
    #[arg(short, long, global = true, value_name = "CHAR")]
    pub(crate) delimiter: Option<char>,

    /// Read slash dates as DD/MM/YYYY instead of MM/DD/YYYY
    #[arg(long, global = true)]
    pub(crate) day_first: bool,

    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Enable debug output (show dropped rows and processing details)
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if !self.no_color && config.no_color {
            self.no_color = true;
        }

        // Enum values only apply while the CLI is still at its default
        if let Some(order) = config.order
            && self.order == SortOrder::Asc
        {
            self.order = match order {
                ConfigSortOrder::Asc => SortOrder::Asc,
                ConfigSortOrder::Desc => SortOrder::Desc,
            };
        }

        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        if self.locale.is_none() {
            self.locale = config.locale.clone();
        }
        if self.currency.is_none() {
            self.currency = config.currency.clone();
        }
        if self.delimiter.is_none() {
            self.delimiter = config.delimiter;
        }
        if !self.day_first && config.day_first {
            self.day_first = true;
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    pub(crate) fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.csv {
            OutputFormat::Csv
        } else {
            OutputFormat::Table
        }
    }

    pub(crate) fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    pub(crate) fn delimiter(&self) -> char {
        self.delimiter.unwrap_or(',')
    }
}
