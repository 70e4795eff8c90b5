//! CLI subcommand definitions

use clap::Subcommand;

/// Main CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Subcommand)]
pub(crate) enum Commands {
    /// Show every table and the summary (default)
    #[default]
    Report,
    /// Show total consumption and cost per day, with the peak day marked
    Daily,
    /// Show average consumption per hour of day
    Hourly,
    /// Show consumption split by time of day (Madrugada, Pico, Noturno)
    Periods,
    /// Show daily averages and period totals
    Summary,
    /// List the parsed readings in the selected range
    Readings,
}

impl Commands {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Commands::Report => "report",
            Commands::Daily => "daily",
            Commands::Hourly => "hourly",
            Commands::Periods => "periods",
            Commands::Summary => "summary",
            Commands::Readings => "readings",
        }
    }
}

/// Resolve the optional subcommand, `report` when none was given
pub(crate) fn parse_command(cmd: Option<Commands>) -> Commands {
    cmd.unwrap_or_default()
}
