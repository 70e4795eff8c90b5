mod app;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod output;
mod utils;

use clap::Parser;

use cli::Cli;
use config::Config;
use error::AppError;
use utils::init_logging;

fn run(cli: Cli) -> Result<(), AppError> {
    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let cli = cli.with_config(&config);
    app::run(&cli)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
