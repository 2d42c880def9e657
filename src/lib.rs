pub mod cli;
pub mod commands;
pub mod engine;
pub mod errors;
pub mod models;
pub mod utils;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::errors::AppError;
use crate::models::config::{FormatterConfig, OutputLayout};
use crate::utils::terminal::TerminalPrinter;

/// State shared by every command of a run.
pub struct AppState<W: Write = io::Stdout> {
    pub config: FormatterConfig,
    /// Output locations, resolved against the root given at startup.
    pub layout: OutputLayout,
    pub printer: TerminalPrinter<W>,
}

impl<W: Write> AppState<W> {
    pub fn new(root: impl Into<PathBuf>, config: FormatterConfig, printer: TerminalPrinter<W>) -> Self {
        let layout = OutputLayout::new(root, &config);
        Self {
            config,
            layout,
            printer,
        }
    }
}

/// Parse the command line and run the selected command.
pub fn run() -> Result<(), AppError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;

    let mut printer = TerminalPrinter::stdout();
    printer.set_quiet(cli.quiet);

    let mut state = AppState::new(&cli.root, config, printer);
    info!(
        "Starting rformat: root={}, output={}",
        state.layout.root().display(),
        state.layout.data_dir().display()
    );

    cli::execute(&cli.command, &mut state, &mut io::stdout())
}
