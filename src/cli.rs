//! Command line surface of the `rformat` binary.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::commands;
use crate::errors::AppError;
use crate::models::config::{FormatterConfig, OutputFormat};
use crate::AppState;

/// Reformat scraped product JSON into R-ready datasets
///
/// Input files are JSON objects mapping ids to product records. Converted
/// files are record arrays written under <root>/R_analysis/R_formatted_data.
#[derive(Parser, Debug)]
#[command(name = "rformat", version, about, long_about = None)]
pub struct Cli {
    /// Project root the output folder is created in
    #[arg(long, global = true, value_name = "DIR", default_value = ".", value_hint = ValueHint::DirPath)]
    pub root: PathBuf,

    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Keep sub-second precision in the date field
    #[arg(long, global = true)]
    pub keep_time: bool,

    /// Output layout: compact or pretty
    #[arg(long, global = true, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Suppress status messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Convert a single file
    Convert {
        #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Output file name (default: prefix + input name)
        #[arg(long)]
        name: Option<String>,
        /// Subfolder of the output folder
        #[arg(long, value_name = "SUBFOLDER")]
        into: Option<String>,
    },
    /// Convert every file of a folder
    ConvertFolder {
        #[arg(value_name = "FOLDER", value_hint = ValueHint::DirPath)]
        folder: PathBuf,
        /// Subfolder of the output folder
        #[arg(long, value_name = "SUBFOLDER")]
        into: Option<String>,
    },
    /// List the variables found across a folder
    Vars {
        #[arg(value_name = "FOLDER", value_hint = ValueHint::DirPath)]
        folder: PathBuf,
    },
    /// Fill missing variables with null in every file of a folder, in place
    Backfill {
        #[arg(value_name = "FOLDER", value_hint = ValueHint::DirPath)]
        folder: PathBuf,
    },
    /// Backfill a folder, then convert it
    Prepare {
        #[arg(value_name = "FOLDER", value_hint = ValueHint::DirPath)]
        folder: PathBuf,
        /// Subfolder of the output folder
        #[arg(long, value_name = "SUBFOLDER")]
        into: Option<String>,
    },
}

impl Cli {
    /// Effective configuration: the config file (or defaults) with flags applied.
    pub fn config(&self) -> Result<FormatterConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => FormatterConfig::load(path)?,
            None => FormatterConfig::default(),
        };
        if self.keep_time {
            config.convert_time = false;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        Ok(config)
    }
}

/// Run one command. Command output (not status) goes to `out`.
pub fn execute<W: Write, O: Write>(
    command: &Command,
    state: &mut AppState<W>,
    out: &mut O,
) -> Result<(), AppError> {
    match command {
        Command::Convert { file, name, into } => {
            commands::convert_file(state, file, name.as_deref(), into.as_deref())?;
        }
        Command::ConvertFolder { folder, into } => {
            commands::convert_folder(state, folder, into.as_deref())?;
        }
        Command::Vars { folder } => {
            let vars = commands::get_data_vars(state, folder)?;
            for name in vars.iter() {
                writeln!(out, "{}", name).map_err(|e| AppError::FileWrite(e.to_string()))?;
            }
        }
        Command::Backfill { folder } => {
            commands::add_nas(state, folder)?;
        }
        Command::Prepare { folder, into } => {
            commands::prepare_folder(state, folder, into.as_deref())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::terminal::TerminalPrinter;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_prepare_with_globals() {
        let cli = Cli::try_parse_from([
            "rformat",
            "prepare",
            "data/to_transform",
            "--into",
            "data3",
            "--root",
            "/repo",
            "--keep-time",
            "-q",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Prepare {
                folder: PathBuf::from("data/to_transform"),
                into: Some("data3".into()),
            }
        );
        assert_eq!(cli.root, PathBuf::from("/repo"));
        assert!(cli.quiet);

        let config = cli.config().unwrap();
        assert!(!config.convert_time);
    }

    #[test]
    fn test_parse_format_flag() {
        let cli = Cli::try_parse_from(["rformat", "--format", "pretty", "vars", "in"]).unwrap();
        assert_eq!(cli.config().unwrap().format, OutputFormat::Pretty);
        assert_eq!(cli.root, PathBuf::from("."));

        assert!(Cli::try_parse_from(["rformat", "--format", "xml", "vars", "in"]).is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from(["rformat", "--config", "/no/such/rformat.json", "vars", "in"])
            .unwrap();
        assert_eq!(cli.config().unwrap_err().code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn test_execute_vars_writes_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), r#"{"1": {"sku": "A", "date": "d"}}"#).unwrap();
        std::fs::write(dir.path().join("b.json"), r#"{"1": {"price": 1}}"#).unwrap();

        let mut state = AppState::new(
            dir.path(),
            FormatterConfig::default(),
            TerminalPrinter::new(Vec::<u8>::new()),
        );
        let mut out: Vec<u8> = Vec::new();
        execute(
            &Command::Vars {
                folder: dir.path().to_path_buf(),
            },
            &mut state,
            &mut out,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "sku\ndate\nprice\n");
    }
}
