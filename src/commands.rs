use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::engine::parser::{self, DataSource};
use crate::engine::schema::{self, BackfillReport};
use crate::errors::AppError;
use crate::models::record::VariableSet;
use crate::utils::export::{render_json, save_to_file};
use crate::utils::files::{file_name_of, list_data_files};
use crate::AppState;

/// One converted input file.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub records: usize,
}

/// Result of converting a folder.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionSummary {
    pub files: Vec<ConvertedFile>,
}

impl ConversionSummary {
    pub fn total_records(&self) -> usize {
        self.files.iter().map(|f| f.records).sum()
    }
}

// ── Conversion Commands ──

/// Convert one dictionary-of-records file into an R-ready record array.
///
/// The output is named `name` if given, otherwise the configured prefix plus
/// the input file name, and lands in the optional `into` subfolder.
pub fn convert_file<W: Write>(
    state: &mut AppState<W>,
    path: &Path,
    name: Option<&str>,
    into: Option<&str>,
) -> Result<ConvertedFile, AppError> {
    let records = parser::to_records(
        DataSource::Path(path.to_path_buf()),
        state.config.convert_time,
        &state.config.date_field,
    )?;
    let payload = render_json(&records, state.config.format)?;

    let file_name = match name {
        Some(n) => n.to_string(),
        None => state.config.output_file_name(&file_name_of(path)?),
    };
    let output = save_to_file(&payload, &file_name, into, &state.layout, &mut state.printer)?;

    info!(
        "Converted {} ({} records) -> {}",
        path.display(),
        records.len(),
        output.display()
    );

    Ok(ConvertedFile {
        source: path.to_path_buf(),
        output,
        records: records.len(),
    })
}

/// Convert every data file in `folder`, one output file per input file.
pub fn convert_folder<W: Write>(
    state: &mut AppState<W>,
    folder: &Path,
    into: Option<&str>,
) -> Result<ConversionSummary, AppError> {
    let target = state.layout.target_dir(into)?;
    let files = list_data_files(folder, &state.config)?;
    let total = files.len();
    info!("Converting {} files from {}", total, folder.display());

    let mut summary = ConversionSummary::default();
    for (i, path) in files.iter().enumerate() {
        state.printer.progress(&format!(
            "Converting file {}/{}: {}",
            i + 1,
            total,
            file_name_of(path)?
        ));
        summary.files.push(convert_file(state, path, None, into)?);
    }

    state.printer.message(&format!(
        "Converted {} files ({} records) into {}",
        total,
        summary.total_records(),
        target.display()
    ));
    Ok(summary)
}

// ── Schema Commands ──

/// Union of field names across a folder's files.
pub fn get_data_vars<W: Write>(
    state: &mut AppState<W>,
    folder: &Path,
) -> Result<VariableSet, AppError> {
    schema::collect_variables(folder, &state.config)
}

/// Backfill missing fields with `null` across every file of `folder`, in place.
pub fn add_nas<W: Write>(state: &mut AppState<W>, folder: &Path) -> Result<BackfillReport, AppError> {
    let report = schema::backfill_folder(folder, &state.config)?;
    state.printer.message(&format!(
        "Backfilled {} null fields over {} records in {} files ({} variables)",
        report.fields_added,
        report.records,
        report.files.len(),
        report.variables.len()
    ));
    Ok(report)
}

/// Backfill a folder, then convert it.
pub fn prepare_folder<W: Write>(
    state: &mut AppState<W>,
    folder: &Path,
    into: Option<&str>,
) -> Result<(BackfillReport, ConversionSummary), AppError> {
    let report = add_nas(state, folder)?;
    let summary = convert_folder(state, folder, into)?;
    Ok((report, summary))
}
