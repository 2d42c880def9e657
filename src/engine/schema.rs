use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::config::FormatterConfig;
use crate::models::record::{Dataset, VariableSet};
use crate::utils::export::{overwrite_file, render_json};
use crate::utils::files::list_data_files;

/// Outcome of a folder backfill.
#[derive(Debug, Clone, Serialize)]
pub struct BackfillReport {
    /// Union of field names every record now carries.
    pub variables: VariableSet,
    pub files: Vec<PathBuf>,
    pub records: usize,
    /// Number of `null` placeholders inserted across all files.
    pub fields_added: usize,
}

/// Fold every record of `dataset` into `vars`.
pub fn observe_dataset(vars: &mut VariableSet, dataset: &Dataset) {
    for (_, record) in dataset.iter() {
        vars.observe(record);
    }
}

/// Give every record of `dataset` all of `vars`, missing ones as `null`.
/// Returns the number of fields inserted.
pub fn backfill_dataset(dataset: &mut Dataset, vars: &VariableSet) -> usize {
    dataset
        .iter_mut()
        .map(|(_, record)| record.backfill(vars))
        .sum()
}

/// Union of field names across all records of all data files in `folder`,
/// in first-seen order (files by name, then document order).
pub fn collect_variables(folder: &Path, config: &FormatterConfig) -> Result<VariableSet, AppError> {
    let mut vars = VariableSet::new();
    for path in list_data_files(folder, config)? {
        let dataset = Dataset::from_path(&path)?;
        observe_dataset(&mut vars, &dataset);
        debug!("{}: {} variables so far", path.display(), vars.len());
    }
    info!("Found {} variables in {}", vars.len(), folder.display());
    Ok(vars)
}

/// Rewrite every data file in `folder` so each record has every variable
/// seen in the folder, absent ones set to `null`.
///
/// Files stay dictionaries of records; keys and existing values are kept.
/// Any unreadable file aborts the run before anything is rewritten.
pub fn backfill_folder(folder: &Path, config: &FormatterConfig) -> Result<BackfillReport, AppError> {
    let files = list_data_files(folder, config)?;

    let mut datasets = Vec::with_capacity(files.len());
    let mut vars = VariableSet::new();
    for path in &files {
        let dataset = Dataset::from_path(path)?;
        observe_dataset(&mut vars, &dataset);
        datasets.push(dataset);
    }
    info!("Found {} variables in {}", vars.len(), folder.display());

    let mut records = 0;
    let mut fields_added = 0;
    for (path, mut dataset) in files.iter().zip(datasets) {
        let added = backfill_dataset(&mut dataset, &vars);
        debug!("{}: added {} null fields", path.display(), added);
        records += dataset.len();
        fields_added += added;
        overwrite_file(path, &render_json(&dataset, config.format)?)?;
    }

    Ok(BackfillReport {
        variables: vars,
        files,
        records,
        fields_added,
    })
}
