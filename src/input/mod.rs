use crate::Schedule;
use crate::emit::convert_with;
use crate::validation::{ValidationError, ValidationOptions};
use rayon::prelude::*;
use serde_json::Error as SerdeJsonError;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid schedule JSON: {0}")]
    Json(#[from] SerdeJsonError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("unsupported input format '{0}' (expected json or csv)")]
    UnsupportedFormat(String),
}

pub type InputResult<T> = Result<T, InputError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> InputResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        extension.parse()
    }
}

impl FromStr for InputFormat {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(InputFormat::Json),
            "csv" => Ok(InputFormat::Csv),
            other => Err(InputError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Load a schedule, picking the reader from the file extension. A JSON
/// `null` document yields `Ok(None)`.
pub fn load_schedule<P: AsRef<Path>>(path: P) -> InputResult<Option<Schedule>> {
    let path = path.as_ref();
    match InputFormat::from_path(path)? {
        InputFormat::Json => load_schedule_from_json(path),
        InputFormat::Csv => load_schedule_from_csv(path).map(Some),
    }
}

#[derive(Debug, Error)]
pub enum ConvertFileError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug)]
pub struct FileConversion {
    pub path: PathBuf,
    pub result: Result<String, ConvertFileError>,
}

pub fn convert_file<P: AsRef<Path>>(
    path: P,
    options: ValidationOptions,
) -> Result<String, ConvertFileError> {
    let schedule = load_schedule(path)?;
    Ok(convert_with(schedule.as_ref(), options)?)
}

/// Convert many files in parallel. Results come back in input order.
pub fn convert_files(paths: &[PathBuf], options: ValidationOptions) -> Vec<FileConversion> {
    let results: Vec<FileConversion> = paths
        .par_iter()
        .map(|path| FileConversion {
            path: path.clone(),
            result: convert_file(path, options),
        })
        .collect();
    let failed = results.iter().filter(|r| r.result.is_err()).count();
    info!(files = results.len(), failed, "batch conversion finished");
    results
}

pub mod file;

pub use file::{load_schedule_from_csv, load_schedule_from_json, parse_schedule_json};
