//! JSON data validator: syntax and structure checks for the files under `data/`.
//!
//! Every registered file is checked in order. A missing or malformed file is recorded
//! and the scan moves on; only a missing data directory stops the run.

mod report;
mod schema;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

pub use report::{FileReport, Report};
pub use schema::{
    ComparisonSchema, ItemProblem, ItemViolation, QuizSchema, SchemaCheck, SchemaError,
};

/// Data directory, relative to the invocation directory.
pub const DATA_DIR: &str = "data";

/// Fatal validator errors. Per-file problems go into the [`Report`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    #[error("data directory not found: {}", .0.display())]
    MissingDataDir(PathBuf),
}

/// A data file to check and its optional structural checker.
pub struct DataFile {
    pub name: &'static str,
    pub schema: Option<Box<dyn SchemaCheck>>,
}

/// The site's data files, in check order.
pub fn data_files() -> Vec<DataFile> {
    vec![
        DataFile {
            name: "subspecies.json",
            schema: Some(Box::new(ComparisonSchema)),
        },
        DataFile {
            name: "quiz.json",
            schema: Some(Box::new(QuizSchema)),
        },
        DataFile {
            name: "animals.json",
            schema: None,
        },
    ]
}

/// Check every file of `files` inside `dir`. The report has one entry per file.
pub fn validate_dir(dir: &Path, files: &[DataFile]) -> Result<Report, ValidateError> {
    if !dir.is_dir() {
        return Err(ValidateError::MissingDataDir(dir.to_path_buf()));
    }
    let entries = files.iter().map(|file| check_file(dir, file)).collect();
    Ok(Report { entries })
}

fn check_file(dir: &Path, file: &DataFile) -> FileReport {
    let path = dir.join(file.name);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return FileReport::not_found(file.name, &path);
        }
        Err(e) => {
            log::debug!("Failed to read {}: {}", path.display(), e);
            return FileReport::unreadable(file.name, &e);
        }
    };

    let data: Value = match serde_json::from_str(&text) {
        Ok(data) => data,
        Err(e) => return FileReport::syntax_error(file.name, &e),
    };

    match &file.schema {
        Some(schema) => {
            log::debug!("Running {} check on {}", schema.name(), file.name);
            FileReport::structure(file.name, schema.check(&data))
        }
        None => FileReport::syntax_only(file.name),
    }
}
