//! Per-file validation results and their console rendering.

use std::fmt::Write;
use std::path::Path;

use super::SchemaError;
use crate::core::app;

const RULE: &str = "==================================================";

/// Outcome of checking one data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub filename: String,
    pub found: bool,
    pub syntax_valid: bool,
    /// `None` when the file has no structural checker or never parsed.
    pub structure_valid: Option<bool>,
    pub message: String,
}

impl FileReport {
    pub fn not_found(filename: &str, path: &Path) -> Self {
        Self::failed(filename, false, format!("file not found: {}", path.display()))
    }

    pub fn unreadable(filename: &str, err: &std::io::Error) -> Self {
        Self::failed(filename, true, format!("file read error: {}", err))
    }

    pub fn syntax_error(filename: &str, err: &serde_json::Error) -> Self {
        Self::failed(filename, true, format!("JSON syntax error: {}", err))
    }

    pub fn syntax_only(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            found: true,
            syntax_valid: true,
            structure_valid: None,
            message: "syntax only, no structural check".to_string(),
        }
    }

    pub fn structure(filename: &str, result: Result<(), SchemaError>) -> Self {
        let (valid, message) = match result {
            Ok(()) => (true, "structure OK".to_string()),
            Err(e) => (false, e.to_string()),
        };
        Self {
            filename: filename.to_string(),
            found: true,
            syntax_valid: true,
            structure_valid: Some(valid),
            message,
        }
    }

    fn failed(filename: &str, found: bool, message: String) -> Self {
        Self {
            filename: filename.to_string(),
            found,
            syntax_valid: false,
            structure_valid: None,
            message,
        }
    }

    pub fn passed(&self) -> bool {
        self.found && self.syntax_valid && self.structure_valid != Some(false)
    }
}

/// All file results of one validator run, in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    pub entries: Vec<FileReport>,
}

impl Report {
    pub fn all_passed(&self) -> bool {
        self.entries.iter().all(FileReport::passed)
    }

    /// Render the console report. Output depends only on the entries.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "🐾 {} · JSON data validator", app::SITE_TITLE);
        let _ = writeln!(out, "{}", RULE);

        for entry in &self.entries {
            let _ = writeln!(out, "\n📄 Checking {}...", entry.filename);
            if !entry.found {
                let _ = writeln!(out, "   ⚠️  {}", entry.message);
                continue;
            }
            if !entry.syntax_valid {
                let _ = writeln!(out, "   ❌ {}", entry.message);
                continue;
            }
            let _ = writeln!(out, "   ✅ JSON syntax OK");
            match entry.structure_valid {
                Some(true) => {
                    let _ = writeln!(out, "   ✅ {}", entry.message);
                }
                Some(false) => {
                    let _ = writeln!(out, "   ❌ Structure error: {}", entry.message);
                }
                None => {
                    let _ = writeln!(out, "   ℹ️  {}", entry.message);
                }
            }
        }

        let _ = writeln!(out, "\n{}", RULE);
        if self.all_passed() {
            let _ = writeln!(out, "🎉 All checks passed! Data files are ready.");
            let _ = writeln!(
                out,
                "💡 Start the dev server to try them: {} serve",
                app::NAME
            );
        } else {
            let _ = writeln!(out, "❌ Problems found, fix them and run the check again.");
        }
        let _ = writeln!(out, "{}", RULE);
        out
    }
}
