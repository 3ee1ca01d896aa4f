use std::ffi::OsStr;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::lp::json::JsonProgramReader;
use crate::lp::model::LinearProgram;
use crate::lp::mps::MpsParser;

/// Picks the reader by file extension: `.json` is JSON, everything else MPS.
#[derive(Debug, Default)]
pub struct LpLoader;

impl LpLoader {
    pub fn from_path(path: &Path) -> Result<LinearProgram> {
        let source = path.display().to_string();
        let file = File::open(path)?;
        let mut lp = if is_json(path) {
            JsonProgramReader::from_reader(&source, file)?
        } else {
            MpsParser::from_reader(&source, file)?
        };
        if lp.name.is_empty() {
            lp.name = instance_name(path);
        }
        Ok(lp)
    }
}

/// File name without directories, used as the instance identifier in reports.
pub fn instance_name(path: &Path) -> String {
    path.file_name()
        .and_then(OsStr::to_str)
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// Expands `.txt` list files into the instance paths they name, keeping input order.
///
/// Relative entries resolve against the list file's directory. Blank lines and `#` comments
/// are skipped.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if !has_extension(input, "txt") {
            paths.push(input.clone());
            continue;
        }
        let base = input.parent().unwrap_or_else(|| Path::new(""));
        for line in fs::read_to_string(input)?.lines() {
            let entry = line.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }
            let entry = Path::new(entry);
            paths.push(if entry.is_absolute() {
                entry.to_path_buf()
            } else {
                base.join(entry)
            });
        }
    }
    Ok(paths)
}

fn is_json(path: &Path) -> bool {
    has_extension(path, "json")
}

fn has_extension(path: &Path, expected: &str) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}
