//! File system helpers: vault enumeration, reads, atomic writes, file times

use crate::error::{MatterTimeError, Result};
use chrono::{DateTime, Local};
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::{DirEntry, WalkDir};

/// Modification and creation times of a file, in local time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTimes {
    pub modified: DateTime<Local>,
    pub created: DateTime<Local>,
}

impl FileTimes {
    /// Read the times of `path`
    ///
    /// File systems that do not record a birth time report the modification
    /// time as the creation time.
    pub fn of(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| map_io_error(e, path))?;
        let modified: DateTime<Local> = metadata.modified()?.into();
        let created = metadata
            .created()
            .map(DateTime::<Local>::from)
            .unwrap_or(modified);
        Ok(Self { modified, created })
    }
}

/// Whether `path` looks like a markdown file
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|s| s == "md" || s == "markdown")
        .unwrap_or(false)
}

/// Expand files and directories into a sorted list of markdown files
///
/// Directories are walked recursively. Hidden entries (such as an app's
/// `.obsidian` or `.trash` folders) are skipped. Explicitly named files are kept
/// whatever their extension.
pub fn resolve_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();
    for path in paths {
        if path.is_file() {
            files.insert(path.clone());
        } else if path.is_dir() {
            let walker = WalkDir::new(path)
                .into_iter()
                .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
            for entry in walker {
                let entry = entry.map_err(|e| {
                    MatterTimeError::path_resolution(format!("error traversing directory: {}", e))
                })?;
                if entry.file_type().is_file() && is_markdown(entry.path()) {
                    files.insert(entry.into_path());
                }
            }
        } else {
            return Err(MatterTimeError::file_not_found(path));
        }
    }
    Ok(files.into_iter().collect())
}

/// Read a file as UTF-8
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| map_io_error(e, path))
}

/// Replace the contents of `path` through a temporary file in the same directory
///
/// Existing permissions are carried over to the new file.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(parent_dir)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.flush()?;

    if let Ok(metadata) = fs::metadata(path) {
        temp_file.as_file().set_permissions(metadata.permissions())?;
    }

    temp_file
        .persist(path)
        .map_err(|e| MatterTimeError::Io(e.error))?;
    Ok(())
}

/// `path` relative to `root`, with `/` separators
///
/// Ignore rules match on this form. Paths outside `root` are rendered in full.
pub fn vault_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn map_io_error(error: std::io::Error, path: &Path) -> MatterTimeError {
    match error.kind() {
        std::io::ErrorKind::NotFound => MatterTimeError::file_not_found(path),
        _ => MatterTimeError::Io(error),
    }
}
