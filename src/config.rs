//! Settings for the timestamp controller
//!
//! Settings live in a JSON file with camelCase field names, the same shape a
//! note app plugin stores next to the vault. They are loaded once and handed
//! to [`crate::Stamper`] by value.

use crate::core::{validate_entry, DateFormat, DEFAULT_DATE_FORMAT};
use crate::error::{MatterTimeError, Result};
use crate::io::write_atomic;
use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bounds of the minimum interval, in minutes
pub const MIN_MINUTES_RANGE: std::ops::RangeInclusive<u32> = 1..=30;

/// Controller settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// strftime pattern used to read and write timestamps
    pub date_format: String,
    /// Whether the created key is maintained at all
    pub enable_create_time: bool,
    /// Front matter key for the modification time
    pub header_updated: String,
    /// Front matter key for the creation time
    pub header_created: String,
    /// The updated key is refreshed only when it lags the file by more than this
    pub min_minutes_between_saves: u32,
    /// Folders whose files are never touched
    pub ignore_global_folder: IgnoreFolders,
    /// Folders whose files never get a created key
    pub ignore_created_folder: Vec<String>,
}

/// Ignore list that older settings files stored as a single string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IgnoreFolders {
    Single(String),
    Many(Vec<String>),
}

impl Default for IgnoreFolders {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            enable_create_time: true,
            header_updated: "updated".to_string(),
            header_created: "created".to_string(),
            min_minutes_between_saves: 1,
            ignore_global_folder: IgnoreFolders::default(),
            ignore_created_folder: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; absent fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(MatterTimeError::file_not_found(path));
        }
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` when given, otherwise use the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Write settings as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        write_atomic(path.as_ref(), &content)
    }

    /// The global ignore list, whatever form it was stored in
    pub fn ignore_folders(&self) -> Vec<String> {
        let folders = match &self.ignore_global_folder {
            IgnoreFolders::Single(folder) => vec![folder.clone()],
            IgnoreFolders::Many(folders) => folders.clone(),
        };
        folders
            .into_iter()
            .filter(|folder| !folder.trim().is_empty())
            .collect()
    }

    /// Add a folder to the global ignore list, keeping entries unique
    pub fn add_ignore_folder(&mut self, folder: impl Into<String>) {
        let mut folders = self.ignore_folders();
        push_unique(&mut folders, folder.into());
        self.ignore_global_folder = IgnoreFolders::Many(folders);
    }

    /// Remove a folder from the global ignore list
    pub fn remove_ignore_folder(&mut self, folder: &str) {
        let folders = self
            .ignore_folders()
            .into_iter()
            .filter(|existing| existing != folder)
            .collect();
        self.ignore_global_folder = IgnoreFolders::Many(folders);
    }

    /// Add a folder to the created ignore list, keeping entries unique
    pub fn add_ignore_created_folder(&mut self, folder: impl Into<String>) {
        push_unique(&mut self.ignore_created_folder, folder.into());
    }

    /// Remove a folder from the created ignore list
    pub fn remove_ignore_created_folder(&mut self, folder: &str) {
        self.ignore_created_folder.retain(|existing| existing != folder);
    }

    /// Parsed date format
    pub fn date_format(&self) -> Result<DateFormat> {
        DateFormat::new(self.date_format.clone())
    }

    /// Reject settings the controller cannot act on
    pub fn validate(&self) -> Result<()> {
        let format = self.date_format()?;
        let sample = Local
            .with_ymd_and_hms(2000, 12, 31, 23, 59, 59)
            .single()
            .map(|time| format.format(&time))
            .unwrap_or_default();

        for key in [&self.header_updated, &self.header_created] {
            validate_entry(key, &sample)
                .map_err(|e| MatterTimeError::invalid_settings(e.to_string()))?;
        }

        if self.header_updated == self.header_created {
            return Err(MatterTimeError::invalid_settings(format!(
                "updated and created keys are both {:?}",
                self.header_updated
            )));
        }

        if !MIN_MINUTES_RANGE.contains(&self.min_minutes_between_saves) {
            return Err(MatterTimeError::invalid_settings(format!(
                "minMinutesBetweenSaves must be within {}..={}, got {}",
                MIN_MINUTES_RANGE.start(),
                MIN_MINUTES_RANGE.end(),
                self.min_minutes_between_saves
            )));
        }

        Ok(())
    }
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !item.trim().is_empty() && !list.contains(&item) {
        list.push(item);
    }
}
