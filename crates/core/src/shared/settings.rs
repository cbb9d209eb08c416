use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::alignment::domain::alignment_config::AlignmentConfig;
use crate::output::domain::line_grouper::LineGrouper;
use crate::output::infrastructure::writer_factory::OutputFormat;
use crate::shared::constants::{SETTINGS_DIR_NAME, SETTINGS_FILE_NAME};
use crate::shared::error::SyncError;

/// Persisted user preferences. Every key is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub alignment: AlignmentConfig,
    pub formats: Vec<OutputFormat>,
    pub line_grouping: LineGrouper,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alignment: AlignmentConfig::default(),
            formats: OutputFormat::DEFAULT.to_vec(),
            line_grouping: LineGrouper::default(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// Loads `explicit` if given, else the platform settings file. A missing
    /// platform file yields defaults; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SyncError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match Self::config_path() {
                Some(path) => match Self::load_from(&path) {
                    Err(SyncError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                        Ok(Self::default())
                    }
                    other => other,
                },
                None => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, SyncError> {
        let json = fs::read_to_string(path).map_err(|source| SyncError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&json).map_err(|source| SyncError::Settings {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}
