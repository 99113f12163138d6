//! Merge settings.
//!
//! [`MergeOptions`] is the user-facing form: it can be loaded from a YAML file
//! and overridden from the command line. [`MergeOptions::resolve()`] validates
//! it into [`MergeSettings`], which is what the merge engine consumes.
//!
//! ```yaml
//! skip_rows: 2
//! encodings: [utf-8, gbk, latin1]
//! order: name
//! drop_blank_rows: true
//! ```

use std::{fs, path::Path};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    encoding::{self, Candidate, DEFAULT_ENCODINGS},
    error::ConfigError,
};

/// Order in which same-kind files are concatenated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum FileOrder {
    /// Keep the order in which files were supplied
    #[default]
    Upload,
    /// Sort each group by file name
    Name,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeOptions {
    pub skip_rows: usize,
    pub encodings: Vec<String>,
    pub order: FileOrder,
    pub drop_blank_rows: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            skip_rows: 0,
            encodings: DEFAULT_ENCODINGS.iter().map(|s| s.to_string()).collect(),
            order: FileOrder::Upload,
            drop_blank_rows: false,
        }
    }
}

impl MergeOptions {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    pub fn resolve(&self) -> Result<MergeSettings, ConfigError> {
        Ok(MergeSettings {
            skip_rows: self.skip_rows,
            candidates: encoding::resolve_candidates(&self.encodings)?,
            order: self.order,
            drop_blank_rows: self.drop_blank_rows,
        })
    }
}

/// Validated settings for a single merge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSettings {
    pub skip_rows: usize,
    pub candidates: Vec<Candidate>,
    pub order: FileOrder,
    pub drop_blank_rows: bool,
}

impl MergeSettings {
    /// Default candidate chain and upload order with the given title-row count.
    pub fn new(skip_rows: usize) -> Self {
        Self {
            skip_rows,
            candidates: encoding::default_candidates(),
            order: FileOrder::Upload,
            drop_blank_rows: false,
        }
    }
}
