//! Filesystem helpers for the command-line front end.
//!
//! The merge engine works on in-memory uploads; this module turns paths into
//! [`InputFile`]s (kind declared by extension), writes merged outputs and
//! reports per-file failures.

use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use log::{error, warn};

use crate::{
    merge::{Disposition, MergeReport},
    model::{FileKind, InputFile},
};

pub fn kind_for_path(path: &Path) -> Result<FileKind> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(FileKind::from_extension)
        .ok_or_else(|| anyhow!("Unsupported file type for {path:?} (expected .csv or .xlsx)"))
}

pub fn load_input(path: &Path) -> Result<InputFile> {
    let kind = kind_for_path(path)?;
    let bytes = fs::read(path).with_context(|| format!("Opening input file {path:?}"))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(InputFile::new(name, kind, bytes))
}

/// Loads every path; unsupported extensions are rejected before any merge.
pub fn load_inputs(paths: &[PathBuf]) -> Result<Vec<InputFile>> {
    if paths.is_empty() {
        return Err(anyhow!("At least one input file must be provided"));
    }
    paths.iter().map(|path| load_input(path)).collect()
}

/// Writes `bytes` under `dir`. An existing file is never replaced; the name
/// gets a `_1`, `_2`, ... suffix before the extension instead.
pub fn write_output(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Creating output directory {dir:?}"))?;
    let (file, path) = create_unique(dir, file_name)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Writing output file {path:?}"))?;
    Ok(path)
}

fn create_unique(dir: &Path, file_name: &str) -> Result<(File, PathBuf)> {
    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = name
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned());
    let mut attempt = 0u32;
    loop {
        let candidate = match (attempt, &extension) {
            (0, _) => file_name.to_string(),
            (n, Some(ext)) => format!("{stem}_{n}.{ext}"),
            (n, None) => format!("{stem}_{n}"),
        };
        let path = dir.join(candidate);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((file, path)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                attempt = attempt
                    .checked_add(1)
                    .ok_or_else(|| anyhow!("No free output name for {file_name} in {dir:?}"))?;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Creating output file {path:?}"));
            }
        }
    }
}

pub fn log_failures(report: &MergeReport) {
    for failure in &report.failures {
        match failure.disposition {
            Disposition::Skipped => warn!("Skipped: {}", failure.error),
            Disposition::GroupAborted => error!("Group not merged: {}", failure.error),
        }
    }
}

/// Fails when no kind produced a result.
pub fn ensure_merged(report: &MergeReport) -> Result<()> {
    if report.results.is_empty() {
        return Err(anyhow!(
            "Nothing could be merged ({} file(s) failed)",
            report.failures.len()
        ));
    }
    Ok(())
}
