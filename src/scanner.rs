use crate::error::ArchiveError;
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub path: PathBuf,
    pub modified: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub enum Discovered {
    File(CandidateFile),
    /// An explicitly named source path that is not a regular file.
    Missing(PathBuf),
}

impl Discovered {
    pub fn path(&self) -> &Path {
        match self {
            Discovered::File(file) => &file.path,
            Discovered::Missing(path) => path,
        }
    }

    /// Name used in the run summary.
    pub fn display_name(&self) -> String {
        match self {
            Discovered::File(file) => file.name.clone(),
            Discovered::Missing(path) => path.display().to_string(),
        }
    }
}

/// List the regular files directly inside `source_dir`, sorted by name.
pub fn scan_dir(source_dir: &Path) -> Result<Vec<Discovered>, ArchiveError> {
    // read_dir first so an unreadable root is fatal rather than an iterator error
    fs::read_dir(source_dir).map_err(|source| ArchiveError::SourceUnavailable {
        path: source_dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in WalkDir::new(source_dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let modified = match entry.metadata().map_err(io::Error::from).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                warn!(
                    "Could not read the modification time of {}: {}. Skipping.",
                    entry.path().display(),
                    e
                );
                continue;
            }
        };
        files.push(Discovered::File(CandidateFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path().to_path_buf(),
            modified: modified.into(),
        }));
    }

    Ok(files)
}

/// Turn explicitly named files into candidates, keeping the given order.
pub fn scan_paths(paths: &[PathBuf]) -> Vec<Discovered> {
    paths.iter().map(|path| discover_file(path)).collect()
}

fn discover_file(path: &Path) -> Discovered {
    let meta = match fs::metadata(path) {
        Ok(meta) if meta.is_file() => meta,
        _ => return Discovered::Missing(path.to_path_buf()),
    };
    let Some(name) = path.file_name() else {
        return Discovered::Missing(path.to_path_buf());
    };
    match meta.modified() {
        Ok(modified) => Discovered::File(CandidateFile {
            name: name.to_string_lossy().into_owned(),
            path: path.to_path_buf(),
            modified: modified.into(),
        }),
        Err(_) => Discovered::Missing(path.to_path_buf()),
    }
}
