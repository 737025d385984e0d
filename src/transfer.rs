use crate::chapter;
use crate::classifier::{self, Classification};
use crate::config::Config;
use crate::destination::{self, Resolution};
use crate::error::ArchiveError;
use crate::scanner::{CandidateFile, Discovered};
use crate::summary::{FailReason, IgnoreReason, Outcome, RunSummary};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File, FileTimes, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

const BUFFER_SIZE: usize = 256 * 1024; // 256 KB
const PROGRESS_TEMPLATE: &str = "{msg}\n{wide_bar} {percent}% {bytes}/{total_bytes} [{eta}]";

/// Drives each discovered file through classification, chapter
/// normalization, destination resolution and copy.
pub struct Archiver<'a> {
    config: &'a Config,
    destination_root: &'a Path,
    dry_run: bool,
    pb: ProgressBar,
}

impl<'a> Archiver<'a> {
    pub fn new(config: &'a Config, destination_root: &'a Path, dry_run: bool) -> Self {
        let pb = ProgressBar::no_length();
        pb.set_style(
            ProgressStyle::default_bar()
                .template(PROGRESS_TEMPLATE)
                .expect("progress template is valid")
                .progress_chars("=> "),
        );
        Self {
            config,
            destination_root,
            dry_run,
            pb,
        }
    }

    /// Process every candidate in discovery order.
    ///
    /// Per-file problems are recorded in the summary. An unexpected I/O error
    /// while copying stops the run and hands back what was recorded so far.
    pub fn run(&self, candidates: &[Discovered]) -> Result<RunSummary, ArchiveError> {
        let total_bytes: u64 = candidates
            .iter()
            .filter_map(|d| match d {
                Discovered::File(f) => fs::metadata(&f.path).ok(),
                Discovered::Missing(_) => None,
            })
            .map(|m| m.len())
            .sum();
        self.pb.set_length(total_bytes);

        let result = candidates
            .iter()
            .try_fold(RunSummary::default(), |summary, item| match self.process(item) {
                Ok(outcome) => Ok(summary.record(&item.display_name(), &outcome)),
                Err(source) => Err(ArchiveError::CopyAborted {
                    path: item.path().to_path_buf(),
                    summary: Box::new(summary),
                    source,
                }),
            });

        match &result {
            Ok(_) => self.pb.finish_with_message("Transfer complete"),
            Err(_) => self.pb.abandon(),
        }
        result
    }

    fn process(&self, item: &Discovered) -> io::Result<Outcome> {
        let file = match item {
            Discovered::File(file) => file,
            Discovered::Missing(path) => {
                self.pb.suspend(|| {
                    warn!("The file {} doesn't exist. Ignoring.", path.display());
                });
                return Ok(Outcome::Ignored(IgnoreReason::Missing));
            }
        };

        // the listing may be stale by the time we get here
        let size = match fs::metadata(&file.path) {
            Ok(meta) if meta.is_file() => meta.len(),
            _ => {
                self.pb.suspend(|| {
                    warn!(
                        "{} does not exist any more. It was there a bit ago. Skipping.",
                        file.name
                    );
                });
                return Ok(Outcome::Skipped);
            }
        };

        if let Classification::Reject(reason) =
            classifier::classify(&file.name, &self.config.valid_extensions)
        {
            self.pb.suspend(|| warn!("File {} {}.", file.name, reason));
            self.pb.inc(size);
            return Ok(Outcome::Ignored(reason));
        }

        let normalized = chapter::normalize(&file.name);
        if normalized != file.name {
            debug!("{} is a later chapter, archiving as {}", file.name, normalized);
        }

        self.pb.set_message(normalized.clone());
        let outcome = self.place(file, &normalized);
        if !matches!(outcome, Ok(Outcome::Copied)) || self.dry_run {
            self.pb.inc(size);
        }
        outcome
    }

    fn place(&self, file: &CandidateFile, normalized: &str) -> io::Result<Outcome> {
        let plan = destination::plan_for(
            &file.modified,
            normalized,
            self.destination_root,
            &self.config.date_format,
        );
        let target = plan.target_file.clone();

        let resolution =
            destination::resolve(plan, &file.modified, self.destination_root, !self.dry_run);
        let plan = match resolution {
            Ok(Resolution::Ready(plan)) => plan,
            Ok(Resolution::Collision(existing)) => {
                self.pb.suspend(|| warn!("The file {} already exists.", existing.display()));
                return Ok(failed(&existing, FailReason::AlreadyExists));
            }
            Err(e) => return self.recover(file, &target, e),
        };

        debug!("Archive folder {}", plan.target_dir.display());
        if self.dry_run {
            self.pb.suspend(|| {
                info!(
                    "[dry-run] {} -> {}",
                    file.path.display(),
                    plan.target_file.display()
                );
            });
            return Ok(Outcome::Copied);
        }

        self.pb.suspend(|| info!("Copying file to {}", plan.target_file.display()));
        match copy_with_progress(&file.path, &plan.target_file, &self.pb) {
            Ok(()) => Ok(Outcome::Copied),
            Err(e) => self.recover(file, &plan.target_file, e),
        }
    }

    /// Turn a per-file I/O error into a failed outcome, or pass it on.
    fn recover(&self, file: &CandidateFile, target: &Path, err: io::Error) -> io::Result<Outcome> {
        match per_file_failure(&err) {
            Some(FailReason::Permission) => {
                self.pb.suspend(|| {
                    warn!(
                        "Permissions problem with source or destination: source {}, destination {}: {}",
                        file.path.display(),
                        target.display(),
                        err
                    );
                });
                Ok(failed(target, FailReason::Permission))
            }
            Some(FailReason::AlreadyExists) => {
                self.pb.suspend(|| warn!("The file {} already exists.", target.display()));
                Ok(failed(target, FailReason::AlreadyExists))
            }
            None => Err(err),
        }
    }
}

fn failed(target: &Path, reason: FailReason) -> Outcome {
    Outcome::Failed {
        target: target.display().to_string(),
        reason,
    }
}

fn per_file_failure(err: &io::Error) -> Option<FailReason> {
    match err.kind() {
        io::ErrorKind::PermissionDenied => Some(FailReason::Permission),
        io::ErrorKind::AlreadyExists => Some(FailReason::AlreadyExists),
        _ => None,
    }
}

/// Copy `src` to a new file at `dest`, never replacing an existing one.
/// A partially written destination is removed on error.
fn copy_with_progress(src: &Path, dest: &Path, pb: &ProgressBar) -> io::Result<()> {
    let mut source = File::open(src)?;
    let mut destination = OpenOptions::new().write(true).create_new(true).open(dest)?;

    let copied = stream(&mut source, &mut destination, pb)
        .and_then(|()| preserve_metadata(&source, &destination));
    if copied.is_err() {
        drop(destination);
        let _ = fs::remove_file(dest);
    }
    copied
}

fn stream(source: &mut File, destination: &mut File, pb: &ProgressBar) -> io::Result<()> {
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let bytes_read = source.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        destination.write_all(&buffer[..bytes_read])?;
        pb.inc(bytes_read as u64);
    }
    destination.flush()
}

/// Carry over timestamps and permission bits.
fn preserve_metadata(source: &File, destination: &File) -> io::Result<()> {
    let meta = source.metadata()?;

    let mut times = FileTimes::new();
    if let Ok(atime) = meta.accessed() {
        times = times.set_accessed(atime);
    }
    if let Ok(mtime) = meta.modified() {
        times = times.set_modified(mtime);
    }
    destination.set_times(times)?;

    destination.set_permissions(meta.permissions())
}
