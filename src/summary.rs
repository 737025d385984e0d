use std::fmt;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Extension,
    Missing,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::Extension => f.write_str("does not have the right extension"),
            IgnoreReason::Missing => f.write_str("does not exist"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason {
    AlreadyExists,
    Permission,
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailReason::AlreadyExists => f.write_str("already exists"),
            FailReason::Permission => f.write_str("permission denied"),
        }
    }
}

/// Result of processing one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Copied,
    Ignored(IgnoreReason),
    /// `target` is the archive path that needs attention.
    Failed { target: String, reason: FailReason },
    /// The candidate vanished or changed type after listing.
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed_count: usize,
    pub copied_count: usize,
    pub ignored_files: Vec<String>,
    pub failed_files: Vec<String>,
}

impl RunSummary {
    /// Fold one outcome into the summary.
    pub fn record(mut self, name: &str, outcome: &Outcome) -> Self {
        self.processed_count += 1;
        match outcome {
            Outcome::Copied => self.copied_count += 1,
            Outcome::Ignored(_) => self.ignored_files.push(name.to_string()),
            Outcome::Failed { target, reason } => {
                self.failed_files.push(format!("{} ({})", target, reason))
            }
            Outcome::Skipped => {}
        }
        self
    }

    pub fn write_report<W: Write>(&self, out: &mut W, dry_run: bool) -> io::Result<()> {
        writeln!(out, "{}", "=".repeat(20))?;
        if dry_run {
            writeln!(out, "[dry-run] No files were copied.")?;
        }
        writeln!(out, "Number of processed files: {}", self.processed_count)?;
        writeln!(out, "Copied {} files.", self.copied_count)?;
        writeln!(out, "Ignored {} files:", self.ignored_files.len())?;
        for file in &self.ignored_files {
            writeln!(out, "  {}", file)?;
        }
        writeln!(out, "Failed to copy {} files:", self.failed_files.len())?;
        for file in &self.failed_files {
            writeln!(out, "  {}", file)?;
        }
        Ok(())
    }
}
