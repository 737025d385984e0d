mod chapter;
mod classifier;
mod cli;
mod config;
mod destination;
mod error;
mod scanner;
mod summary;
mod transfer;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use error::ArchiveError;
use scanner::Discovered;
use std::fs;
use std::path::{Path, PathBuf};
use summary::RunSummary;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Source and destination after CLI flags are laid over the config defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RunPaths {
    sources: Vec<PathBuf>,
    destination: PathBuf,
}

impl RunPaths {
    fn from_args(args: &cli::Args, config: &Config) -> Self {
        let sources = if args.source.is_empty() {
            vec![config.source_dir.clone()]
        } else {
            args.source.clone()
        };
        let destination = args
            .destination
            .clone()
            .unwrap_or_else(|| config.destination_dir.clone());
        Self {
            sources,
            destination,
        }
    }

    /// A single source that is not a regular file is treated as a directory
    /// to list; anything else is a list of individual files.
    fn source_dir(&self) -> Option<&Path> {
        match self.sources.as_slice() {
            [only] if !only.is_file() => Some(only),
            _ => None,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,gopro_archiver=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();
    let config = Config::load(&args.config)?;
    let paths = RunPaths::from_args(&args, &config);

    match archive(&config, &paths, args.dry_run) {
        Ok(summary) => {
            print_report(&summary, args.dry_run)?;
            Ok(())
        }
        Err(ArchiveError::CopyAborted {
            path,
            summary,
            source,
        }) => {
            print_report(&summary, args.dry_run)?;
            Err(source).with_context(|| format!("copying {} failed", path.display()))
        }
        Err(e) => Err(e.into()),
    }
}

fn archive(config: &Config, paths: &RunPaths, dry_run: bool) -> Result<RunSummary, ArchiveError> {
    let candidates = discover(paths)?;

    fs::read_dir(&paths.destination).map_err(|source| ArchiveError::DestinationUnavailable {
        path: paths.destination.clone(),
        source,
    })?;
    info!("Destination dir: {}", paths.destination.display());

    transfer::Archiver::new(config, &paths.destination, dry_run).run(&candidates)
}

fn discover(paths: &RunPaths) -> Result<Vec<Discovered>, ArchiveError> {
    match paths.source_dir() {
        Some(dir) => {
            info!("Source dir: {}", dir.display());
            scanner::scan_dir(dir)
        }
        None => Ok(scanner::scan_paths(&paths.sources)),
    }
}

fn print_report(summary: &RunSummary, dry_run: bool) -> Result<()> {
    let stdout = std::io::stdout();
    summary.write_report(&mut stdout.lock(), dry_run)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(source: &Path, destination: &Path) -> Config {
        Config {
            source_dir: source.to_path_buf(),
            destination_dir: destination.to_path_buf(),
            valid_extensions: vec!["mp4".into(), "lrv".into(), "thm".into()],
            date_format: "%Y%m%d".into(),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let cfg = config(Path::new("/media/gopro"), Path::new("/archive"));

        let args = cli::Args::try_parse_from(["gopro-archiver"]).unwrap();
        let paths = RunPaths::from_args(&args, &cfg);
        assert_eq!(paths.sources, vec![PathBuf::from("/media/gopro")]);
        assert_eq!(paths.destination, PathBuf::from("/archive"));

        let args =
            cli::Args::try_parse_from(["gopro-archiver", "-s", "/sd", "-d", "/nas"]).unwrap();
        let paths = RunPaths::from_args(&args, &cfg);
        assert_eq!(paths.sources, vec![PathBuf::from("/sd")]);
        assert_eq!(paths.destination, PathBuf::from("/nas"));
    }

    #[test]
    fn test_missing_source_dir_aborts() {
        let dst = tempfile::tempdir().unwrap();
        let missing = dst.path().join("no-such-card");
        let cfg = config(&missing, dst.path());
        let paths = RunPaths {
            sources: vec![missing],
            destination: dst.path().to_path_buf(),
        };

        let err = archive(&cfg, &paths, false).unwrap_err();
        assert!(matches!(err, ArchiveError::SourceUnavailable { .. }));
        assert_eq!(fs::read_dir(dst.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_destination_aborts() {
        let src = tempfile::tempdir().unwrap();
        fs::write(src.path().join("GX010001.MP4"), b"video").unwrap();
        let missing = src.path().join("no-such-archive");
        let cfg = config(src.path(), &missing);
        let paths = RunPaths {
            sources: vec![src.path().to_path_buf()],
            destination: missing.clone(),
        };

        let err = archive(&cfg, &paths, false).unwrap_err();
        assert!(matches!(err, ArchiveError::DestinationUnavailable { .. }));
        assert!(!missing.exists());
    }

    #[test]
    fn test_explicit_files_mode() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let a = src.path().join("GX010001.MP4");
        let b = src.path().join("GX010002.LRV");
        fs::write(&a, b"a").unwrap();
        fs::write(&b, b"b").unwrap();
        let cfg = config(src.path(), dst.path());
        let paths = RunPaths {
            sources: vec![a, b],
            destination: dst.path().to_path_buf(),
        };

        assert_eq!(paths.source_dir(), None);
        let summary = archive(&cfg, &paths, false).unwrap();
        assert_eq!(summary.processed_count, 2);
        assert_eq!(summary.copied_count, 2);
    }

    #[test]
    fn test_single_file_source_is_not_a_directory() {
        let src = tempfile::tempdir().unwrap();
        let file = src.path().join("GX010001.MP4");
        fs::write(&file, b"a").unwrap();

        let paths = RunPaths {
            sources: vec![file],
            destination: PathBuf::from("/archive"),
        };
        assert_eq!(paths.source_dir(), None);

        let paths = RunPaths {
            sources: vec![src.path().to_path_buf()],
            destination: PathBuf::from("/archive"),
        };
        assert_eq!(paths.source_dir(), Some(src.path()));
    }
}
