use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPlan {
    /// `<destination>/<YYYY>/<MM>/<DD>`
    pub target_dir: PathBuf,
    pub target_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Ready(DestinationPlan),
    /// Something already occupies the target path.
    Collision(PathBuf),
}

/// Check `plan` against the archive, creating the day directory (and any
/// missing year/month level) unless `create_dirs` is false.
///
/// A pre-existing target is reported as a collision and the filesystem is
/// not touched further.
pub fn resolve(
    plan: DestinationPlan,
    timestamp: &DateTime<Local>,
    destination_root: &Path,
    create_dirs: bool,
) -> io::Result<Resolution> {
    if create_dirs {
        ensure_date_dirs(destination_root, timestamp)?;
    }

    if plan.target_file.try_exists()? {
        return Ok(Resolution::Collision(plan.target_file));
    }
    Ok(Resolution::Ready(plan))
}

/// Where a file stamped `timestamp` lands in the archive under its
/// normalized name.
pub fn plan_for(
    timestamp: &DateTime<Local>,
    normalized_name: &str,
    destination_root: &Path,
    date_format: &str,
) -> DestinationPlan {
    let target_dir = date_levels(timestamp)
        .iter()
        .fold(destination_root.to_path_buf(), |dir, level| dir.join(level));
    let date_stamp = timestamp.format(date_format);
    let target_file = target_dir.join(format!("{}-{}", date_stamp, normalized_name));
    DestinationPlan {
        target_dir,
        target_file,
    }
}

fn date_levels(timestamp: &DateTime<Local>) -> [String; 3] {
    [
        timestamp.format("%Y").to_string(),
        timestamp.format("%m").to_string(),
        timestamp.format("%d").to_string(),
    ]
}

/// Create year, then month, then day, skipping levels that already exist.
fn ensure_date_dirs(destination_root: &Path, timestamp: &DateTime<Local>) -> io::Result<()> {
    let mut dir = destination_root.to_path_buf();
    for level in date_levels(timestamp) {
        dir.push(level);
        if dir.is_dir() {
            continue;
        }
        match fs::create_dir(&dir) {
            Ok(()) => {}
            // created by someone else between the check and the mkdir
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
