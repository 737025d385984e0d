use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

#[derive(Parser, Debug)]
#[command(name = "gopro-archiver")]
#[command(about = "Copy GoPro files into a YYYY/MM/DD archive, grouping multi-chapter recordings")]
pub struct Args {
    /// Source directory, or one or more individual files (repeat the flag)
    #[arg(short, long, visible_alias = "src", action = ArgAction::Append)]
    pub source: Vec<PathBuf>,

    /// Archive root where the dated folders are created
    #[arg(short, long, visible_alias = "dst")]
    pub destination: Option<PathBuf>,

    /// YAML file with the default folders, extensions and date format
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Show what would be done without actually copying files
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}
