use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context;
use chrono::{DateTime, Local};
use tracing::*;

pub const RECORDINGS_DIR_NAME: &str = "TFT Recorder";

/// `~/Movies/TFT Recorder` on macOS, the XDG videos directory elsewhere.
pub fn recordings_dir() -> PathBuf {
    dirs::video_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Movies")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(RECORDINGS_DIR_NAME)
}

pub fn file_name_at(time: DateTime<Local>) -> String {
    format!("TFT-{}.mp4", time.format("%Y-%m-%d-%H%M%S"))
}

pub fn next_output_path(dir: &Path) -> PathBuf {
    dir.join(file_name_at(Local::now()))
}

/// Creates `dir` and any missing parents, returning the directories that
/// did not exist before, deepest first.
pub fn create_missing_dirs(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let missing: Vec<PathBuf> = dir
        .ancestors()
        .take_while(|ancestor| !ancestor.as_os_str().is_empty() && !ancestor.exists())
        .map(Path::to_path_buf)
        .collect();

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create '{}'", dir.display()))?;

    Ok(missing)
}

/// Undoes [`create_missing_dirs`]. Directories that gained content are kept.
pub fn remove_created_dirs(created: &[PathBuf]) {
    for dir in created {
        if let Err(e) = std::fs::remove_dir(dir) {
            debug!(dir = %dir.display(), error = %e, "Keeping directory");
            break;
        }
    }
}

/// `.mp4` files in `dir`, newest first by modification time.
pub fn list_recordings(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut recordings: Vec<(PathBuf, Option<SystemTime>)> = std::fs::read_dir(dir)?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();

            if !path.is_file() || path.extension()? != "mp4" {
                return None;
            }

            let modified = entry.metadata().and_then(|m| m.modified()).ok();
            Some((path, modified))
        })
        .collect();

    recordings.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(recordings.into_iter().map(|(path, _)| path).collect())
}
