//! Output path naming: `render/<unix-epoch-seconds>.mp4`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Directory renders land in by default.
pub const DEFAULT_RENDER_DIR: &str = "render";

/// Create `dir` if absent (idempotent) and return a fresh output path
/// named after the current epoch second.
pub fn timestamped_output_path(dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    Ok(dir.join(format!("{}.mp4", epoch)))
}
