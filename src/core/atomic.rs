//! Atomic file replacement.
//!
//! Contents go to a temporary file in the target's directory, are synced to
//! disk, and are then renamed over the target. Readers see either the old
//! file or the complete new one.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, trace};

/// Atomically replace `path` with `contents`, creating parent directories.
///
/// On Unix the file is created with `mode` before any byte is written.
#[cfg_attr(not(unix), allow(unused_variables))]
pub fn write_atomic(path: &Path, contents: &[u8], mode: u32) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".firstboot-")
        .suffix(".tmp")
        .tempfile_in(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(mode))?;
    }

    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;

    trace!(tmp = %tmp.path().display(), target = %path.display(), "renaming into place");
    tmp.persist(path).map_err(|e| e.error)?;

    #[cfg(unix)]
    sync_dir(dir);

    Ok(())
}

/// Make a rename in `dir` durable. Best effort.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = fs::File::open(dir).and_then(|handle| handle.sync_all()) {
        debug!(dir = %dir.display(), error = %e, "directory sync failed");
    }
}
