//! Backing file acquisition
//!
//! Creates the temporary file or opens the caller-named file behind a
//! record log, and applies the sharing policy.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::TempPath;

use crate::config::{OpenMode, SharePolicy};
use crate::error::{FdictError, Result};

/// Suffix of temporary backing files
const TEMP_SUFFIX: &str = ".fdict";

/// Create a uniquely named temporary file, open read/write
///
/// The returned `TempPath` deletes the file when closed or dropped.
pub fn create_temporary(dir: Option<&Path>, prefix: &str) -> Result<(File, TempPath)> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(prefix).suffix(TEMP_SUFFIX);

    let temp = match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|source| FdictError::Open {
        path: dir.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir),
        source,
    })?;

    let (file, path) = temp.into_parts();
    tracing::debug!("Created temporary backing file {}", path.display());
    Ok((file, path))
}

/// Open a caller-named file read/write with the given mode and sharing policy
pub fn open_named(path: &Path, mode: OpenMode, share: SharePolicy) -> Result<File> {
    let file = open_options(mode)
        .open(path)
        .map_err(|source| FdictError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    apply_share_policy(&file, path, share)?;

    // Truncate only once the lock is held, so a refused open leaves the file intact
    if matches!(mode, OpenMode::Create | OpenMode::Truncate) {
        file.set_len(0).map_err(|source| FdictError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    }

    tracing::debug!(
        "Opened backing file {} ({:?}, share {:?})",
        path.display(),
        mode,
        share
    );
    Ok(file)
}

/// Release an advisory lock taken by `open_named`; errors are ignored
pub fn release_lock(file: &File, share: SharePolicy) {
    if share == SharePolicy::ReadWrite {
        return;
    }
    if let Err(e) = FileExt::unlock(file) {
        tracing::warn!("Ignoring error while unlocking backing file: {}", e);
    }
}

fn open_options(mode: OpenMode) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.read(true).write(true);

    match mode {
        OpenMode::CreateNew => {
            options.create_new(true);
        }
        OpenMode::Create | OpenMode::OpenOrCreate => {
            options.create(true).truncate(false);
        }
        OpenMode::Open | OpenMode::Truncate => {}
    }

    options
}

fn apply_share_policy(file: &File, path: &Path, share: SharePolicy) -> Result<()> {
    // Fully qualified: std::fs::File has inherent lock methods of its own
    let locked = match share {
        SharePolicy::None => FileExt::try_lock_exclusive(file),
        SharePolicy::Read => FileExt::try_lock_shared(file),
        SharePolicy::ReadWrite => return Ok(()),
    };

    locked.map_err(|e| lock_error(path.to_path_buf(), e))
}

fn lock_error(path: PathBuf, e: io::Error) -> FdictError {
    if e.kind() == io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
    {
        FdictError::Locked { path }
    } else {
        FdictError::Open { path, source: e }
    }
}
