//! Atomic file output for rendered documents.

use std::fs;
use std::io::Write;
use std::path::Path;

use atomicwrites::{AtomicFile, OverwriteBehavior};

use crate::error::{Error, Result};

/// Write `contents` to `path` through a temp file and rename.
///
/// Missing parent directories are created. Readers never observe a
/// partially written file.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let io_err = |source: std::io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| {
            f.write_all(contents.as_bytes())?;
            f.flush()
        })
        .map_err(|err| match err {
            atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => io_err(e),
        })?;

    log::info!("wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}
