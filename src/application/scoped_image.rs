//! Downloaded images held in uniquely named temporary files.
//!
//! The file exists only as long as the [`ScopedImage`] value; every exit
//! path of a unit of work removes it, panics and early returns included.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A temporary image file, deleted on drop.
#[derive(Debug)]
pub struct ScopedImage {
    file: NamedTempFile,
}

impl ScopedImage {
    /// Writes `bytes` to a new unique file under `dir`.
    pub async fn write(dir: &Path, bytes: Vec<u8>) -> io::Result<Self> {
        let dir: PathBuf = dir.to_path_buf();
        tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&dir)?;
            let mut file = tempfile::Builder::new()
                .prefix("expiry-")
                .suffix(".jpg")
                .tempfile_in(&dir)?;
            file.write_all(&bytes)?;
            file.flush()?;
            Ok(Self { file })
        })
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Removes the file now, reporting failure instead of ignoring it.
    pub fn close(self) -> io::Result<()> {
        self.file.close()
    }
}
