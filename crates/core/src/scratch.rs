//! Owned handles to files in the scratch directory.
//!
//! Every artifact the bot puts on disk (downloaded clips, concat manifests,
//! merged intermediates, final outputs) is named through a [`ScratchFile`],
//! which deletes the backing file exactly once when dropped. Holding the
//! handle is holding the file; giving it away gives the cleanup duty away.

use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

/// A file on disk that is deleted when this handle is dropped.
///
/// The handle only reserves a unique name; creating the file is up to the
/// caller (a download, `tokio::fs::write`, or an ffmpeg output argument).
/// Dropping a handle whose file was never created is a no-op.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    armed: bool,
}

impl ScratchFile {
    /// Reserves a fresh uniquely-named path under `dir`.
    ///
    /// The name embeds a v4 UUID so concurrent pipeline runs never collide.
    pub fn allocate(dir: &Path, prefix: &str, extension: &str) -> Self {
        let name = format!("{}-{}.{}", prefix, Uuid::new_v4(), extension);
        Self {
            path: dir.join(name),
            armed: true,
        }
    }

    /// Takes ownership of an existing path.
    pub fn adopt(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    /// The absolute path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Releases the path without deleting the file.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }

    /// Deletes the backing file now instead of at drop time.
    pub fn remove(mut self) {
        self.delete_once();
    }

    fn delete_once(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            // Never created, or already consumed by an external process.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to delete scratch file"),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        self.delete_once();
    }
}
