use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scratch::ScratchFile;

/// Telegram chat/user identifier. Opaque beyond equality and hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One saved input clip, owning its file on disk.
///
/// The backing file is deleted when the `ClipRef` is dropped: after a merge
/// consumed it, on explicit discard, or on pipeline failure cleanup.
#[derive(Debug)]
pub struct ClipRef {
    user: UserId,
    file: ScratchFile,
}

impl ClipRef {
    pub fn new(user: UserId, file: ScratchFile) -> Self {
        Self { user, file }
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    /// Absolute path of the clip file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
