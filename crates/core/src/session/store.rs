use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::types::{ClipRef, UserId};

/// Result of a conditional drain.
#[derive(Debug)]
pub enum DrainOutcome {
    /// The whole session was taken; the store entry is now empty.
    Drained(Vec<ClipRef>),
    /// Fewer clips than requested were pending; the session is untouched.
    TooFew(usize),
}

/// Concurrency-safe map from user to that user's pending clips.
///
/// Structure: an outer read-mostly map from user to a per-user mutex over
/// the clip list. Operations on different users never contend on the same
/// inner lock; operations on the same user are mutually exclusive, so a
/// session is never observed half-mutated and a given snapshot is delivered
/// to exactly one drainer.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<UserId, Arc<Mutex<Vec<ClipRef>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the per-user slot, creating it on first use.
    async fn slot(&self, user: UserId) -> Arc<Mutex<Vec<ClipRef>>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(slot) = sessions.get(&user) {
                return Arc::clone(slot);
            }
        }
        let mut sessions = self.sessions.write().await;
        Arc::clone(sessions.entry(user).or_default())
    }

    /// Appends a clip to the end of the user's session, creating the
    /// session if absent. Returns the new pending count.
    pub async fn append(&self, clip: ClipRef) -> usize {
        let slot = self.slot(clip.user()).await;
        let mut clips = slot.lock().await;
        clips.push(clip);
        clips.len()
    }

    /// Atomically returns the user's clips and resets the session to empty.
    ///
    /// Returns an empty vec for an unknown user. With respect to concurrent
    /// `append` and drain calls on the same user this is one indivisible
    /// operation.
    pub async fn snapshot_and_clear(&self, user: UserId) -> Vec<ClipRef> {
        let slot = {
            let sessions = self.sessions.read().await;
            match sessions.get(&user) {
                Some(slot) => Arc::clone(slot),
                None => return Vec::new(),
            }
        };
        let mut clips = slot.lock().await;
        std::mem::take(&mut *clips)
    }

    /// Atomically takes the whole session when it holds at least `min`
    /// clips, otherwise leaves it untouched and reports the current count.
    pub async fn drain_ready(&self, user: UserId, min: usize) -> DrainOutcome {
        let slot = {
            let sessions = self.sessions.read().await;
            match sessions.get(&user) {
                Some(slot) => Arc::clone(slot),
                None => return DrainOutcome::TooFew(0),
            }
        };
        let mut clips = slot.lock().await;
        if clips.len() >= min {
            DrainOutcome::Drained(std::mem::take(&mut *clips))
        } else {
            DrainOutcome::TooFew(clips.len())
        }
    }

    /// Clears the user's session, returning the clips so the caller can
    /// drop them (which deletes the underlying files).
    pub async fn discard(&self, user: UserId) -> Vec<ClipRef> {
        self.snapshot_and_clear(user).await
    }

    /// Number of clips currently pending for `user`.
    pub async fn pending_count(&self, user: UserId) -> usize {
        let slot = {
            let sessions = self.sessions.read().await;
            match sessions.get(&user) {
                Some(slot) => Arc::clone(slot),
                None => return 0,
            }
        };
        let clips = slot.lock().await;
        clips.len()
    }

    /// Number of users with a (possibly empty) session entry.
    pub async fn user_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scratch::ScratchFile;
    use std::path::Path;

    fn clip(user: UserId, dir: &Path, tag: &str) -> ClipRef {
        let file = ScratchFile::allocate(dir, tag, "mp4");
        std::fs::write(file.path(), tag.as_bytes()).unwrap();
        ClipRef::new(user, file)
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new();
        let user = UserId(1);

        assert_eq!(store.append(clip(user, dir.path(), "a")).await, 1);
        assert_eq!(store.append(clip(user, dir.path(), "b")).await, 2);
        assert_eq!(store.append(clip(user, dir.path(), "c")).await, 3);

        let clips = store.snapshot_and_clear(user).await;
        let tags: Vec<String> = clips
            .iter()
            .map(|c| std::fs::read_to_string(c.path()).unwrap())
            .collect();
        assert_eq!(tags, vec!["a", "b", "c"]);
        assert_eq!(store.pending_count(user).await, 0);
    }

    #[tokio::test]
    async fn test_snapshot_and_clear_unknown_user() {
        let store = SessionStore::new();
        assert!(store.snapshot_and_clear(UserId(42)).await.is_empty());
        assert_eq!(store.pending_count(UserId(42)).await, 0);
    }

    #[tokio::test]
    async fn test_drain_ready_below_minimum_leaves_session_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new();
        let user = UserId(2);
        store.append(clip(user, dir.path(), "only")).await;

        match store.drain_ready(user, 2).await {
            DrainOutcome::TooFew(have) => assert_eq!(have, 1),
            DrainOutcome::Drained(_) => panic!("must not drain below minimum"),
        }
        assert_eq!(store.pending_count(user).await, 1);
    }

    #[tokio::test]
    async fn test_drain_ready_unknown_user_reports_zero() {
        let store = SessionStore::new();
        match store.drain_ready(UserId(3), 2).await {
            DrainOutcome::TooFew(have) => assert_eq!(have, 0),
            DrainOutcome::Drained(_) => panic!("nothing to drain"),
        }
    }

    #[tokio::test]
    async fn test_concurrent_appends_to_distinct_users_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SessionStore::new());

        let mut handles = Vec::new();
        for user_id in 0..8i64 {
            let store = Arc::clone(&store);
            let dir = dir.path().to_path_buf();
            handles.push(tokio::spawn(async move {
                for i in 0..20 {
                    let tag = format!("u{}-{}", user_id, i);
                    store.append(clip(UserId(user_id), &dir, &tag)).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        for user_id in 0..8i64 {
            let clips = store.snapshot_and_clear(UserId(user_id)).await;
            assert_eq!(clips.len(), 20);
            for (i, c) in clips.iter().enumerate() {
                let tag = std::fs::read_to_string(c.path()).unwrap();
                assert_eq!(tag, format!("u{}-{}", user_id, i));
            }
        }
    }

    #[tokio::test]
    async fn test_concurrent_drains_deliver_snapshot_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SessionStore::new());
        let user = UserId(9);
        for tag in ["a", "b", "c"] {
            store.append(clip(user, dir.path(), tag)).await;
        }

        let mut handles = Vec::new();
        for _ in 0..4 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(
                async move { store.snapshot_and_clear(user).await },
            ));
        }

        let mut non_empty = 0;
        for handle in handles {
            let clips = handle.await.unwrap();
            match clips.len() {
                0 => {}
                3 => non_empty += 1,
                n => panic!("partial snapshot of {} clips", n),
            }
        }
        assert_eq!(non_empty, 1);
        assert_eq!(store.pending_count(user).await, 0);
    }
}
