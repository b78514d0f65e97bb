//! End-to-end intake tests over mock transport and runner.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use clipstitch_core::pipeline::{MergePipeline, PipelineConfig, WatermarkSpec};
use clipstitch_core::runner::RunnerError;
use clipstitch_core::session::{SessionStore, UserId};
use clipstitch_core::testing::{MockRunner, MockTransport, RecordedReply};
use clipstitch_core::IntakeController;

struct Harness {
    controller: IntakeController<MockRunner, MockTransport>,
    transport: Arc<MockTransport>,
    runner: Arc<MockRunner>,
    work_dir: PathBuf,
    _tempdir: tempfile::TempDir,
}

fn harness() -> Harness {
    let tempdir = tempfile::tempdir().unwrap();
    let work_dir = tempdir.path().to_path_buf();
    let transport = Arc::new(MockTransport::new());
    let runner = Arc::new(MockRunner::new());
    let pipeline = MergePipeline::new(
        PipelineConfig::default().with_work_dir(work_dir.clone()),
        Arc::clone(&runner),
        WatermarkSpec::default(),
    );
    let controller = IntakeController::new(
        Arc::new(SessionStore::new()),
        pipeline,
        Arc::clone(&transport),
    );
    Harness {
        controller,
        transport,
        runner,
        work_dir,
        _tempdir: tempdir,
    }
}

/// Maps each file in the work dir to its contents (the mock transport
/// writes the file id as the downloaded clip's contents).
fn files_by_content(dir: &std::path::Path) -> HashMap<String, PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let path = entry.unwrap().path();
            (std::fs::read_to_string(&path).unwrap(), path)
        })
        .collect()
}

fn work_dir_file_count(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[tokio::test]
async fn test_three_clips_merge_end_to_end() {
    let h = harness();
    let user = UserId(100);

    for file_id in ["c1", "c2", "c3"] {
        h.controller.handle_clip(user, file_id).await;
    }

    let texts = h.transport.texts_for(user).await;
    assert_eq!(texts.len(), 3);
    assert!(texts[2].contains("3 pending"));

    // Remember which path holds which clip before the merge consumes them.
    let clips = files_by_content(&h.work_dir);
    assert_eq!(clips.len(), 3);

    h.controller.handle_merge(user).await;

    // Concat ran over the clips in send order.
    let manifests = h.runner.recorded_manifests().await;
    assert_eq!(manifests.len(), 1);
    let listed: Vec<&str> = manifests[0]
        .lines()
        .map(|line| {
            line.strip_prefix("file '")
                .and_then(|rest| rest.strip_suffix('\''))
                .unwrap()
        })
        .collect();
    let expected: Vec<String> = ["c1", "c2", "c3"]
        .iter()
        .map(|id| clips[*id].to_string_lossy().into_owned())
        .collect();
    assert_eq!(listed, expected);

    // Watermark ran on the concat output.
    let invocations = h.runner.recorded_invocations().await;
    assert_eq!(invocations.len(), 2);
    let merged = invocations[0].last().unwrap().clone();
    let input_pos = invocations[1].iter().position(|a| a == "-i").unwrap();
    assert_eq!(invocations[1][input_pos + 1], merged);

    // Exactly one video reply, and the file existed when it was sent.
    let videos = h.transport.videos_for(user).await;
    assert_eq!(videos.len(), 1);
    match &videos[0] {
        RecordedReply::Video { existed, .. } => assert!(existed),
        other => panic!("unexpected reply: {:?}", other),
    }

    // Session is empty again and nothing is left on disk.
    assert_eq!(work_dir_file_count(&h.work_dir), 0);
    h.controller.handle_merge(user).await;
    let texts = h.transport.texts_for(user).await;
    assert!(texts.last().unwrap().contains("you have 0"));
}

#[tokio::test]
async fn test_merge_with_no_clips_creates_nothing() {
    let h = harness();
    let user = UserId(1);

    h.controller.handle_merge(user).await;

    assert_eq!(h.runner.invocation_count().await, 0);
    let texts = h.transport.texts_for(user).await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Need at least 2"));
}

#[tokio::test]
async fn test_merge_with_one_clip_keeps_session() {
    let h = harness();
    let user = UserId(2);

    h.controller.handle_clip(user, "solo").await;
    h.controller.handle_merge(user).await;

    assert_eq!(h.runner.invocation_count().await, 0);
    let texts = h.transport.texts_for(user).await;
    assert!(texts.last().unwrap().contains("you have 1"));
    // The pending clip is still on disk, ready for the next attempt.
    assert_eq!(work_dir_file_count(&h.work_dir), 1);
}

#[tokio::test]
async fn test_watermark_failure_cleans_up_and_reports() {
    let h = harness();
    let user = UserId(3);

    h.controller.handle_clip(user, "c1").await;
    h.controller.handle_clip(user, "c2").await;
    h.runner
        .fail_call(1, RunnerError::command_failed(Some(1), "font not found"))
        .await;

    h.controller.handle_merge(user).await;

    // Both stages were attempted, no video was delivered, and the user got
    // a failure reply.
    assert_eq!(h.runner.invocation_count().await, 2);
    assert!(h.transport.videos_for(user).await.is_empty());
    let texts = h.transport.texts_for(user).await;
    assert!(texts.last().unwrap().contains("went wrong"));

    // No artifacts or inputs survive, and the session was cleared.
    assert_eq!(work_dir_file_count(&h.work_dir), 0);
    h.controller.handle_merge(user).await;
    let texts = h.transport.texts_for(user).await;
    assert!(texts.last().unwrap().contains("you have 0"));
}

#[tokio::test]
async fn test_reset_removes_files_and_empties_session() {
    let h = harness();
    let user = UserId(4);

    h.controller.handle_clip(user, "c1").await;
    h.controller.handle_clip(user, "c2").await;
    assert_eq!(work_dir_file_count(&h.work_dir), 2);

    h.controller.handle_reset(user).await;

    assert_eq!(work_dir_file_count(&h.work_dir), 0);
    let texts = h.transport.texts_for(user).await;
    assert!(texts.last().unwrap().contains("Discarded 2"));

    // A second reset is a harmless no-op.
    h.controller.handle_reset(user).await;
    let texts = h.transport.texts_for(user).await;
    assert_eq!(texts.last().unwrap(), "Nothing to discard.");
}

#[tokio::test]
async fn test_concurrent_users_merge_independently() {
    let h = harness();
    let controller = Arc::new(h.controller);

    let mut handles = Vec::new();
    for user_id in 1..=3i64 {
        let controller = Arc::clone(&controller);
        handles.push(tokio::spawn(async move {
            let user = UserId(user_id);
            controller
                .handle_clip(user, &format!("u{}-a", user_id))
                .await;
            controller
                .handle_clip(user, &format!("u{}-b", user_id))
                .await;
            controller.handle_merge(user).await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // Each user got exactly one video; all artifacts are gone.
    for user_id in 1..=3i64 {
        assert_eq!(h.transport.videos_for(UserId(user_id)).await.len(), 1);
    }
    assert_eq!(h.runner.invocation_count().await, 6);
    assert_eq!(work_dir_file_count(&h.work_dir), 0);
}
