// crates/orchestrator/tests/generation_flow.rs
//! End-to-end flows against a mock generation service: launcher request →
//! routing → start → poll → saved list, plus reload-resume.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use studio_client::PollConfig;
use studio_orchestrator::{
    GenerationModule, ModuleEvent, Orchestrator, StudioConfig,
};
use studio_types::{ContentKind, JobStatus, Signal};

fn fast_config(url: String) -> StudioConfig {
    StudioConfig {
        poll: PollConfig {
            initial_interval: Duration::from_millis(5),
            flat_attempts: 5,
            growth: 1.2,
            max_interval: Duration::from_millis(10),
        },
        ..StudioConfig::for_url(url)
    }
}

async fn wait_for_completed(
    events: &mut tokio::sync::broadcast::Receiver<ModuleEvent>,
) -> studio_types::Job {
    let deadline = Duration::from_secs(5);
    tokio::time::timeout(deadline, async {
        loop {
            match events.recv().await.expect("event channel closed") {
                ModuleEvent::Completed { job } => return job,
                ModuleEvent::Failed { error } => panic!("generation failed: {error}"),
                ModuleEvent::Progress { .. } => {}
            }
        }
    })
    .await
    .expect("timed out waiting for completion")
}

/// Status mock: `processing` for the first `ready_after` hits, then `ready`
/// carrying the given result payload.
async fn status_sequence_mock(
    server: &mut mockito::ServerGuard,
    path: &str,
    kind_tag: &'static str,
    ready_after: u32,
    result: &'static str,
) -> Arc<AtomicU32> {
    let hits = Arc::new(AtomicU32::new(0));
    let hits_in_mock = Arc::clone(&hits);
    server
        .mock("GET", path)
        .with_body_from_request(move |_| {
            let status = if hits_in_mock.fetch_add(1, Ordering::SeqCst) < ready_after {
                "processing"
            } else {
                "ready"
            };
            format!(
                r#"{{"success": true, "job": {{
                    "id": "j-1", "kind": "{kind_tag}", "status": "{status}",
                    "source_id": "src-1", "result": {result}
                }}}}"#
            )
            .into_bytes()
        })
        .create_async()
        .await;
    hits
}

#[tokio::test]
async fn quiz_request_runs_to_saved_list() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/quizzes/generate")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "source_id": "src-1",
            "direction": "quiz me on chapter 3",
        })))
        .with_body(r#"{"success": true, "job_id": "j-1"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/quizzes/jobs")
        .with_body(r#"{"success": true, "jobs": []}"#)
        .create_async()
        .await;
    let hits = status_sequence_mock(
        &mut server,
        "/quizzes/jobs/j-1",
        "quiz",
        5,
        r#"{"question_count": 10}"#,
    )
    .await;

    let orch = Orchestrator::new(fast_config(server.url()));
    let module = GenerationModule::new(
        ContentKind::Quiz,
        reqwest::Client::new(),
        fast_config(server.url()),
    );
    orch.register(module.kind(), module.handler());
    module.mount().await;

    let mut events = module.subscribe();
    orch.replace_signals(vec![Signal::new("quiz me on chapter 3", "src-1")]);
    orch.request_generation(
        ContentKind::Quiz,
        vec![Signal::new("quiz me on chapter 3", "src-1")],
    );

    let job = wait_for_completed(&mut events).await;
    assert_eq!(job.result.as_ref().unwrap()["question_count"], 10);
    // Five processing snapshots, then the terminal fetch.
    assert_eq!(hits.load(Ordering::SeqCst), 6);

    // Saved list gained the job at index 0; the in-flight slot is empty;
    // the job's source is visible under the current signal set.
    let saved = module.saved_jobs();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, "j-1");
    assert_eq!(saved[0].status, JobStatus::Ready);
    assert!(module.in_flight().is_none());
    assert!(!module.is_busy());
    assert_eq!(module.visible_jobs(&orch.source_index()).len(), 1);
}

#[tokio::test]
async fn blog_disambiguation_dispatches_only_the_chosen_signal() {
    let mut server = mockito::Server::new_async().await;
    // Only the chosen direction may ever reach the service.
    let start = server
        .mock("POST", "/blog-posts/generate")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "direction": "post about pricing",
            "source_id": "src-2",
        })))
        .with_body(r#"{"success": true, "job_id": "j-1"}"#)
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/blog-posts/jobs")
        .with_body(r#"{"success": true, "jobs": []}"#)
        .create_async()
        .await;
    status_sequence_mock(&mut server, "/blog-posts/jobs/j-1", "blog_post", 1, "{}").await;

    let orch = Orchestrator::new(fast_config(server.url()));
    let module = GenerationModule::new(
        ContentKind::BlogPost,
        reqwest::Client::new(),
        fast_config(server.url()),
    );
    orch.register(module.kind(), module.handler());
    module.mount().await;
    let mut events = module.subscribe();

    let sig_a = Signal::new("post about launch", "src-1");
    let sig_b = Signal::new("post about pricing", "src-2");
    orch.request_generation(ContentKind::BlogPost, vec![sig_a, sig_b.clone()]);

    let picker = orch.picker();
    assert!(picker.is_open_for(ContentKind::BlogPost));
    assert_eq!(picker.candidates.len(), 2);

    orch.on_select_signal(ContentKind::BlogPost, sig_b);
    assert!(!orch.picker().open);

    wait_for_completed(&mut events).await;
    start.assert_async().await;
}

#[tokio::test]
async fn reload_resumes_in_flight_job_without_restarting_it() {
    let mut server = mockito::Server::new_async().await;
    // The server still knows about a running video job; `start` must never
    // be called again for it.
    let start = server
        .mock("POST", "/video-overviews/generate")
        .expect(0)
        .create_async()
        .await;
    server
        .mock("GET", "/video-overviews/jobs")
        .with_body(
            r#"{"success": true, "jobs": [
                {"id": "j-1", "kind": "video_overview", "status": "processing",
                 "source_id": "src-1"}
            ]}"#,
        )
        .expect(2)
        .create_async()
        .await;
    let hits = status_sequence_mock(
        &mut server,
        "/video-overviews/jobs/j-1",
        "video_overview",
        2,
        r#"{"duration_seconds": 93}"#,
    )
    .await;

    let module = GenerationModule::new(
        ContentKind::VideoOverview,
        reqwest::Client::new(),
        fast_config(server.url()),
    );
    let mut events = module.subscribe();

    // Fast double-mount: exactly one poll loop may adopt the job.
    tokio::join!(module.mount(), module.mount());

    let job = wait_for_completed(&mut events).await;
    assert_eq!(job.id, "j-1");
    // 2 processing + 1 ready. A duplicated loop would roughly double this.
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert!(module.in_flight().is_none());
    assert_eq!(module.saved_jobs().len(), 1);
    start.assert_async().await;
}

#[tokio::test]
async fn mount_on_registers_and_loads_in_background() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/quizzes/jobs")
        .with_body(
            r#"{"success": true, "jobs": [
                {"id": "j-1", "kind": "quiz", "status": "ready", "source_id": "src-1"}
            ]}"#,
        )
        .create_async()
        .await;

    let orch = Orchestrator::new(fast_config(server.url()));
    let module = GenerationModule::new(
        ContentKind::Quiz,
        reqwest::Client::new(),
        fast_config(server.url()),
    );
    module.mount_on(&orch);

    assert!(orch.is_registered(ContentKind::Quiz));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(module.saved_jobs().len(), 1);
}

#[tokio::test]
async fn failed_job_surfaces_its_message_and_clears_the_slot() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/wireframes/generate")
        .with_body(r#"{"success": true, "job_id": "j-1"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/wireframes/jobs")
        .with_body(r#"{"success": true, "jobs": []}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/wireframes/jobs/j-1")
        .with_body(
            r#"{"success": true, "job": {
                "id": "j-1", "kind": "wireframe", "status": "error",
                "source_id": "src-1", "error_message": "layout engine crashed"
            }}"#,
        )
        .create_async()
        .await;

    let module = GenerationModule::new(
        ContentKind::Wireframe,
        reqwest::Client::new(),
        fast_config(server.url()),
    );
    module.mount().await;
    let mut events = module.subscribe();

    let err = module
        .invoke(Signal::new("wireframe the dashboard", "src-1"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "generation failed: layout engine crashed");

    // Failed terminal jobs are not appended locally; they become visible on
    // the next mount for kinds that keep failures.
    assert!(module.saved_jobs().is_empty());
    assert!(!module.is_busy());

    let saw_failure = loop {
        match events.try_recv() {
            Ok(ModuleEvent::Failed { error }) => break error.to_string().contains("layout engine"),
            Ok(_) => continue,
            Err(_) => break false,
        }
    };
    assert!(saw_failure);
}
