//! Executor behavior: lifecycle transitions, sanitization, layer
//! injection, provider fallback, and failure classification

mod helpers;

use helpers::{call_log, engine_with, full_registry, wait_terminal, MockProvider};
use sonex_common::events::EngineEvent;
use sonex_common::types::{GenerationInput, JobKind, JobStatus, Layer};
use sonex_engine::{ProviderRegistry, QUOTA_MESSAGE};
use std::sync::Arc;
use tempfile::TempDir;

fn input(text: &str) -> GenerationInput {
    GenerationInput {
        text: text.to_string(),
        ..GenerationInput::default()
    }
}

#[tokio::test]
async fn lifecycle_passes_through_processing_to_completed() {
    let dir = TempDir::new().unwrap();
    let calls = call_log();
    let engine = engine_with(&dir, full_registry(&calls));
    let mut events = engine.subscribe_events();

    let job = engine.create_job(JobKind::Music, input("an upbeat tune"));
    assert_eq!(job.status, JobStatus::Queued);
    engine.enqueue(job.id);

    let done = wait_terminal(&engine, job.id).await;
    assert_eq!(done.status, JobStatus::Completed);
    assert!(done.result.is_some());
    assert!(done.error.is_none());

    // Event order proves the job never skipped processing
    let mut saw_queued = false;
    let mut saw_started = false;
    loop {
        let event = tokio::time::timeout(std::time::Duration::from_secs(2), events.recv())
            .await
            .expect("timed out waiting for lifecycle events")
            .expect("event stream closed");
        match event {
            EngineEvent::JobQueued { job_id, .. } if job_id == job.id => {
                assert!(!saw_started, "queued event after start");
                saw_queued = true;
            }
            EngineEvent::JobStarted { job_id, .. } if job_id == job.id => {
                assert!(saw_queued, "started before queued");
                saw_started = true;
            }
            EngineEvent::JobCompleted { job_id, .. } if job_id == job.id => {
                assert!(saw_started, "completed before started");
                break;
            }
            _ => {}
        }
    }
}

#[tokio::test]
async fn oversized_prompts_are_truncated_before_the_provider() {
    let dir = TempDir::new().unwrap();
    let calls = call_log();
    let engine = engine_with(&dir, full_registry(&calls));

    let long_prompt = "x".repeat(1500);
    let job = engine.submit(JobKind::Music, input(&long_prompt));
    let done = wait_terminal(&engine, job.id).await;
    assert_eq!(done.status, JobStatus::Completed);

    let recorded = calls.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].text.chars().count() <= 1000);
}

#[tokio::test]
async fn quota_failure_is_classified_with_fixed_message() {
    let dir = TempDir::new().unwrap();
    let calls = call_log();
    let registry = ProviderRegistry::new(Arc::new(
        MockProvider::new("cloud-audio", Arc::clone(&calls))
            .failing_with("monthly quota exceeded"),
    ));
    let engine = engine_with(&dir, registry);

    let job = engine.submit(JobKind::Music, input("anything"));
    let done = wait_terminal(&engine, job.id).await;

    assert_eq!(done.status, JobStatus::FailedQuota);
    assert_eq!(done.error.as_deref(), Some(QUOTA_MESSAGE));
    assert!(done.result.is_none());
}

#[tokio::test]
async fn http_401_is_classified_as_quota() {
    let dir = TempDir::new().unwrap();
    let calls = call_log();
    let registry = ProviderRegistry::new(Arc::new(
        MockProvider::new("cloud-audio", Arc::clone(&calls)).failing_with("upstream said 401"),
    ));
    let engine = engine_with(&dir, registry);

    let job = engine.submit(JobKind::Music, input("anything"));
    let done = wait_terminal(&engine, job.id).await;
    assert_eq!(done.status, JobStatus::FailedQuota);
}

#[tokio::test]
async fn generic_failure_keeps_the_raw_message() {
    let dir = TempDir::new().unwrap();
    let calls = call_log();
    let registry = ProviderRegistry::new(Arc::new(
        MockProvider::new("cloud-audio", Arc::clone(&calls)).failing_with("decoder melted"),
    ));
    let engine = engine_with(&dir, registry);

    let job = engine.submit(JobKind::Music, input("anything"));
    let done = wait_terminal(&engine, job.id).await;

    assert_eq!(done.status, JobStatus::Failed);
    assert_eq!(done.error.as_deref(), Some("decoder melted"));
}

#[tokio::test]
async fn unknown_provider_override_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    let calls = call_log();
    let engine = engine_with(&dir, full_registry(&calls));

    let job = engine.submit(
        JobKind::Music,
        GenerationInput {
            text: "anything".to_string(),
            provider: Some("plasma-9000".to_string()),
            ..GenerationInput::default()
        },
    );
    let done = wait_terminal(&engine, job.id).await;

    assert_eq!(done.status, JobStatus::Completed);
    let recorded = calls.lock().unwrap();
    assert_eq!(recorded[0].provider, "cloud-audio");
}

#[tokio::test]
async fn detected_style_injects_catalog_layers_and_rewards_memory() {
    let dir = TempDir::new().unwrap();
    let calls = call_log();
    let engine = engine_with(&dir, full_registry(&calls));

    let job = engine.submit(JobKind::Music, input("a moody cyberpunk drive"));
    let done = wait_terminal(&engine, job.id).await;

    assert_eq!(done.status, JobStatus::Completed);
    assert!(done.result.is_some());

    // The provider received the cyberpunk catalog layers...
    let recorded = calls.lock().unwrap();
    let prompts: Vec<_> = recorded[0].layers.iter().map(Layer::prompt).collect();
    assert_eq!(
        prompts,
        vec!["Deep Saw Bass", "Vangelis Synth Pad", "Neon Arpeggio"]
    );

    // ...the persisted job reflects them...
    let persisted: Vec<_> = done
        .input
        .layers
        .unwrap()
        .iter()
        .map(|l| l.prompt().to_string())
        .collect();
    assert_eq!(persisted[0], "Deep Saw Bass");

    // ...and adoption rewarded the style with the automatic delta
    let memory = engine.memory();
    assert!((memory.genres["cyberpunk"] - 0.55).abs() < 1e-6);
}

#[tokio::test]
async fn explicit_layers_suppress_injection_and_reward() {
    let dir = TempDir::new().unwrap();
    let calls = call_log();
    let engine = engine_with(&dir, full_registry(&calls));

    let job = engine.submit(
        JobKind::Music,
        GenerationInput {
            text: "a moody cyberpunk drive".to_string(),
            layers: Some(vec![Layer::Plain("My Custom Stem".to_string())]),
            ..GenerationInput::default()
        },
    );
    let done = wait_terminal(&engine, job.id).await;
    assert_eq!(done.status, JobStatus::Completed);

    let recorded = calls.lock().unwrap();
    assert_eq!(recorded[0].layers.len(), 1);
    assert_eq!(recorded[0].layers[0].prompt(), "My Custom Stem");

    // No discovery reward when the caller supplied layers
    assert!((engine.memory().genres["cyberpunk"] - 0.5).abs() < 1e-6);
}

#[tokio::test]
async fn speech_jobs_route_to_the_cloud_voice_provider() {
    let dir = TempDir::new().unwrap();
    let calls = call_log();
    let engine = engine_with(&dir, full_registry(&calls));

    let job = engine.submit(
        JobKind::Speech,
        GenerationInput {
            text: "Welcome back, commander".to_string(),
            voice_id: Some("narrator-2".to_string()),
            ..GenerationInput::default()
        },
    );
    let done = wait_terminal(&engine, job.id).await;
    assert_eq!(done.status, JobStatus::Completed);

    let recorded = calls.lock().unwrap();
    assert_eq!(recorded[0].provider, "cloud-voice");
    assert_eq!(recorded[0].kind, JobKind::Speech);
    assert_eq!(recorded[0].voice_id.as_deref(), Some("narrator-2"));
}

#[tokio::test]
async fn default_duration_applies_when_job_sets_none() {
    let dir = TempDir::new().unwrap();
    let calls = call_log();
    let engine = engine_with(&dir, full_registry(&calls));

    let job = engine.submit(JobKind::Music, input("an upbeat tune"));
    wait_terminal(&engine, job.id).await;

    let recorded = calls.lock().unwrap();
    assert_eq!(recorded[0].duration_secs, 10);
}
