//! Batch runner failure isolation and ledger tests.

use std::time::{Duration, Instant};

use crate::fixtures::{plan_json, QueueClient, TestEnv, ERROR_MARKER};
use mathreel::batch::{self, TaskStatus};
use mathreel::Error;

#[tokio::test]
async fn test_failing_task_does_not_abort_batch() {
    let env = TestEnv::new();
    let batch_file = env.write_batch(
        r#"[
            {"concept": "Alpha", "description": "first"},
            {"concept": "Beta", "description": "second"},
            {"concept": "Gamma", "description": "third"}
        ]"#,
    );
    // Beta's scene trips the stub renderer's failure marker
    let client = QueueClient::new([
        plan_json("self.add(Circle())", 10),
        plan_json("# FAIL_RENDER\nself.add(Square())", 10),
        plan_json("self.add(Triangle())", 10),
    ]);

    let outcomes = batch::run_batch(&env.config, &client, &env.renderer, &batch_file)
        .await
        .expect("batch run failed");

    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes.iter().map(|o| o.concept.as_str()).collect::<Vec<_>>(),
        ["Alpha", "Beta", "Gamma"]
    );
    assert!(outcomes[0].is_success());
    assert!(matches!(outcomes[1].status, TaskStatus::Failed(_)));
    assert!(outcomes[2].is_success());

    assert!(env.output_root().join("alpha/final_reel.mp4").exists());
    assert!(!env.output_root().join("beta/final_reel.mp4").exists());
    assert!(env.output_root().join("gamma/final_reel.mp4").exists());
}

#[tokio::test]
async fn test_model_failure_is_isolated_too() {
    let env = TestEnv::new();
    let batch_file = env.write_batch(
        r#"[
            {"concept": "Alpha", "description": "first"},
            {"concept": "Beta", "description": "second"}
        ]"#,
    );
    let client = QueueClient::new([
        format!("{ERROR_MARKER} model unavailable"),
        plan_json("self.add(Circle())", 10),
    ]);

    let outcomes = batch::run_batch(&env.config, &client, &env.renderer, &batch_file)
        .await
        .expect("batch run failed");

    assert!(matches!(outcomes[0].status, TaskStatus::Failed(_)));
    assert!(outcomes[1].is_success());
}

#[tokio::test]
async fn test_invalid_tasks_skipped_not_fatal() {
    let env = TestEnv::new();
    let batch_file = env.write_batch(
        r#"[
            {"concept": "No Description"},
            {"concept": "Valid", "description": "works"}
        ]"#,
    );
    let client = QueueClient::new([plan_json("self.add(Circle())", 10)]);

    let outcomes = batch::run_batch(&env.config, &client, &env.renderer, &batch_file)
        .await
        .expect("batch run failed");

    assert_eq!(outcomes.len(), 2);
    assert!(matches!(outcomes[0].status, TaskStatus::Skipped(_)));
    assert!(outcomes[1].is_success());
}

#[tokio::test]
async fn test_cooldown_runs_between_tasks_never_after_last() {
    let mut env = TestEnv::new();
    env.config.batch_cooldown_secs = Some(1);
    let batch_file = env.write_batch(
        r#"[
            {"concept": "Alpha", "description": "first"},
            {"concept": "Beta", "description": "second"},
            {"concept": "Gamma", "description": "third"}
        ]"#,
    );
    let client = QueueClient::new([
        plan_json("self.add(Circle())", 10),
        plan_json("self.add(Square())", 10),
        plan_json("self.add(Triangle())", 10),
    ]);

    let start = Instant::now();
    let outcomes = batch::run_batch(&env.config, &client, &env.renderer, &batch_file)
        .await
        .expect("batch run failed");
    let elapsed = start.elapsed();

    assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 3);
    // Two cooldowns for three tasks: between 1-2 and 2-3, none after 3
    assert!(
        elapsed >= Duration::from_secs(2),
        "expected two cooldowns, batch finished in {elapsed:?}"
    );
    assert!(
        elapsed < Duration::from_secs(3),
        "a cooldown ran after the last task, batch took {elapsed:?}"
    );
}

#[tokio::test]
async fn test_malformed_batch_file_is_fatal() {
    let env = TestEnv::new();
    let client = QueueClient::new(Vec::<String>::new());

    let not_json = env.write_batch("definitely not json");
    let err = batch::run_batch(&env.config, &client, &env.renderer, &not_json)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidBatch(_)));

    let not_a_list = env.write_batch(r#"{"concept": "x", "description": "y"}"#);
    let err = batch::run_batch(&env.config, &client, &env.renderer, &not_a_list)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidBatch(_)));
}

#[tokio::test]
async fn test_missing_batch_file_is_fatal() {
    let env = TestEnv::new();
    let client = QueueClient::new(Vec::<String>::new());
    let err = batch::run_batch(
        &env.config,
        &client,
        &env.renderer,
        &env.temp.path().join("missing.json"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::InvalidBatch(_)));
}
