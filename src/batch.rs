//! Batch processing of reel requests with per-task failure isolation.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::generate::ReelRequest;
use crate::llm::LlmClient;
use crate::reel;
use crate::render::Renderer;
use crate::{rlog, rlog_error, rlog_warn, Error, Result};

/// Target length used when a task does not specify one.
pub const DEFAULT_TASK_LENGTH_SECS: u32 = 30;

/// One entry of the batch input file.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchTask {
    pub concept: String,
    pub description: String,
    #[serde(default = "default_length")]
    pub length: u32,
    #[serde(default, alias = "outputName")]
    pub output_name: Option<String>,
}

fn default_length() -> u32 {
    DEFAULT_TASK_LENGTH_SECS
}

/// Terminal state of one batch task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Completed(PathBuf),
    Skipped(String),
    Failed(String),
}

/// Ledger entry for one task, in input order.
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub concept: String,
    pub status: TaskStatus,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, TaskStatus::Completed(_))
    }
}

/// Load the batch file as an ordered list of raw task objects.
///
/// # Errors
///
/// Returns [`Error::InvalidBatch`] when the file is missing, is not valid
/// JSON, or does not decode to an array. These are fatal to the whole batch;
/// per-task problems are handled in [`run_batch`].
pub fn load_tasks(path: &Path) -> Result<Vec<serde_json::Value>> {
    if !path.exists() {
        return Err(Error::InvalidBatch(format!(
            "batch file not found: {}",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| Error::InvalidBatch(format!("not valid JSON: {e}")))?;
    match value {
        serde_json::Value::Array(items) => Ok(items),
        _ => Err(Error::InvalidBatch(
            "batch file must contain a JSON array of task objects".to_string(),
        )),
    }
}

/// Process every task in input order, isolating failures per task.
///
/// A task with missing required fields is skipped; a task whose pipeline
/// errors is recorded as failed; the batch always continues to the next
/// task. A fixed cooldown runs between processed tasks (never after the
/// last) to go easy on the model and render engine.
pub async fn run_batch(
    config: &Config,
    client: &dyn LlmClient,
    renderer: &Renderer,
    path: &Path,
) -> Result<Vec<TaskOutcome>> {
    let tasks = load_tasks(path)?;
    let total = tasks.len();
    println!("Starting batch: {total} reels queued");
    rlog!("batch start: {} tasks from {}", total, path.display());

    let mut outcomes = Vec::with_capacity(total);
    for (index, raw) in tasks.into_iter().enumerate() {
        let concept = raw
            .get("concept")
            .and_then(|v| v.as_str())
            .unwrap_or("<unknown>")
            .to_string();

        let task = match decode_task(raw) {
            Ok(task) => task,
            Err(reason) => {
                println!("Skipping task {}/{}: {}", index + 1, total, reason);
                rlog_warn!("batch task {} ('{}') skipped: {}", index + 1, concept, reason);
                outcomes.push(TaskOutcome {
                    concept,
                    status: TaskStatus::Skipped(reason),
                });
                continue;
            }
        };

        println!("\n>>> Task {}/{}: {}", index + 1, total, task.concept);
        let request = ReelRequest {
            concept: task.concept.clone(),
            description: task.description,
            length_secs: task.length,
            output_name: task.output_name,
            template: None,
        };

        match reel::create_reel(config, client, renderer, &request).await {
            Ok(video) => outcomes.push(TaskOutcome {
                concept: task.concept,
                status: TaskStatus::Completed(video),
            }),
            Err(e) => {
                println!("FAILED task {}: {e}", task.concept);
                rlog_error!("batch task '{}' failed: {e}", task.concept);
                outcomes.push(TaskOutcome {
                    concept: task.concept,
                    status: TaskStatus::Failed(e.to_string()),
                });
            }
        }

        if index + 1 < total {
            rlog!("cooling down {:?} before next task", config.batch_cooldown());
            tokio::time::sleep(config.batch_cooldown()).await;
        }
    }

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    println!("\nBatch complete: {succeeded}/{total} reels rendered");
    rlog!("batch complete: {}/{} succeeded", succeeded, total);
    Ok(outcomes)
}

fn decode_task(raw: serde_json::Value) -> std::result::Result<BatchTask, String> {
    let task: BatchTask = serde_json::from_value(raw)
        .map_err(|e| format!("missing or invalid field: {e}"))?;
    if task.concept.trim().is_empty() {
        return Err("empty 'concept'".to_string());
    }
    if task.description.trim().is_empty() {
        return Err("empty 'description'".to_string());
    }
    Ok(task)
}
