//! Test fixtures for integration tests.
//!
//! Provides a queue-backed mock model client, a stub render script that
//! mimics manim's media-tree output layout, and a self-contained temp
//! environment (config + renderer) per test.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

use mathreel::config::Config;
use mathreel::llm::{LlmClient, LlmRequest};
use mathreel::render::Renderer;
use mathreel::{Error, Result};

/// Responses beginning with this marker make the mock client fail the call.
pub const ERROR_MARKER: &str = "<<ERROR>>";

/// Mock model client that pops one canned response per call.
///
/// An exhausted queue fails the call, as does a response starting with
/// [`ERROR_MARKER`]; both mimic an outright model-call failure.
pub struct QueueClient {
    responses: Mutex<VecDeque<String>>,
}

impl QueueClient {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl LlmClient for QueueClient {
    async fn complete(&self, _request: LlmRequest) -> Result<String> {
        let next = self
            .responses
            .lock()
            .expect("response queue poisoned")
            .pop_front()
            .ok_or_else(|| Error::Api("mock response queue exhausted".to_string()))?;
        if let Some(message) = next.strip_prefix(ERROR_MARKER) {
            return Err(Error::Api(message.trim().to_string()));
        }
        Ok(next)
    }
}

/// A temp directory with a ready-to-use config and stub renderer.
pub struct TestEnv {
    pub temp: TempDir,
    pub config: Config,
    pub renderer: Renderer,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp directory");
        let output_root = temp.path().join("output");
        fs::create_dir_all(&output_root).expect("failed to create output root");

        let config = Config {
            output_dir: Some(output_root.to_string_lossy().into_owned()),
            model: None,
            render_command: None,
            batch_cooldown_secs: Some(0),
        };
        let renderer = Renderer::with_binary(write_stub_renderer(temp.path()));

        Self {
            temp,
            config,
            renderer,
        }
    }

    pub fn output_root(&self) -> PathBuf {
        self.temp.path().join("output")
    }

    pub fn write_batch(&self, contents: &str) -> PathBuf {
        let path = self.temp.path().join("batch.json");
        fs::write(&path, contents).expect("failed to write batch file");
        path
    }
}

/// Write a stand-in for the manim binary.
///
/// It honors the `--media_dir` and `-o` arguments, drops a fake mp4 into a
/// nested media subtree like the real engine does, and exits non-zero when
/// the scene module contains `FAIL_RENDER`.
fn write_stub_renderer(dir: &Path) -> PathBuf {
    let script = r#"#!/bin/sh
media=""
out="final_reel.mp4"
prev=""
scene=""
for arg in "$@"; do
    case "$prev" in
        --media_dir) media="$arg" ;;
        -o) out="$arg" ;;
    esac
    prev="$arg"
done
i=0
scene_index=$(($# - 1))
for arg in "$@"; do
    i=$((i+1))
    if [ "$i" -eq "$scene_index" ]; then scene="$arg"; fi
done
if grep -q FAIL_RENDER "$scene" 2>/dev/null; then
    echo "simulated render crash" >&2
    exit 3
fi
mkdir -p "$media/videos/scene/1080p60"
printf 'fake video' > "$media/videos/scene/1080p60/$out"
exit 0
"#;
    let path = dir.join("fake_manim.sh");
    fs::write(&path, script).expect("failed to write stub renderer");
    let mut perms = fs::metadata(&path)
        .expect("failed to stat stub renderer")
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("failed to chmod stub renderer");
    path
}

/// Serialize a scene plan the way the model is asked to return it.
pub fn plan_json(code: &str, duration: u32) -> String {
    serde_json::json!({"code": code, "estimated_duration": duration}).to_string()
}
