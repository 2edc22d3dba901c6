//! Render invocation and artifact discovery.
//!
//! The render engine is a black box: it gets a scene module, a scene class
//! name, and a media working directory, and on success it writes the video
//! somewhere under that directory (the exact subpath is engine-internal).
//! Each invocation gets its own media directory, so "newest mp4 in the tree"
//! identifies the artifact as long as renders stay serialized.

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::process::Command;

use crate::config::Config;
use crate::normalize;
use crate::{rlog, rlog_debug, Error, Result};

pub const RENDER_QUALITY: &str = "h";
pub const RENDER_RESOLUTION: &str = "1080,1920";
pub const RENDER_FPS: &str = "60";

/// Executor for the external render engine.
#[derive(Debug, Clone)]
pub struct Renderer {
    /// Resolved path to the render binary.
    binary: PathBuf,
}

impl Renderer {
    /// Resolve the configured render command on PATH.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderBinaryNotFound`] when the command cannot be found.
    pub fn from_config(config: &Config) -> Result<Self> {
        let command = config.effective_render_command();
        let binary =
            which::which(command).map_err(|_| Error::RenderBinaryNotFound(command.to_string()))?;
        Ok(Self { binary })
    }

    /// Use a specific binary path (tests, non-standard installs).
    pub fn with_binary(binary: PathBuf) -> Self {
        Self { binary }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Render a scene module and deliver the video at `destination`.
    ///
    /// Blocks until the engine exits; no timeout is applied, so a hung engine
    /// hangs the pipeline. On success the freshest mp4 under the per-task
    /// media directory is moved to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderFailed`] on a non-zero exit status and
    /// [`Error::ArtifactNotFound`] when the engine reported success but no
    /// video can be found.
    pub async fn render(
        &self,
        scene_path: &Path,
        scene_code: &str,
        destination: &Path,
    ) -> Result<PathBuf> {
        let scene_name = normalize::scene_class_name(scene_code);
        let media_dir = scene_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("media");
        let output_name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "final_reel.mp4".to_string());

        rlog!(
            "rendering {} scene={} media_dir={}",
            scene_path.display(),
            scene_name,
            media_dir.display()
        );

        let output = Command::new(&self.binary)
            .arg("--quality")
            .arg(RENDER_QUALITY)
            .arg("--resolution")
            .arg(RENDER_RESOLUTION)
            .arg("--fps")
            .arg(RENDER_FPS)
            .arg("--media_dir")
            .arg(&media_dir)
            .arg("-o")
            .arg(&output_name)
            .arg(scene_path)
            .arg(&scene_name)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::RenderFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: tail(&stderr, 2000),
            });
        }

        let artifact = latest_video(&media_dir)?;
        rlog_debug!("located artifact {}", artifact.display());
        move_artifact(&artifact, destination)?;
        rlog!("video delivered to {}", destination.display());
        Ok(destination.to_path_buf())
    }
}

/// Find the most-recently-modified mp4 under `media_dir`, recursively.
///
/// Only sound while a single render runs in this tree at a time.
pub fn latest_video(media_dir: &Path) -> Result<PathBuf> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;
    collect_videos(media_dir, &mut newest)?;
    newest
        .map(|(_, path)| path)
        .ok_or_else(|| Error::ArtifactNotFound(media_dir.to_path_buf()))
}

fn collect_videos(dir: &Path, newest: &mut Option<(SystemTime, PathBuf)>) -> Result<()> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        // Engine may not have created the directory at all
        Err(_) => return Ok(()),
    };
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_videos(&path, newest)?;
        } else if path.extension().is_some_and(|ext| ext == "mp4") {
            let modified = entry.metadata()?.modified()?;
            if newest.as_ref().map_or(true, |(t, _)| modified > *t) {
                *newest = Some((modified, path));
            }
        }
    }
    Ok(())
}

/// Move the artifact to its final destination. rename first, copy+remove when
/// the destination is on a different filesystem. Not rolled back on failure.
fn move_artifact(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if std::fs::rename(from, to).is_err() {
        std::fs::copy(from, to)?;
        std::fs::remove_file(from)?;
    }
    Ok(())
}

fn tail(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        text.to_string()
    } else {
        text.chars().skip(count - max_chars).collect()
    }
}
