//! Single entry point: concept + description in, final video path out.

use std::path::PathBuf;

use crate::config::Config;
use crate::generate::{self, ReelRequest};
use crate::llm::LlmClient;
use crate::render::Renderer;
use crate::{rlog, Result};

/// Generate and render one reel.
///
/// Pure composition of [`generate::generate_content`] and [`Renderer::render`];
/// errors from either stage propagate unmodified. Returns the path of the
/// delivered video (`<output_dir>/final_reel.mp4`).
pub async fn create_reel(
    config: &Config,
    client: &dyn LlmClient,
    renderer: &Renderer,
    request: &ReelRequest,
) -> Result<PathBuf> {
    println!("Creating reel: {}", request.concept);
    rlog!(
        "create_reel concept='{}' length={}s output_name={}",
        request.concept,
        request.length_secs,
        request.output_name()
    );

    println!("Step 1/2: generating scene code...");
    let generation = generate::generate_content(config, client, request).await?;
    rlog!(
        "generation complete: ~{}s of animation, output_dir={}",
        generation.estimated_duration,
        generation.output_dir.display()
    );

    println!("Step 2/2: rendering animation...");
    let scene_path = generation.output_dir.join("scene.py");
    let destination = generation.output_dir.join("final_reel.mp4");
    let video = renderer
        .render(&scene_path, &generation.scene_code, &destination)
        .await?;

    println!("Reel complete: {}", video.display());
    Ok(video)
}
