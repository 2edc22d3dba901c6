//! Content generation: one model call, one persisted reel plan.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use crate::config::Config;
use crate::llm::{LlmClient, LlmRequest};
use crate::normalize;
use crate::prompts::SCENE_SYSTEM_PROMPT;
use crate::{rlog, rlog_warn, Result};

/// One reel request, as dispatched by the CLI or the batch runner.
#[derive(Debug, Clone)]
pub struct ReelRequest {
    pub concept: String,
    pub description: String,
    /// Minimum target length in seconds.
    pub length_secs: u32,
    /// Output directory name; derived from the concept when absent.
    pub output_name: Option<String>,
    /// Optional scene file whose visual style the model should copy.
    pub template: Option<PathBuf>,
}

impl ReelRequest {
    /// Filesystem-safe output directory name for this request.
    ///
    /// A blank concept with no override still gets a real subdirectory, so a
    /// reel can never land directly in the output root.
    pub fn output_name(&self) -> String {
        let name = match &self.output_name {
            Some(name) => name.trim().to_string(),
            None => self.concept.trim().to_lowercase().replace(' ', "_"),
        };
        if name.is_empty() {
            "untitled_reel".to_string()
        } else {
            name
        }
    }
}

/// The structured payload the model is asked to return, persisted verbatim
/// as `visual_plan.json` for audit and debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenePlan {
    #[serde(alias = "manim_code")]
    pub code: String,
    #[serde(alias = "estimatedDuration")]
    pub estimated_duration: u32,
}

/// Result of generating and persisting one reel's content.
#[derive(Debug, Clone)]
pub struct Generation {
    pub scene_code: String,
    pub estimated_duration: u32,
    pub output_dir: PathBuf,
}

/// Generate scene code for one request and persist the plan and scene module.
///
/// Writes `visual_plan.json` and `scene.py` under the request's output
/// directory. An unparsable model response degrades to the fallback plan and
/// is still fully persisted; only the model call itself can fail here.
pub async fn generate_content(
    config: &Config,
    client: &dyn LlmClient,
    request: &ReelRequest,
) -> Result<Generation> {
    let user_prompt = build_user_prompt(request).await?;
    rlog!(
        "generating content: concept='{}' length={}s prompt_bytes={}",
        request.concept,
        request.length_secs,
        user_prompt.len()
    );

    let raw = client
        .complete(LlmRequest {
            system: SCENE_SYSTEM_PROMPT.to_string(),
            user: user_prompt,
            json_output: true,
        })
        .await?;

    let plan = parse_plan(&raw, request.length_secs);

    let output_dir = config.output_root()?.join(request.output_name());
    fs::create_dir_all(&output_dir).await?;

    fs::write(
        output_dir.join("visual_plan.json"),
        serde_json::to_string_pretty(&plan)?,
    )
    .await?;

    let scene = normalize::normalize_scene(&request.concept, &plan.code);
    fs::write(output_dir.join("scene.py"), scene).await?;

    rlog!(
        "persisted plan and scene module to {} ({} bytes of code, ~{}s)",
        output_dir.display(),
        plan.code.len(),
        plan.estimated_duration
    );

    Ok(Generation {
        scene_code: plan.code,
        estimated_duration: plan.estimated_duration,
        output_dir,
    })
}

/// Parse the model response into a [`ScenePlan`], falling back to treating
/// the whole response as scene code when it is not valid JSON.
pub fn parse_plan(raw: &str, fallback_secs: u32) -> ScenePlan {
    let stripped = normalize::strip_fences(raw);
    match serde_json::from_str::<ScenePlan>(stripped) {
        Ok(plan) => ScenePlan {
            code: plan.code.trim().to_string(),
            ..plan
        },
        Err(e) => {
            rlog_warn!("model response was not valid JSON ({e}); treating raw text as scene code");
            ScenePlan {
                code: stripped.to_string(),
                estimated_duration: fallback_secs,
            }
        }
    }
}

async fn build_user_prompt(request: &ReelRequest) -> Result<String> {
    let mut prompt = format!(
        "Concept: {}\nDescription: {}\nTarget length: {} seconds MINIMUM. Use the FULL time to explain thoroughly. Don't rush.\n",
        request.concept, request.description, request.length_secs
    );

    if let Some(template) = &request.template {
        if template.exists() {
            let template_code = fs::read_to_string(template).await?;
            rlog!("style transfer enabled, template={}", template.display());
            prompt.push_str(&format!(
                "\nIMPORTANT: STYLE TRANSFER MODE\n\
                 The user has provided a TEMPLATE scene below. You must:\n\
                 1. COPY the exact visual style (colors, fonts, sizes, grid style, background).\n\
                 2. COPY the exact code structure (setup, intro, main loop, outro).\n\
                 3. ONLY change the mathematical content/objects to explain '{}'.\n\
                 4. Keep the same animation pacing and transitions.\n\n\
                 TEMPLATE CODE:\n```python\n{}\n```\n",
                request.concept, template_code
            ));
        } else {
            rlog_warn!("template {} not found, ignoring", template.display());
        }
    }

    prompt.push_str("\nGenerate the complete Manim scene code.");
    Ok(prompt)
}
