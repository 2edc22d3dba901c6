//! Single-reel end-to-end tests.

use std::fs;

use crate::fixtures::{plan_json, QueueClient, TestEnv};
use mathreel::generate::{self, ReelRequest};
use mathreel::reel;

fn request(concept: &str, length: u32) -> ReelRequest {
    ReelRequest {
        concept: concept.to_string(),
        description: "visual proof".to_string(),
        length_secs: length,
        output_name: None,
        template: None,
    }
}

#[tokio::test]
async fn test_end_to_end_reel_creation() {
    let env = TestEnv::new();
    let client = QueueClient::new([plan_json("circle = Circle()\nself.add(circle)", 20)]);

    let video = reel::create_reel(
        &env.config,
        &client,
        &env.renderer,
        &request("Pythagorean Theorem", 20),
    )
    .await
    .expect("reel creation failed");

    let output_dir = env.output_root().join("pythagorean_theorem");
    assert!(output_dir.is_dir());
    assert!(output_dir.join("visual_plan.json").exists());

    let scene = fs::read_to_string(output_dir.join("scene.py")).unwrap();
    assert!(scene.contains("class GeneratedScene(Scene):"));
    assert!(scene.contains("from manim import *"));
    assert!(!scene.contains("```"));

    assert_eq!(video, output_dir.join("final_reel.mp4"));
    assert!(video.exists());
    // The artifact was moved, not copied: nothing left in the media tree
    assert!(mathreel::render::latest_video(&output_dir.join("media")).is_err());
}

#[tokio::test]
async fn test_full_file_output_keeps_its_own_class() {
    let env = TestEnv::new();
    let code = "class ProofScene(Scene):\n    def construct(self):\n        self.wait(1)";
    let fenced = format!("```json\n{}\n```", plan_json(code, 15));
    let client = QueueClient::new([fenced]);

    let video = reel::create_reel(&env.config, &client, &env.renderer, &request("Proofs", 15))
        .await
        .expect("reel creation failed");

    let scene = fs::read_to_string(env.output_root().join("proofs/scene.py")).unwrap();
    assert!(scene.contains("class ProofScene(Scene):"));
    assert_eq!(scene.matches("class ").count(), 1);
    assert!(video.exists());
}

#[tokio::test]
async fn test_unparsable_response_still_persists_plan() {
    let env = TestEnv::new();
    let client = QueueClient::new(["self.add(Square())"]);

    let generation =
        generate::generate_content(&env.config, &client, &request("Euler Identity", 25))
            .await
            .expect("generation failed");

    assert_eq!(generation.estimated_duration, 25);
    let plan_text =
        fs::read_to_string(generation.output_dir.join("visual_plan.json")).unwrap();
    assert!(!plan_text.is_empty());
    let plan: serde_json::Value = serde_json::from_str(&plan_text).unwrap();
    assert_eq!(plan["estimated_duration"], 25);
    assert_eq!(plan["code"], "self.add(Square())");
}

#[tokio::test]
async fn test_output_dir_reuse_is_idempotent() {
    let env = TestEnv::new();
    let client = QueueClient::new([
        plan_json("self.add(Circle())", 10),
        plan_json("self.add(Square())", 10),
    ]);

    let first = reel::create_reel(&env.config, &client, &env.renderer, &request("Circles", 10))
        .await
        .expect("first run failed");
    let second = reel::create_reel(&env.config, &client, &env.renderer, &request("Circles", 10))
        .await
        .expect("second run into the same directory failed");

    assert_eq!(first, second);
    assert!(second.exists());
    let scene = fs::read_to_string(env.output_root().join("circles/scene.py")).unwrap();
    assert!(scene.contains("Square"), "second run must overwrite the scene");
}
