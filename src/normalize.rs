//! Scene module normalization.
//!
//! Model output arrives in one of two shapes: a complete scene file (imports,
//! class, `construct` method) or a bare fragment of statements that belong
//! inside `construct`. This module classifies the shape and emits a module
//! that always parses as exactly one scene class with one `construct` method.
//! Semantic correctness of the generated body stays the model's problem.

use regex::Regex;
use std::sync::OnceLock;

/// Scene class name synthesized for fragments, and the render fallback when
/// no class declaration can be found in generated code.
pub const FALLBACK_SCENE_NAME: &str = "GeneratedScene";

/// Indent for statements inside the synthesized `construct` body
/// (class body depth + method body depth).
const BODY_INDENT: &str = "        ";

fn construct_sig_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*def\s+construct\s*\(\s*self\s*\)\s*(->\s*None\s*)?:\s*$")
            .expect("construct signature regex")
    })
}

fn class_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"class\s+(\w+)\s*\(").expect("class declaration regex"))
}

/// Strip exactly one leading and one trailing markdown fence marker.
///
/// Idempotent on unfenced text; inner fences are left alone.
pub fn strip_fences(text: &str) -> &str {
    let mut text = text.trim();
    for marker in ["```json", "```python", "```"] {
        if let Some(rest) = text.strip_prefix(marker) {
            text = rest;
            break;
        }
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Whether generated code is already a complete scene file.
pub fn is_full_scene(code: &str) -> bool {
    code.contains("class ") && code.contains("Scene") && code.contains("def construct")
}

/// Extract the scene class name the render engine should be pointed at.
///
/// First class declaration wins when the model emits helper classes.
pub fn scene_class_name(code: &str) -> String {
    class_decl_re()
        .captures(code)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| FALLBACK_SCENE_NAME.to_string())
}

/// Turn raw generated code into a well-formed scene module.
///
/// Full files are emitted verbatim below a fixed import header. Fragments get
/// any duplicated `construct` signature lines removed, are dedented, and are
/// re-indented into a synthesized `GeneratedScene` class.
pub fn normalize_scene(concept: &str, code: &str) -> String {
    let header = format!(
        "\"\"\"Generated Manim scene for: {concept}\"\"\"\nfrom manim import *\nimport random\nimport numpy as np\n\n"
    );

    if is_full_scene(code) {
        return format!("{header}{code}\n");
    }

    let body = construct_sig_re().replace_all(code, "");
    let body = dedent(body.trim_matches('\n'));

    let mut lines: Vec<String> = Vec::new();
    for line in body.lines() {
        if line.trim().is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("{BODY_INDENT}{line}"));
        }
    }
    if lines.iter().all(|l| l.is_empty()) {
        // An empty construct body would not parse
        lines = vec![format!("{BODY_INDENT}pass")];
    }

    format!(
        "{header}class {FALLBACK_SCENE_NAME}(Scene):\n    def construct(self):\n{}\n",
        lines.join("\n")
    )
}

/// Remove the whitespace prefix common to all non-blank lines.
///
/// The margin is the longest common leading-whitespace *string*, not a byte
/// count: model output mixes tabs, spaces, and the occasional non-ASCII
/// whitespace char, and slicing at a byte offset could split a character.
fn dedent(text: &str) -> String {
    let mut margin: Option<&str> = None;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        // trim_start removes whole chars, so this index is a char boundary
        let indent = &line[..line.len() - line.trim_start().len()];
        margin = Some(match margin {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }
    let margin = margin.unwrap_or("");

    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.strip_prefix(margin).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let mut end = 0;
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            break;
        }
        end += ca.len_utf8();
    }
    &a[..end]
}
