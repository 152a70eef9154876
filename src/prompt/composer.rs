//! Prompt Composer - Build the final prompt from a procedure
//!
//! Layout of an assembled prompt, sections omitted when empty:
//!
//! ```text
//! === CONTEXT ===
//! Source: task.md
//! <content of task.md>
//!
//! inline context
//!
//! === OBSERVE ===
//! <observe fragments>
//!
//! === ORIENT ===
//! ...
//! ```

use std::path::Path;

use super::loader::FragmentLoader;
use super::render::TemplateRenderer;
use crate::config::{FragmentAction, Phase, Procedure};
use crate::error::{Result, RoodaError};

/// Separator between fragments and between context values.
const PIECE_SEPARATOR: &str = "\n\n";

/// Section header line for `label`.
pub fn section_header(label: &str) -> String {
    format!("=== {} ===", label)
}

/// Compose one phase from its fragment actions.
///
/// Each piece is trimmed and the pieces are joined by a blank line. No
/// actions yields an empty string.
pub fn compose_phase(actions: &[FragmentAction], base_dir: &Path) -> Result<String> {
    if actions.is_empty() {
        return Ok(String::new());
    }

    let loader = FragmentLoader::new(base_dir);
    let renderer = TemplateRenderer::new();
    let mut pieces = Vec::with_capacity(actions.len());

    for action in actions {
        let text = match (action.content.as_deref(), action.path.as_deref()) {
            (Some(content), _) if !content.is_empty() => content.to_string(),
            (_, Some(path)) if !path.is_empty() => loader.load(path)?,
            _ => return Err(RoodaError::EmptyFragmentAction),
        };

        let text = if action.parameters.is_empty() {
            text
        } else {
            renderer.render(&text, &action.parameters)?
        };

        pieces.push(text.trim().to_string());
    }

    Ok(pieces.join(PIECE_SEPARATOR))
}

/// Assemble the full prompt for `procedure`.
///
/// `user_context` may hold several values separated by blank lines; a value
/// naming an existing file under `base_dir` is replaced by that file's
/// content under a `Source:` line.
pub fn assemble_prompt(procedure: &Procedure, user_context: &str, base_dir: &Path) -> Result<String> {
    let mut prompt = String::new();

    let context = render_context(user_context, base_dir)?;
    if !context.is_empty() {
        push_section(&mut prompt, "CONTEXT", &context);
    }

    for phase in Phase::ALL {
        let composed = compose_phase(procedure.fragments(phase), base_dir).map_err(|e| {
            RoodaError::PhaseComposition {
                phase: phase.label().to_string(),
                source: Box::new(e),
            }
        })?;
        let trimmed = composed.trim();
        if !trimmed.is_empty() {
            push_section(&mut prompt, phase.label(), trimmed);
        }
    }

    log::debug!("Assembled prompt of {} bytes", prompt.len());
    Ok(prompt)
}

fn push_section(prompt: &mut String, label: &str, body: &str) {
    prompt.push_str(&section_header(label));
    prompt.push('\n');
    prompt.push_str(body);
    prompt.push_str(PIECE_SEPARATOR);
}

/// Split context on blank lines into values.
fn split_context(user_context: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in user_context.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                values.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        values.push(current.join("\n"));
    }

    values
}

/// Render every context value, joined by blank lines. Empty if there are none.
fn render_context(user_context: &str, base_dir: &Path) -> Result<String> {
    let mut rendered = Vec::new();

    for value in split_context(user_context) {
        let value = value.trim();
        let candidate = base_dir.join(value);
        if !value.contains('\n') && candidate.is_file() {
            log::debug!("Context value '{}' read from file", value);
            let content = std::fs::read_to_string(&candidate)?;
            rendered.push(format!("Source: {}\n{}", value, content.trim()));
        } else {
            rendered.push(value.to_string());
        }
    }

    Ok(rendered.join(PIECE_SEPARATOR))
}
