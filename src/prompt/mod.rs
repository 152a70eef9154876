//! Prompt System - Fragment loading, templating and assembly
//!
//! Fragments come from inline content, the embedded `builtin:` set, or the
//! filesystem. Parameters are rendered with Handlebars. The composer joins
//! everything into one prompt with `=== LABEL ===` section headers.

mod builtin;
mod composer;
mod loader;
mod render;

pub use builtin::{BUILTIN_PREFIX, builtin_fragment, builtin_fragment_refs};
pub use composer::{assemble_prompt, compose_phase, section_header};
pub use loader::{FragmentLoader, load_fragment};
pub use render::{TemplateRenderer, render_template};
