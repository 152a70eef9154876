//! Template Renderer - Substitute fragment parameters using Handlebars
//!
//! Strict mode is on, so a placeholder naming a missing parameter is an error
//! rather than an empty string.

use std::collections::BTreeMap;

use handlebars::Handlebars;
use serde_json::Value;

use crate::error::{Result, RoodaError};

/// Renders fragment text with parameters
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        // Prompts are plain text; never HTML-escape parameter values
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Render `template` with `parameters`.
    ///
    /// # Arguments
    /// * `template` - Fragment text containing `{{name}}` placeholders
    /// * `parameters` - Parameter name to value
    pub fn render(&self, template: &str, parameters: &BTreeMap<String, Value>) -> Result<String> {
        self.handlebars
            .render_template(template, parameters)
            .map_err(|e| RoodaError::Template(e.to_string()))
    }
}

/// Render `template` with `parameters` using a fresh renderer.
pub fn render_template(template: &str, parameters: &BTreeMap<String, Value>) -> Result<String> {
    TemplateRenderer::new().render(template, parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_simple_substitution() {
        let result = render_template(
            "Hello {{name}}, you have {{count}} tasks",
            &params(&[("name", json!("World")), ("count", json!(3))]),
        )
        .unwrap();
        assert_eq!(result, "Hello World, you have 3 tasks");
    }

    #[test]
    fn test_nested_field_lookup() {
        let result = render_template(
            "Check {{target.path}} at depth {{target.depth}}",
            &params(&[("target", json!({"path": "src/", "depth": 2}))]),
        )
        .unwrap();
        assert_eq!(result, "Check src/ at depth 2");
    }

    #[test]
    fn test_no_html_escaping() {
        let result = render_template("{{marker}}", &params(&[("marker", json!("<promise>SUCCESS</promise>"))])).unwrap();
        assert_eq!(result, "<promise>SUCCESS</promise>");
    }

    #[test]
    fn test_missing_parameter_is_error() {
        let err = render_template("Hello {{missing}}", &params(&[("name", json!("x"))])).unwrap_err();
        assert!(matches!(err, RoodaError::Template(_)));
    }

    #[test]
    fn test_malformed_template_is_error() {
        let err = render_template("{{#each items}}unterminated", &params(&[("name", json!("x"))])).unwrap_err();
        assert!(matches!(err, RoodaError::Template(_)));
    }
}
