use crate::error::ProbityError;

/// Renders query text with check parameters before it reaches the driver.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, ProbityError>;
}
