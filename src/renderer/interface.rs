use crate::error::Result;

/// Trait for compiled templates that can be rendered against variant data.
pub trait TemplateRenderer {
    /// Name of the root body, used in log and error messages.
    fn name(&self) -> &str;

    /// Renders the root body against `context`.
    ///
    /// # Arguments
    /// * `context` - Data the template is rendered against
    ///
    /// # Returns
    /// * `Result<Vec<u8>>` - Rendered output
    fn execute(&self, context: &serde_yaml::Value) -> Result<Vec<u8>>;
}
