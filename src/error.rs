use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not resolve path '{path}'. Original error: {source}")]
    PathResolution {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load file '{path}'. Original error: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse template '{name}': {source}")]
    TemplateParse {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("Could not execute template '{name}': {source}")]
    TemplateExecution {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// A sub-template was included while already nested deeper than the
    /// recursion ceiling.
    #[error("rendering template has a nested reference name: {name} (limit {limit})")]
    RecursionLimitExceeded { name: String, limit: usize },

    #[error("Failed to parse yaml from '{origin}': {source}")]
    StructuredDataDecode {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// `index` counts from 1.
    #[error("Variant #{index}{} missing required attribute '{field}'", variant_label(.variant))]
    MissingRequiredField {
        index: usize,
        variant: Option<String>,
        field: &'static str,
    },

    #[error("No variants configured in '{path}'")]
    EmptyVariantSet { path: String },

    #[error("Could not write Dockerfile to '{path}': {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed creating output directory '{path}': {source}")]
    DirectoryCreate {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config file '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

fn variant_label(variant: &Option<String>) -> String {
    variant.as_ref().map(|name| format!(" ('{name}')")).unwrap_or_default()
}

impl Error {
    /// Whether this error, or any error it was caused by, is a
    /// [`Error::RecursionLimitExceeded`].
    ///
    /// Errors raised inside `include` travel through the template engine as
    /// sources of `minijinja::Error`, so the whole chain is inspected.
    pub fn is_recursion_limit(&self) -> bool {
        let mut current: Option<&(dyn std::error::Error + 'static)> = Some(self);
        while let Some(err) = current {
            if let Some(Error::RecursionLimitExceeded { .. }) = err.downcast_ref::<Error>() {
                return true;
            }
            current = err.source();
        }
        false
    }
}

/// Convenience type alias for Results with the crate error as the error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(crate::constants::exit_codes::FAILURE);
}
