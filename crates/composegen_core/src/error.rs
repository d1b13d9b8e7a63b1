//! Error types for manifest generation.

use thiserror::Error;

/// Result type alias for generation operations.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Errors that can occur during configuration or manifest generation.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("could not find any templates: provide `templates` or `template_dir`")]
    MissingTemplates,

    #[error("`templates` and `template_dir` are mutually exclusive; provide exactly one")]
    TemplatesConflict,

    #[error("invalid rule pattern `{pattern}`: {source}")]
    InvalidRulePattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("invalid service mask `{mask}`: {source}")]
    InvalidMask { mask: String, source: regex::Error },

    #[error("unsupported encoding `{0}`: only utf-8 is supported")]
    UnsupportedEncoding(String),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("malformed template `{template}`: {message}")]
    MalformedTemplate { template: String, message: String },

    #[error("failed to parse template `{name}`: {source}")]
    TemplateParse {
        name: String,
        source: serde_yaml::Error,
    },

    #[error("transform failed for service `{service}`: {source}")]
    Transform {
        service: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
