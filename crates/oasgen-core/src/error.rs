use thiserror::Error;

/// Failures of a content source (plain filesystem or archive).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid archive {path}: {message}")]
    Archive { path: String, message: String },
}

/// A fragment could not be read or parsed.
#[derive(Debug, Error)]
pub enum SpecLoadError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("failed to parse YAML in {location}: {source}")]
    Yaml {
        location: String,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("failed to parse JSON in {location}: {source}")]
    Json {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed specification at {location}: {message}")]
    Malformed { location: String, message: String },

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unresolved reference {reference} (from {from})")]
    Dangling { reference: String, from: String },

    #[error("circular reference detected: {}", chain.join(" -> "))]
    Circular { chain: Vec<String> },

    #[error("invalid reference format: {0}")]
    InvalidRef(String),

    #[error("reference target not found: {reference} has no node at {pointer}")]
    TargetNotFound { reference: String, pointer: String },

    #[error("remote references are not supported: {0}")]
    Remote(String),
}

/// Everything that can go wrong while turning a root fragment into a `Document`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Spec(#[from] SpecLoadError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl From<SourceError> for LoadError {
    fn from(err: SourceError) -> Self {
        LoadError::Spec(SpecLoadError::Source(err))
    }
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("unsupported schema {schema}: {reason}")]
    UnsupportedSchema { schema: String, reason: String },
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("failed to render {template}: {message}")]
    Render { template: String, message: String },

    #[error("no generator for language '{language}' and framework '{framework}'")]
    UnsupportedTarget { language: String, framework: String },
}

impl GeneratorError {
    pub fn render(template: &str, err: impl std::fmt::Display) -> Self {
        GeneratorError::Render {
            template: template.to_string(),
            message: err.to_string(),
        }
    }
}

/// Output I/O failures.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
