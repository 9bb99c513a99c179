use oasgen_core::GeneratorError;
use oasgen_core::error::{LoadError, TransformError, WriteError};
use thiserror::Error;

/// Any failure of a pipeline run. The first error aborts the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Generate(#[from] GeneratorError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("no specification loaded; call load_spec first")]
    NoSpecLoaded,

    #[error("invalid configuration: {0}")]
    Config(String),
}

