use shadercross_common::{ShaderLanguage, ShaderStage};
use shadercross_pack::error::OutputError;
use shadercross_preprocess::PreprocessError;
use shadercross_reflect::error::{ShaderCompileError, ShaderReflectError};
use std::path::PathBuf;
use thiserror::Error;

/// Error type for a compilation run.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No stages were requested.
    #[error("no shader stages were requested")]
    NoStages,

    /// A stage was requested more than once.
    #[error("the {0} stage was requested more than once")]
    DuplicateStage(ShaderStage),

    /// A compute stage was requested alongside a vertex or fragment stage.
    #[error("compute shaders cannot be combined with vertex or fragment shaders")]
    InvalidStageCombination,

    /// A stage source file does not exist.
    #[error("the source file `{0}` does not exist")]
    MissingSource(PathBuf),

    /// No output path was given.
    #[error("an output path is required")]
    MissingOutput,

    /// No target language was given.
    #[error("a target language is required")]
    MissingLanguage,

    /// Uniform block flattening was requested for a language other than GLSL ES.
    #[error("uniform block flattening is not supported for {0}")]
    FlattenUnsupported(ShaderLanguage),

    /// A source or include could not be loaded.
    #[error("could not load shader source")]
    PreprocessError(#[from] PreprocessError),

    /// The front-end or backend could not be set up for the request.
    #[error("invalid compiler configuration")]
    ConfigError(#[source] ShaderCompileError),

    /// The front-end rejected a stage.
    #[error("front-end failed")]
    FrontendError(#[source] ShaderCompileError),

    /// The stages could not be linked.
    #[error("linking failed")]
    LinkError(#[source] ShaderCompileError),

    /// A stage could not be cross compiled.
    #[error("cross compiling the {stage} stage failed")]
    BackendError {
        stage: ShaderStage,
        #[source]
        source: ShaderCompileError,
    },

    /// The reflection of a stage could not be produced.
    #[error("reflecting the {stage} stage failed")]
    ReflectError {
        stage: ShaderStage,
        #[source]
        source: ShaderReflectError,
    },

    /// Output could not be written.
    #[error("could not write output")]
    OutputError(#[from] OutputError),
}
