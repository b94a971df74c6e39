use shadercross_common::{ShaderLanguage, ShaderStage};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Diagnostics reported by the shader front-end.
#[derive(Debug, Clone, Default)]
pub struct FrontendLog {
    /// The info log.
    pub log: String,
}

impl FrontendLog {
    pub fn new(log: impl Into<String>) -> Self {
        FrontendLog { log: log.into() }
    }
}

impl Display for FrontendLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.log.is_empty() {
            writeln!(f, "{}", self.log.trim_end())?;
        }
        Ok(())
    }
}

/// Error type for shader compilation.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ShaderCompileError {
    /// Error when initializing the shaderc compiler.
    #[error("shaderc init")]
    ShaderCInitError,

    /// Parsing or preprocessing failed in the front-end.
    #[error("{path}:\n{diagnostics}")]
    FrontendError {
        path: String,
        diagnostics: FrontendLog,
    },

    /// The stages could not be linked into a program.
    #[error("link failed:\n{0}")]
    LinkError(FrontendLog),

    /// Error when transpiling from spirv-cross.
    #[error("spirv-cross: {0:?}")]
    SpirvCrossCompileError(spirv_cross::ErrorCode),

    /// The SPIR-V module produced by the front-end could not be parsed.
    #[error("invalid spirv: {0}")]
    SpirvParseError(String),

    /// The requested profile version is not supported by the target language.
    #[error("profile version {version} is not supported for {language}")]
    UnsupportedProfile {
        language: ShaderLanguage,
        version: u32,
    },

    /// The stage cannot be expressed at the requested profile version.
    #[error("the {stage} stage requires a newer {language} profile than {version}")]
    UnsupportedStage {
        stage: ShaderStage,
        language: ShaderLanguage,
        version: u32,
    },

    /// The option is not available for the target language.
    #[error("{option} is not supported for {language}")]
    UnsupportedOption {
        option: &'static str,
        language: ShaderLanguage,
    },

    /// A uniform block cannot be flattened into a vector array.
    #[error("cannot flatten uniform block `{0}`, it must be a single block of float, int or uint members")]
    UnflattenableBlock(String),

    /// The linked program has no module for the requested stage.
    #[error("no {0} stage in the linked program")]
    MissingStage(ShaderStage),
}

impl From<spirv_cross::ErrorCode> for ShaderCompileError {
    fn from(err: spirv_cross::ErrorCode) -> Self {
        ShaderCompileError::SpirvCrossCompileError(err)
    }
}

/// Error type for shader reflection.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ShaderReflectError {
    /// Reflection error from spirv-cross.
    #[error("spirv-cross: {0:?}")]
    SpirvCrossError(spirv_cross::ErrorCode),

    /// The reflection document could not be serialized.
    #[error("could not serialize reflection")]
    SerializeError(#[from] serde_json::Error),
}

impl From<spirv_cross::ErrorCode> for ShaderReflectError {
    fn from(err: spirv_cross::ErrorCode) -> Self {
        ShaderReflectError::SpirvCrossError(err)
    }
}
