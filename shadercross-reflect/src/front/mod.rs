use crate::error::ShaderCompileError;
use shadercross_common::ShaderStage;
use shadercross_preprocess::ShaderSource;
use std::path::PathBuf;

/// Cross-stage interface checks over parsed SPIR-V modules.
pub mod link;

/// Resource limits of the front-end.
pub mod limits;

/// The shaderc (glslang) front-end.
pub mod shaderc;

pub use self::limits::{limits_config, ResourceLimit, DEFAULT_LIMITS};
pub use self::shaderc::ShadercFrontend;

/// A stage that was parsed into SPIR-V.
#[derive(Debug, Clone)]
pub struct SpirvStage {
    pub stage: ShaderStage,
    /// The path of the source the stage was parsed from.
    pub path: PathBuf,
    /// The SPIR-V words of the stage.
    pub spirv: Vec<u32>,
}

/// The stages of a program, after linking succeeded.
#[derive(Debug, Clone)]
pub struct LinkedProgram {
    stages: Vec<SpirvStage>,
}

impl LinkedProgram {
    /// Create a program from stages whose interfaces have been checked to match.
    pub fn new(stages: Vec<SpirvStage>) -> Self {
        LinkedProgram { stages }
    }

    /// The linked stages, in the order they were parsed.
    pub fn stages(&self) -> &[SpirvStage] {
        &self.stages
    }

    /// Get the module of the given stage.
    pub fn stage(&self, stage: ShaderStage) -> Result<&SpirvStage, ShaderCompileError> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .ok_or(ShaderCompileError::MissingStage(stage))
    }
}

/// A shader front-end that parses source text into SPIR-V.
pub trait ShaderFrontend {
    /// Run only the preprocessor over the source, returning the preprocessed text.
    fn preprocess(&self, source: &ShaderSource) -> Result<String, ShaderCompileError>;

    /// Parse the source into a SPIR-V module.
    fn parse(&self, source: &ShaderSource) -> Result<SpirvStage, ShaderCompileError>;

    /// Link the parsed stages into a program.
    fn link(&self, stages: Vec<SpirvStage>) -> Result<LinkedProgram, ShaderCompileError>;
}

impl<T: ShaderFrontend + ?Sized> ShaderFrontend for &T {
    fn preprocess(&self, source: &ShaderSource) -> Result<String, ShaderCompileError> {
        (**self).preprocess(source)
    }

    fn parse(&self, source: &ShaderSource) -> Result<SpirvStage, ShaderCompileError> {
        (**self).parse(source)
    }

    fn link(&self, stages: Vec<SpirvStage>) -> Result<LinkedProgram, ShaderCompileError> {
        (**self).link(stages)
    }
}
