/// The SPIRV-Cross backend.
pub mod cross;
/// The HLSL `NumWorkgroups` remap pass.
pub mod workgroups;

pub use cross::{CrossBackend, CrossInterface};

use crate::error::ShaderCompileError;
use crate::front::SpirvStage;
use crate::reflect::{ShaderInterface, ShaderResources};
use shadercross_common::{ShaderLanguage, ShaderStage};

/// Options for cross compiling SPIR-V into a target language.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BackendOptions {
    pub language: ShaderLanguage,
    /// The profile version of the target language, e.g. `300` for GLSL ES 3.00
    /// or `50` for shader model 5.0.
    pub profile_version: u32,
    /// Flatten uniform and push constant blocks into vec4 arrays. Only applies to GLSL ES.
    pub flatten_ubos: bool,
    /// Invert the Y coordinate of vertex stage positions.
    pub invert_y: bool,
}

impl BackendOptions {
    /// Options for the language at its default profile version.
    pub fn new(language: ShaderLanguage) -> Self {
        BackendOptions {
            language,
            profile_version: language.default_profile_version(),
            flatten_ubos: false,
            invert_y: false,
        }
    }
}

/// The result of cross compiling a single stage.
#[derive(Debug)]
pub struct CompiledArtifact<I> {
    pub stage: ShaderStage,
    /// The target language source.
    pub code: String,
    /// The shader interface resources of the stage.
    pub resources: ShaderResources,
    /// Queries on the stage's interface, for reflection.
    pub interface: I,
}

/// A backend that turns a SPIR-V stage into target language source.
pub trait ShaderBackend {
    type Interface: ShaderInterface;

    fn cross_compile(
        &self,
        stage: &SpirvStage,
    ) -> Result<CompiledArtifact<Self::Interface>, ShaderCompileError>;
}

impl<T: ShaderBackend + ?Sized> ShaderBackend for &T {
    type Interface = T::Interface;

    fn cross_compile(
        &self,
        stage: &SpirvStage,
    ) -> Result<CompiledArtifact<Self::Interface>, ShaderCompileError> {
        (**self).cross_compile(stage)
    }
}
