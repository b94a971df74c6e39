//! Cross compile GLSL shaders into GLSL ES, HLSL and Metal.
//!
//! shadercross parses GLSL stages into SPIR-V with shaderc, cross compiles them with
//! SPIRV-Cross, reflects the shader interface of every stage and packages the results.
//!
//! ## Usage
//! A [`CompileRequest`] names up to three stages, the target language and an
//! [`OutputOptions`]. [`compile`] validates the request, then runs every stage through
//! the front-end, the backend and the output sink.
//!
//! ## Output formats
//! | **Format**   | **Output**                                         |
//! |--------------|----------------------------------------------------|
//! | `Files`      | `<stem>_<vs\|fs\|cs>.<ext>`, reflection in `.json` |
//! | `ByteArray`  | named `static const unsigned char` arrays          |
//! | `Container`  | a single `.sgs` binary container                   |
//!
//! Reflection documents are JSON, keyed by the stage short name.

/// Error types.
mod error;
/// The compilation pipeline.
pub mod pipeline;
/// Compilation requests.
pub mod request;

pub use error::PipelineError;
pub use pipeline::{compile, CompiledStage, Pipeline, PipelineOutcome, PreprocessedStage};
pub use request::{CompileRequest, OutputFormat, OutputOptions, StageRequest, StageSet};

pub use shadercross_common::{ShaderLanguage, ShaderStage};

/// The vertex semantics bound to attribute locations.
pub mod semantics {
    pub use shadercross_common::semantics::*;
}

/// Loading of shader sources, preprocessor definitions and includes.
pub mod preprocess {
    pub use shadercross_preprocess::*;
}

/// Shader compilation and reflection.
pub mod reflect {
    pub use shadercross_reflect::error::*;

    /// Shader front-ends.
    pub mod front {
        pub use shadercross_reflect::front::*;
    }

    /// Shader codegen backends.
    pub mod back {
        pub use shadercross_reflect::back::*;
    }

    pub use shadercross_reflect::reflect::*;
}

/// Output packaging.
pub mod pack {
    pub use shadercross_pack::*;
}
