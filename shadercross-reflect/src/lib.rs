//! Shader compilation and reflection for shadercross.
//!
//! GLSL is parsed into SPIR-V by a [`ShaderFrontend`](front::ShaderFrontend),
//! then cross compiled into the target language by a
//! [`ShaderBackend`](back::ShaderBackend). The shader interface of each compiled
//! stage is reflected into a [`ReflectionDocument`](reflect::ReflectionDocument).

/// Shader codegen backends.
pub mod back;
/// Error types.
pub mod error;
/// Shader frontend parsers.
pub mod front;
/// Shader reflection.
pub mod reflect;
