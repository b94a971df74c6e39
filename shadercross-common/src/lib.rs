//! Common types shared across the shadercross crates.

/// The fixed vertex attribute semantic table.
pub mod semantics;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A shader stage that can be compiled.
///
/// The declaration order is the order stages are processed in.
#[repr(i32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ShaderStage {
    Vertex = 0,
    Fragment = 1,
    Compute = 2,
}

impl ShaderStage {
    /// All stages, in processing order.
    pub const ALL: [ShaderStage; 3] = [
        ShaderStage::Vertex,
        ShaderStage::Fragment,
        ShaderStage::Compute,
    ];

    /// The short name of the stage, used as a file name suffix and as the
    /// reflection document key.
    pub const fn short_name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs",
            ShaderStage::Fragment => "fs",
            ShaderStage::Compute => "cs",
        }
    }

    /// The numeric stage id used in the binary container.
    pub const fn container_id(self) -> i32 {
        self as i32
    }

    /// Get the stage for the given binary container stage id.
    pub fn from_container_id(id: i32) -> Option<ShaderStage> {
        ShaderStage::ALL.into_iter().find(|s| s.container_id() == id)
    }
}

impl Display for ShaderStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "compute",
        })
    }
}

/// A target shading language.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ShaderLanguage {
    /// OpenGL ES flavoured GLSL.
    Gles,
    /// HLSL
    Hlsl,
    /// Metal Shading Language
    Metal,
}

impl ShaderLanguage {
    /// The name of the language as written to reflection documents.
    pub const fn as_str(self) -> &'static str {
        match self {
            ShaderLanguage::Gles => "gles",
            ShaderLanguage::Hlsl => "hlsl",
            ShaderLanguage::Metal => "metal",
        }
    }

    /// The language tag used in the binary container header.
    pub const fn container_id(self) -> i32 {
        match self {
            ShaderLanguage::Gles => 1,
            ShaderLanguage::Hlsl => 2,
            ShaderLanguage::Metal => 3,
        }
    }

    /// Get the language for the given binary container language tag.
    pub fn from_container_id(id: i32) -> Option<ShaderLanguage> {
        match id {
            1 => Some(ShaderLanguage::Gles),
            2 => Some(ShaderLanguage::Hlsl),
            3 => Some(ShaderLanguage::Metal),
            _ => None,
        }
    }

    /// The profile version used when none was requested.
    ///
    /// GLSL ES defaults to 200, HLSL to shader model 5.0. Metal leaves the
    /// choice to the backend.
    pub const fn default_profile_version(self) -> u32 {
        match self {
            ShaderLanguage::Gles => 200,
            ShaderLanguage::Hlsl => 50,
            ShaderLanguage::Metal => 0,
        }
    }
}

impl Display for ShaderLanguage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error returned when parsing an unknown shader language name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownShaderLanguage(pub String);

impl Display for UnknownShaderLanguage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid shader language `{}`", self.0)
    }
}

impl std::error::Error for UnknownShaderLanguage {}

impl FromStr for ShaderLanguage {
    type Err = UnknownShaderLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "gles" | "es" => ShaderLanguage::Gles,
            "hlsl" => ShaderLanguage::Hlsl,
            "metal" | "msl" => ShaderLanguage::Metal,
            _ => return Err(UnknownShaderLanguage(s.to_string())),
        })
    }
}
