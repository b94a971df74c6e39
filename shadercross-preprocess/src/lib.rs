//! Shader source loading for shadercross.
//!
//! Stage sources are loaded as-is; preprocessing proper is the job of the
//! shader front-end. This crate supplies what the front-end is configured with:
//! the [`Preamble`] of definitions and the [`IncludeResolver`].
mod defines;
mod error;
mod include;

pub use defines::{parse_include_dirs, Define, Preamble};
pub use error::*;
pub use include::{IncludeKind, IncludeResolver, ResolvedInclude};

use shadercross_common::ShaderStage;
use std::path::{Path, PathBuf};

/// The source of a single shader stage.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    /// The stage the source is compiled as.
    pub stage: ShaderStage,
    /// The path the source was loaded from.
    pub path: PathBuf,
    /// The source text.
    pub source: String,
}

impl ShaderSource {
    /// Load the source for a stage from disk.
    pub fn load(stage: ShaderStage, path: impl AsRef<Path>) -> Result<ShaderSource, PreprocessError> {
        let path = path.as_ref();
        let source = include::read_file(path)?;
        Ok(ShaderSource {
            stage,
            path: path.to_path_buf(),
            source,
        })
    }

    /// The name used to identify this source in diagnostics.
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }
}
