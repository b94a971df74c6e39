use crate::PreprocessError;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// How an include directive names its file.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IncludeKind {
    /// `#include <file>`, searched across the include directories.
    System,
    /// `#include "file"`, relative to the working directory.
    Local,
}

/// An include that was found on disk.
#[derive(Debug, Clone)]
pub struct ResolvedInclude {
    pub path: PathBuf,
    pub content: String,
}

/// Resolves include directives for the shader front-end.
#[derive(Debug, Clone)]
pub struct IncludeResolver {
    system_dirs: Vec<PathBuf>,
    working_dir: PathBuf,
}

pub(crate) fn read_file(path: impl AsRef<Path>) -> Result<String, PreprocessError> {
    let path = path.as_ref();
    let mut source = Vec::new();
    File::open(path)
        .and_then(|mut f| f.read_to_end(&mut source))
        .map_err(|e| PreprocessError::IOError(path.to_path_buf(), e))?;
    String::from_utf8(source).map_err(|_| PreprocessError::Utf8Error(path.to_path_buf()))
}

impl IncludeResolver {
    /// Create a resolver that searches the given system directories, and
    /// resolves local includes against the current working directory.
    pub fn new(system_dirs: Vec<PathBuf>) -> Result<Self, PreprocessError> {
        let working_dir = std::env::current_dir()
            .map_err(|e| PreprocessError::IOError(PathBuf::from("."), e))?;
        Ok(Self::with_working_dir(system_dirs, working_dir))
    }

    /// Create a resolver with an explicit directory for local includes.
    pub fn with_working_dir(system_dirs: Vec<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        IncludeResolver {
            system_dirs,
            working_dir: working_dir.into(),
        }
    }

    /// Resolve an include of the given kind.
    pub fn resolve(
        &self,
        name: &str,
        kind: IncludeKind,
    ) -> Result<ResolvedInclude, PreprocessError> {
        match kind {
            IncludeKind::System => self.resolve_system(name),
            IncludeKind::Local => self.resolve_local(name),
        }
    }

    fn resolve_system(&self, name: &str) -> Result<ResolvedInclude, PreprocessError> {
        for dir in &self.system_dirs {
            let path = dir.join(name);
            if !path.is_file() {
                continue;
            }
            tracing::debug!(include = name, path = %path.display(), "resolved system include");
            let content = read_file(&path)?;
            return Ok(ResolvedInclude { path, content });
        }
        Err(PreprocessError::IncludeNotFound(name.to_string()))
    }

    fn resolve_local(&self, name: &str) -> Result<ResolvedInclude, PreprocessError> {
        let path = self.working_dir.join(name);
        if !path.is_file() {
            return Err(PreprocessError::IncludeNotFound(name.to_string()));
        }
        let content = read_file(&path)?;
        Ok(ResolvedInclude { path, content })
    }
}
