use crate::error::PipelineError;
use shadercross_common::{ShaderLanguage, ShaderStage};
use shadercross_pack::{ContainerWriter, OutputSink, ReflectionTarget, CONTAINER_EXTENSION};
use shadercross_preprocess::Define;
use shadercross_reflect::back::BackendOptions;
use std::path::{Path, PathBuf};

/// A request to compile a single stage from a source file.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StageRequest {
    pub stage: ShaderStage,
    pub path: PathBuf,
}

impl StageRequest {
    pub fn new(stage: ShaderStage, path: impl Into<PathBuf>) -> Self {
        StageRequest {
            stage,
            path: path.into(),
        }
    }
}

/// A validated set of stage requests, in vertex, fragment, compute order.
#[derive(Debug, Clone)]
pub struct StageSet {
    stages: Vec<StageRequest>,
}

impl StageSet {
    /// Validate a set of stage requests.
    ///
    /// The set must be non-empty, name each stage at most once, and may not
    /// combine a compute stage with a vertex or fragment stage.
    pub fn new(requests: impl IntoIterator<Item = StageRequest>) -> Result<StageSet, PipelineError> {
        let mut stages: Vec<StageRequest> = requests.into_iter().collect();
        if stages.is_empty() {
            return Err(PipelineError::NoStages);
        }

        stages.sort_by_key(|s| s.stage);
        if let Some(pair) = stages.windows(2).find(|w| w[0].stage == w[1].stage) {
            return Err(PipelineError::DuplicateStage(pair[0].stage));
        }

        let has_compute = stages.iter().any(|s| s.stage == ShaderStage::Compute);
        if has_compute && stages.len() > 1 {
            return Err(PipelineError::InvalidStageCombination);
        }

        Ok(StageSet { stages })
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageRequest> {
        self.stages.iter()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false, a stage set has at least one stage.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// How compiled stages are packaged.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum OutputFormat {
    /// One file per stage.
    #[default]
    Files,
    /// Named C byte arrays in a single file, with the given base variable name.
    ByteArray { variable: String },
    /// A single SGS binary container.
    Container,
}

/// Where and how compiled stages are written.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OutputOptions {
    pub path: PathBuf,
    pub format: OutputFormat,
    /// Where reflection is written. Containers always carry reflection.
    pub reflection: ReflectionTarget,
}

/// Whether the path has the extension reserved for binary containers.
pub fn is_container_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CONTAINER_EXTENSION))
}

impl OutputOptions {
    /// Output to the given path, as a container if the path ends in `.sgs`
    /// and as discrete files otherwise.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = if is_container_path(&path) {
            OutputFormat::Container
        } else {
            OutputFormat::Files
        };
        OutputOptions {
            path,
            format,
            reflection: ReflectionTarget::Disabled,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_reflection(mut self, reflection: ReflectionTarget) -> Self {
        self.reflection = reflection;
        self
    }

    pub(crate) fn sink(&self, language: ShaderLanguage, profile_version: u32) -> OutputSink {
        match &self.format {
            OutputFormat::Files => OutputSink::Files {
                path: self.path.clone(),
                reflection: self.reflection.clone(),
            },
            OutputFormat::ByteArray { variable } => OutputSink::ByteArray {
                path: self.path.clone(),
                variable: variable.clone(),
                reflection: self.reflection.clone(),
            },
            OutputFormat::Container => OutputSink::Container(ContainerWriter::open(
                &self.path,
                language,
                profile_version,
            )),
        }
    }
}

/// The configuration of a compilation run.
#[derive(Debug, Clone, Default)]
pub struct CompileRequest {
    pub stages: Vec<StageRequest>,
    /// The target language. Not needed when only preprocessing.
    pub language: Option<ShaderLanguage>,
    /// The target profile version, or the language default if unset.
    pub profile_version: Option<u32>,
    pub defines: Vec<Define>,
    /// Directories searched for `#include <...>`, in order.
    pub include_dirs: Vec<PathBuf>,
    /// Only run the preprocessor and return its output.
    pub preprocess_only: bool,
    pub invert_y: bool,
    pub flatten_ubos: bool,
    /// The output destination. Not needed when only preprocessing.
    pub output: Option<OutputOptions>,
}

impl CompileRequest {
    pub fn new() -> Self {
        CompileRequest::default()
    }

    /// Add a stage to the request.
    pub fn stage(mut self, stage: ShaderStage, path: impl Into<PathBuf>) -> Self {
        self.stages.push(StageRequest::new(stage, path));
        self
    }

    /// The effective profile version for the given language.
    pub fn profile_for(&self, language: ShaderLanguage) -> u32 {
        self.profile_version
            .unwrap_or_else(|| language.default_profile_version())
    }

    /// Validate the request without writing anything.
    ///
    /// Checks the stage combination, that a language and output are present unless
    /// only preprocessing, and that every source file exists. Uniform block
    /// flattening is only accepted for GLSL ES.
    pub fn validate(&self) -> Result<StageSet, PipelineError> {
        let stages = StageSet::new(self.stages.iter().cloned())?;

        if !self.preprocess_only {
            if self.language.is_none() {
                return Err(PipelineError::MissingLanguage);
            }
            if self.output.is_none() {
                return Err(PipelineError::MissingOutput);
            }
            match self.language {
                Some(language) if self.flatten_ubos && language != ShaderLanguage::Gles => {
                    return Err(PipelineError::FlattenUnsupported(language));
                }
                _ => {}
            }
        }

        if let Some(missing) = stages.iter().find(|s| !s.path.is_file()) {
            return Err(PipelineError::MissingSource(missing.path.clone()));
        }

        Ok(stages)
    }

    /// The backend options for the request.
    pub fn backend_options(&self) -> Result<BackendOptions, PipelineError> {
        let language = self.language.ok_or(PipelineError::MissingLanguage)?;
        Ok(BackendOptions {
            language,
            profile_version: self.profile_for(language),
            flatten_ubos: self.flatten_ubos,
            invert_y: self.invert_y,
        })
    }
}
