use crate::bytearray::{emit, header_comment, ByteArrayData};
use crate::container::ContainerWriter;
use crate::error::OutputError;
use shadercross_common::ShaderStage;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Where reflection documents are written outside of container mode.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum ReflectionTarget {
    /// No reflection is written.
    #[default]
    Disabled,
    /// Reflection is written next to the stage code.
    Sibling,
    /// Reflection for every stage is collected in one file.
    Path(PathBuf),
}

/// The destination of compiled stages for a single run.
#[derive(Debug)]
pub enum OutputSink {
    /// One file per stage, named after the output path.
    Files {
        path: PathBuf,
        reflection: ReflectionTarget,
    },
    /// Every stage as a named C byte array in a single file.
    ByteArray {
        path: PathBuf,
        variable: String,
        reflection: ReflectionTarget,
    },
    /// Every stage in a single binary container.
    Container(ContainerWriter),
}

/// Insert the stage suffix before the extension, `shader.glsl` becoming `shader_fs.glsl`.
pub fn stage_file_path(path: &Path, stage: ShaderStage) -> PathBuf {
    let mut name = path.file_stem().map(OsString::from).unwrap_or_default();
    name.push("_");
    name.push(stage.short_name());
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

fn json_sibling(path: &Path) -> PathBuf {
    let mut path = path.as_os_str().to_owned();
    path.push(".json");
    PathBuf::from(path)
}

impl OutputSink {
    /// The path the code of a stage is routed to.
    pub fn code_path(&self, stage: ShaderStage) -> PathBuf {
        match self {
            OutputSink::Files { path, .. } => stage_file_path(path, stage),
            OutputSink::ByteArray { path, .. } => path.clone(),
            OutputSink::Container(writer) => writer.path().to_path_buf(),
        }
    }

    /// Whether reflection documents should be produced for this sink.
    pub fn wants_reflection(&self) -> bool {
        match self {
            OutputSink::Container(_) => true,
            OutputSink::Files { reflection, .. } | OutputSink::ByteArray { reflection, .. } => {
                *reflection != ReflectionTarget::Disabled
            }
        }
    }

    /// Whether reflection documents should be indented.
    pub fn pretty_reflection(&self) -> bool {
        matches!(self, OutputSink::Files { .. })
    }

    /// Route the code and optional reflection of the stage at `index` in request order.
    ///
    /// The first stage truncates any shared output file, later stages append to it.
    pub fn route(
        &mut self,
        stage: ShaderStage,
        index: usize,
        code: &str,
        reflection: Option<&str>,
    ) -> Result<(), OutputError> {
        let append = index > 0;
        match self {
            OutputSink::Container(writer) => {
                tracing::debug!(%stage, path = %writer.path().display(), "adding stage to container");
                writer.add_stage(stage, code);
                if let Some(reflection) = reflection {
                    writer.add_stage_reflection(stage, reflection);
                }
            }
            OutputSink::Files {
                path,
                reflection: target,
            } => {
                let code_path = stage_file_path(path, stage);
                tracing::debug!(%stage, path = %code_path.display(), "writing stage code");
                emit(&code_path, ByteArrayData::Text(code), "", false, "")?;

                if let Some(reflection) = reflection {
                    let (reflection_path, append) = match target {
                        ReflectionTarget::Path(explicit) => (explicit.clone(), append),
                        _ => (json_sibling(&code_path), false),
                    };
                    tracing::debug!(%stage, path = %reflection_path.display(), append, "writing stage reflection");
                    emit(
                        &reflection_path,
                        ByteArrayData::Text(reflection),
                        "",
                        append,
                        "",
                    )?;
                }
            }
            OutputSink::ByteArray {
                path,
                variable,
                reflection: target,
            } => {
                let header = header_comment();
                let code_variable = format!("{variable}_{}", stage.short_name());
                tracing::debug!(%stage, path = %path.display(), variable = %code_variable, append, "writing stage byte array");
                emit(
                    &*path,
                    ByteArrayData::Text(code),
                    &code_variable,
                    append,
                    &header,
                )?;

                if let Some(reflection) = reflection {
                    let reflection_variable = format!("{code_variable}_refl");
                    let (reflection_path, append) = match target {
                        ReflectionTarget::Path(explicit) => (explicit.clone(), append),
                        _ => (path.clone(), true),
                    };
                    tracing::debug!(%stage, path = %reflection_path.display(), variable = %reflection_variable, append, "writing stage reflection");
                    emit(
                        &reflection_path,
                        ByteArrayData::Text(reflection),
                        &reflection_variable,
                        append,
                        &header,
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Finish the run, committing the container if there is one.
    pub fn finish(self) -> Result<(), OutputError> {
        if let OutputSink::Container(writer) = self {
            writer.commit()?;
        }
        Ok(())
    }
}
