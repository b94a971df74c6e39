use crate::error::{FrontendLog, ShaderCompileError};
use crate::front::limits::DEFAULT_LIMITS;
use crate::front::{link, LinkedProgram, ShaderFrontend, SpirvStage};
use shadercross_common::ShaderStage;
use shadercross_preprocess::{IncludeKind, IncludeResolver, Preamble, ShaderSource};
use shaderc::{CompileOptions, EnvVersion, IncludeType, ResolvedInclude, ShaderKind, TargetEnv};

/// A front-end backed by shaderc.
///
/// Stages are compiled for OpenGL 4.5 with SPIR-V 1.0 as the target, with
/// every definition of the [`Preamble`] predefined and the resource limits
/// of [`DEFAULT_LIMITS`].
pub struct ShadercFrontend {
    compiler: shaderc::Compiler,
    preamble: Preamble,
    includes: IncludeResolver,
}

fn shader_kind(stage: ShaderStage) -> ShaderKind {
    match stage {
        ShaderStage::Vertex => ShaderKind::Vertex,
        ShaderStage::Fragment => ShaderKind::Fragment,
        ShaderStage::Compute => ShaderKind::Compute,
    }
}

fn frontend_error(source: &ShaderSource, err: shaderc::Error) -> ShaderCompileError {
    let log = match err {
        shaderc::Error::CompilationError(_, log) => log,
        other => other.to_string(),
    };
    ShaderCompileError::FrontendError {
        path: source.name(),
        diagnostics: FrontendLog::new(log),
    }
}

impl ShadercFrontend {
    pub fn new(preamble: Preamble, includes: IncludeResolver) -> Result<Self, ShaderCompileError> {
        let compiler = shaderc::Compiler::new().ok_or(ShaderCompileError::ShaderCInitError)?;
        Ok(ShadercFrontend {
            compiler,
            preamble,
            includes,
        })
    }

    fn options(&self) -> Result<CompileOptions<'_>, ShaderCompileError> {
        let mut options = CompileOptions::new().ok_or(ShaderCompileError::ShaderCInitError)?;
        options.set_target_env(TargetEnv::OpenGL, EnvVersion::OpenGL4_5 as u32);
        options.set_auto_map_locations(true);
        options.set_auto_bind_uniforms(true);
        for limit in DEFAULT_LIMITS {
            options.set_limit(limit.limit, limit.value);
        }

        for define in self.preamble.defines() {
            options.add_macro_definition(&define.name, define.value.as_deref());
        }

        let includes = &self.includes;
        options.set_include_callback(move |name, include_type, _requester, _depth| {
            let kind = match include_type {
                IncludeType::Standard => IncludeKind::System,
                IncludeType::Relative => IncludeKind::Local,
            };
            includes
                .resolve(name, kind)
                .map(|include| ResolvedInclude {
                    resolved_name: include.path.display().to_string(),
                    content: include.content,
                })
                .map_err(|e| e.to_string())
        });

        Ok(options)
    }
}

impl ShaderFrontend for ShadercFrontend {
    fn preprocess(&self, source: &ShaderSource) -> Result<String, ShaderCompileError> {
        let options = self.options()?;
        let artifact = self
            .compiler
            .preprocess(&source.source, &source.name(), "main", Some(&options))
            .map_err(|e| frontend_error(source, e))?;
        Ok(artifact.as_text())
    }

    fn parse(&self, source: &ShaderSource) -> Result<SpirvStage, ShaderCompileError> {
        let options = self.options()?;
        let artifact = self
            .compiler
            .compile_into_spirv(
                &source.source,
                shader_kind(source.stage),
                &source.name(),
                "main",
                Some(&options),
            )
            .map_err(|e| frontend_error(source, e))?;

        if artifact.get_num_warnings() > 0 {
            tracing::warn!(
                path = %source.path.display(),
                "{}",
                artifact.get_warning_messages().trim_end()
            );
        }

        Ok(SpirvStage {
            stage: source.stage,
            path: source.path.clone(),
            spirv: artifact.as_binary().to_vec(),
        })
    }

    fn link(&self, stages: Vec<SpirvStage>) -> Result<LinkedProgram, ShaderCompileError> {
        link::link_stages(stages)
    }
}
