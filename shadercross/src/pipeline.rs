use crate::error::PipelineError;
use crate::request::{CompileRequest, StageRequest, StageSet};
use shadercross_common::{ShaderLanguage, ShaderStage};
use shadercross_pack::OutputSink;
use shadercross_preprocess::{IncludeResolver, Preamble, ShaderSource};
use shadercross_reflect::back::{CrossBackend, ShaderBackend};
use shadercross_reflect::front::{ShaderFrontend, ShadercFrontend};
use shadercross_reflect::reflect::reflect_stage;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// The states a compilation run moves through.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PipelineState {
    Init,
    Loading,
    FrontEnd(ShaderStage),
    Linking,
    BackEnd(ShaderStage),
    Reflecting(ShaderStage),
    Writing(ShaderStage),
    Done,
    Failed,
}

impl Display for PipelineState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineState::Init => f.write_str("init"),
            PipelineState::Loading => f.write_str("loading"),
            PipelineState::FrontEnd(stage) => write!(f, "front-end({stage})"),
            PipelineState::Linking => f.write_str("linking"),
            PipelineState::BackEnd(stage) => write!(f, "backend({stage})"),
            PipelineState::Reflecting(stage) => write!(f, "reflecting({stage})"),
            PipelineState::Writing(stage) => write!(f, "writing({stage})"),
            PipelineState::Done => f.write_str("done"),
            PipelineState::Failed => f.write_str("failed"),
        }
    }
}

impl PipelineState {
    fn advance(&mut self, next: PipelineState) {
        tracing::debug!(from = %self, to = %next, "pipeline state");
        *self = next;
    }
}

/// A stage that was compiled and written.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CompiledStage {
    pub stage: ShaderStage,
    /// The source file the stage was compiled from.
    pub source: PathBuf,
    /// Where the code of the stage was written.
    pub output: PathBuf,
}

/// A stage that was only preprocessed.
#[derive(Debug, Clone)]
pub struct PreprocessedStage {
    pub source: ShaderSource,
    /// The preprocessed text.
    pub text: String,
}

/// The result of a successful run.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// Every stage was compiled and its outputs written.
    Compiled(Vec<CompiledStage>),
    /// Every stage was preprocessed.
    Preprocessed(Vec<PreprocessedStage>),
}

/// The mutable state of a single compilation run.
struct PipelineContext {
    state: PipelineState,
    sink: OutputSink,
    language: ShaderLanguage,
    profile_version: u32,
}

fn load_source(
    stage: &StageRequest,
    state: &mut PipelineState,
) -> Result<ShaderSource, PipelineError> {
    state.advance(PipelineState::Loading);
    Ok(ShaderSource::load(stage.stage, &stage.path)?)
}

impl PipelineContext {
    fn new(sink: OutputSink, language: ShaderLanguage, profile_version: u32) -> Self {
        PipelineContext {
            state: PipelineState::Init,
            sink,
            language,
            profile_version,
        }
    }

    fn compile(
        &mut self,
        frontend: &impl ShaderFrontend,
        backend: &impl ShaderBackend,
        stages: &StageSet,
    ) -> Result<Vec<CompiledStage>, PipelineError> {
        let mut sources = Vec::with_capacity(stages.len());
        let mut parsed = Vec::with_capacity(stages.len());
        for stage in stages.iter() {
            let source = load_source(stage, &mut self.state)?;
            self.state.advance(PipelineState::FrontEnd(source.stage));
            parsed.push(
                frontend
                    .parse(&source)
                    .map_err(PipelineError::FrontendError)?,
            );
            sources.push(source);
        }

        self.state.advance(PipelineState::Linking);
        let program = frontend.link(parsed).map_err(PipelineError::LinkError)?;

        let mut compiled = Vec::with_capacity(sources.len());
        for (index, source) in sources.iter().enumerate() {
            let stage = source.stage;
            let spirv = program.stage(stage).map_err(PipelineError::LinkError)?;

            self.state.advance(PipelineState::BackEnd(stage));
            let artifact = backend
                .cross_compile(spirv)
                .map_err(|source| PipelineError::BackendError { stage, source })?;

            let output = self.sink.code_path(stage);
            let reflection = if self.sink.wants_reflection() {
                self.state.advance(PipelineState::Reflecting(stage));
                let json = reflect_stage(
                    &artifact.interface,
                    &artifact.resources,
                    stage,
                    &output.display().to_string(),
                    self.language,
                    self.profile_version,
                )
                .and_then(|document| document.to_json(self.sink.pretty_reflection()))
                .map_err(|source| PipelineError::ReflectError { stage, source })?;
                Some(json)
            } else {
                None
            };

            self.state.advance(PipelineState::Writing(stage));
            self.sink
                .route(stage, index, &artifact.code, reflection.as_deref())?;

            compiled.push(CompiledStage {
                stage,
                source: source.path.clone(),
                output,
            });
        }

        Ok(compiled)
    }

    fn finish(self) -> Result<(), PipelineError> {
        let mut state = self.state;
        match self.sink.finish() {
            Ok(()) => {
                state.advance(PipelineState::Done);
                Ok(())
            }
            Err(err) => {
                state.advance(PipelineState::Failed);
                Err(err.into())
            }
        }
    }
}

fn preprocess_sources(
    frontend: &impl ShaderFrontend,
    stages: &StageSet,
    state: &mut PipelineState,
) -> Result<Vec<PreprocessedStage>, PipelineError> {
    let mut preprocessed = Vec::with_capacity(stages.len());
    for stage in stages.iter() {
        let source = load_source(stage, state)?;
        state.advance(PipelineState::FrontEnd(source.stage));
        let text = frontend
            .preprocess(&source)
            .map_err(PipelineError::FrontendError)?;
        preprocessed.push(PreprocessedStage { source, text });
    }
    Ok(preprocessed)
}

/// Preprocess every stage, without linking or cross compiling.
pub fn preprocess(
    frontend: &impl ShaderFrontend,
    stages: &StageSet,
) -> Result<Vec<PreprocessedStage>, PipelineError> {
    let mut state = PipelineState::Init;
    let result = preprocess_sources(frontend, stages, &mut state);
    state.advance(if result.is_ok() {
        PipelineState::Done
    } else {
        PipelineState::Failed
    });
    result
}

/// A compilation pipeline over a front-end and a backend.
///
/// A run validates the request before any I/O, then loads and parses each
/// stage in turn, links them, and cross compiles, reflects and writes each stage in
/// vertex, fragment, compute order. A failure aborts the run. Outputs already
/// written for earlier stages are left on disk, but a container is only
/// written once every stage succeeded.
pub struct Pipeline<F, B> {
    frontend: F,
    backend: B,
}

impl<F: ShaderFrontend, B: ShaderBackend> Pipeline<F, B> {
    pub fn new(frontend: F, backend: B) -> Self {
        Pipeline { frontend, backend }
    }

    /// Run the request.
    pub fn run(&self, request: &CompileRequest) -> Result<PipelineOutcome, PipelineError> {
        let stages = request.validate()?;
        if request.preprocess_only {
            return preprocess(&self.frontend, &stages).map(PipelineOutcome::Preprocessed);
        }
        self.compile_validated(request, &stages)
            .map(PipelineOutcome::Compiled)
    }

    fn compile_validated(
        &self,
        request: &CompileRequest,
        stages: &StageSet,
    ) -> Result<Vec<CompiledStage>, PipelineError> {
        let language = request.language.ok_or(PipelineError::MissingLanguage)?;
        let output = request.output.as_ref().ok_or(PipelineError::MissingOutput)?;
        let profile_version = request.profile_for(language);

        let mut cx = PipelineContext::new(
            output.sink(language, profile_version),
            language,
            profile_version,
        );
        match cx.compile(&self.frontend, &self.backend, stages) {
            Ok(compiled) => {
                cx.finish()?;
                Ok(compiled)
            }
            Err(err) => {
                cx.state.advance(PipelineState::Failed);
                Err(err)
            }
        }
    }
}

/// Create the shaderc front-end configured by the request.
pub fn frontend_for(request: &CompileRequest) -> Result<ShadercFrontend, PipelineError> {
    let includes = IncludeResolver::new(request.include_dirs.clone())?;
    ShadercFrontend::new(Preamble::new(&request.defines), includes)
        .map_err(PipelineError::ConfigError)
}

/// Run the request with the shaderc front-end and the SPIRV-Cross backend.
pub fn compile(request: &CompileRequest) -> Result<PipelineOutcome, PipelineError> {
    let stages = request.validate()?;
    let frontend = frontend_for(request)?;
    if request.preprocess_only {
        return preprocess(&frontend, &stages).map(PipelineOutcome::Preprocessed);
    }

    let backend =
        CrossBackend::new(request.backend_options()?).map_err(PipelineError::ConfigError)?;
    Pipeline::new(frontend, backend)
        .compile_validated(request, &stages)
        .map(PipelineOutcome::Compiled)
}
