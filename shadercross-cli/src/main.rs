use clap::Parser;
use shadercross::pack::ReflectionTarget;
use shadercross::preprocess::{parse_include_dirs, Define};
use shadercross::request::is_container_path;
use shadercross::{
    CompileRequest, OutputFormat, OutputOptions, PipelineOutcome, ShaderLanguage, ShaderStage,
};
use std::path::PathBuf;
use tracing::Level;

const BANNER: &str = "-------------------";

/// Cross compile GLSL shaders into GLSL ES, HLSL and Metal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Vertex shader source file.
    #[arg(short, long)]
    vert: Option<PathBuf>,
    /// Fragment shader source file.
    #[arg(short, long)]
    frag: Option<PathBuf>,
    /// Compute shader source file.
    #[arg(short, long)]
    compute: Option<PathBuf>,
    /// The output file.
    ///
    /// Stage suffixes are inserted before the extension, e.g. `shader_vs.glsl`.
    /// Outputs ending in `.sgs` are written as a binary container.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// The target shader language: gles (or es), hlsl, metal (or msl).
    #[arg(short, long)]
    lang: Option<ShaderLanguage>,
    /// Preprocessor definitions, separated by commas, e.g. `DEBUG,SAMPLES=4`.
    #[arg(short = 'D', long)]
    defines: Option<String>,
    /// Invert position.y in the vertex shader.
    #[arg(short = 'Y', long)]
    invert_y: bool,
    /// The shader profile version (HLSL: 30, 40, 41, 50, 51, 60; ES: 100, 200, 300,
    /// 310, 320; Metal: 10, 11, 12, 20, 21, 22).
    #[arg(short, long)]
    profile: Option<u32>,
    /// Include directories for `<system>` includes, separated by `;`.
    #[arg(short = 'I', long)]
    include_dirs: Option<String>,
    /// Print the preprocessed source of every stage instead of compiling.
    #[arg(short = 'P', long)]
    preprocess: bool,
    /// Write the output as C byte arrays with the given variable name.
    #[arg(short = 'N', long)]
    cvar: Option<String>,
    /// Flatten uniform blocks into vec4 arrays (GLES only).
    #[arg(short = 'F', long)]
    flatten_ubos: bool,
    /// Write reflection as JSON, next to the output or to the given file.
    #[arg(short, long)]
    reflect: Option<Option<PathBuf>>,
    /// Write the output as an SGS binary container.
    #[arg(short = 'G', long)]
    sgs: bool,
    /// Print the front-end resource limits and exit.
    #[arg(short = 'C', long)]
    dumpc: bool,
    /// Log pipeline progress to stderr.
    #[arg(long)]
    verbose: bool,
}

fn output_options(args: &Args) -> Option<OutputOptions> {
    let path = args.output.clone()?;
    let format = if args.sgs || is_container_path(&path) {
        OutputFormat::Container
    } else if let Some(variable) = args.cvar.clone().filter(|v| !v.is_empty()) {
        OutputFormat::ByteArray { variable }
    } else {
        OutputFormat::Files
    };

    let reflection = match &args.reflect {
        None => ReflectionTarget::Disabled,
        Some(None) => ReflectionTarget::Sibling,
        Some(Some(path)) => ReflectionTarget::Path(path.clone()),
    };

    Some(
        OutputOptions::new(path)
            .with_format(format)
            .with_reflection(reflection),
    )
}

fn compile_request(args: &Args) -> Result<CompileRequest, anyhow::Error> {
    let mut request = CompileRequest::new();
    for (stage, path) in [
        (ShaderStage::Vertex, &args.vert),
        (ShaderStage::Fragment, &args.frag),
        (ShaderStage::Compute, &args.compute),
    ] {
        if let Some(path) = path {
            request = request.stage(stage, path);
        }
    }

    request.language = args.lang;
    request.profile_version = args.profile;
    request.defines = args
        .defines
        .as_deref()
        .map(Define::parse_list)
        .transpose()?
        .unwrap_or_default();
    request.include_dirs = args
        .include_dirs
        .as_deref()
        .map(parse_include_dirs)
        .unwrap_or_default();
    request.preprocess_only = args.preprocess;
    request.invert_y = args.invert_y;
    request.flatten_ubos = args.flatten_ubos;
    request.output = output_options(args);
    Ok(request)
}

pub fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .init();

    if args.dumpc {
        print!("{}", shadercross::reflect::front::limits_config());
        return Ok(());
    }

    let request = compile_request(&args)?;
    match shadercross::compile(&request)? {
        PipelineOutcome::Compiled(stages) => {
            for stage in stages {
                println!("{}", stage.source.display());
            }
        }
        PipelineOutcome::Preprocessed(stages) => {
            for stage in stages {
                println!("{BANNER}");
                println!("{}:", stage.source.name());
                println!("{BANNER}");
                println!("{}", stage.text);
                println!();
            }
        }
    }

    Ok(())
}
