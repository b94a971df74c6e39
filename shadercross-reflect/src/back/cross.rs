use crate::back::{workgroups, BackendOptions, CompiledArtifact, ShaderBackend};
use crate::error::{ShaderCompileError, ShaderReflectError};
use crate::front::SpirvStage;
use crate::reflect::module::ModuleInfo;
use crate::reflect::{DecorationFlags, ShaderInterface, ShaderResources};
use shadercross_common::semantics::VertexSemantic;
use shadercross_common::{ShaderLanguage, ShaderStage};
use spirv::{Decoration, StorageClass};
use spirv_cross::hlsl::ShaderModel;
use spirv_cross::spirv::{Ast, Compile, Module, Parse, Type};
use spirv_cross::{glsl, hlsl, msl};
use std::borrow::Cow;
use std::fmt::{Debug, Formatter};

/// A SPIRV-Cross compiler for one of the target languages.
pub enum CrossCompiler {
    Gles(Ast<glsl::Target>),
    Hlsl(Ast<hlsl::Target>),
    Msl(Ast<msl::Target>),
}

macro_rules! dispatch {
    ($compiler:expr, $ast:ident => $body:expr) => {
        match $compiler {
            CrossCompiler::Gles($ast) => $body,
            CrossCompiler::Hlsl($ast) => $body,
            CrossCompiler::Msl($ast) => $body,
        }
    };
}

/// The profile settings resolved from a profile version.
#[derive(Debug, Copy, Clone)]
enum TargetProfile {
    Gles(glsl::Version),
    Hlsl(ShaderModel),
    Msl(Option<msl::Version>),
}

impl TargetProfile {
    fn new(language: ShaderLanguage, version: u32) -> Result<Self, ShaderCompileError> {
        let unsupported = ShaderCompileError::UnsupportedProfile { language, version };
        Ok(match language {
            ShaderLanguage::Gles => TargetProfile::Gles(match version {
                100 | 200 => glsl::Version::V1_00Es,
                300 => glsl::Version::V3_00Es,
                310 => glsl::Version::V3_10Es,
                320 => glsl::Version::V3_20Es,
                _ => return Err(unsupported),
            }),
            ShaderLanguage::Hlsl => TargetProfile::Hlsl(match version {
                30 => ShaderModel::V3_0,
                40 => ShaderModel::V4_0,
                41 => ShaderModel::V4_1,
                50 => ShaderModel::V5_0,
                51 => ShaderModel::V5_1,
                60 => ShaderModel::V6_0,
                _ => return Err(unsupported),
            }),
            ShaderLanguage::Metal => TargetProfile::Msl(match version {
                0 => None,
                10 => Some(msl::Version::V1_0),
                11 => Some(msl::Version::V1_1),
                12 => Some(msl::Version::V1_2),
                20 => Some(msl::Version::V2_0),
                21 => Some(msl::Version::V2_1),
                22 => Some(msl::Version::V2_2),
                _ => return Err(unsupported),
            }),
        })
    }
}

/// A backend that cross compiles with SPIRV-Cross.
#[derive(Debug, Clone)]
pub struct CrossBackend {
    options: BackendOptions,
    profile: TargetProfile,
}

impl CrossBackend {
    /// Create a backend for the given options.
    ///
    /// Fails if the profile version is not supported by the target language,
    /// or if uniform buffer flattening is requested for a language other than GLSL ES.
    pub fn new(options: BackendOptions) -> Result<Self, ShaderCompileError> {
        let profile = TargetProfile::new(options.language, options.profile_version)?;
        if options.flatten_ubos && options.language != ShaderLanguage::Gles {
            return Err(ShaderCompileError::UnsupportedOption {
                option: "uniform buffer flattening",
                language: options.language,
            });
        }
        Ok(CrossBackend { options, profile })
    }

    fn create_compiler(&self, module: &Module) -> Result<CrossCompiler, ShaderCompileError> {
        let invert_y = self.options.invert_y;
        let compiler = match self.profile {
            TargetProfile::Gles(version) => {
                let mut ast = Ast::<glsl::Target>::parse(module)?;
                let mut options = glsl::CompilerOptions::default();
                options.version = version;
                options.flatten_multidimensional_arrays = true;
                options.vertex.invert_y = invert_y;
                ast.set_compiler_options(&options)?;
                CrossCompiler::Gles(ast)
            }
            TargetProfile::Hlsl(shader_model) => {
                let mut ast = Ast::<hlsl::Target>::parse(module)?;
                let mut options = hlsl::CompilerOptions::default();
                options.shader_model = shader_model;
                options.point_size_compat = true;
                options.point_coord_compat = true;
                options.vertex.invert_y = invert_y;
                ast.set_compiler_options(&options)?;
                CrossCompiler::Hlsl(ast)
            }
            TargetProfile::Msl(version) => {
                let mut ast = Ast::<msl::Target>::parse(module)?;
                let mut options = msl::CompilerOptions::default();
                if let Some(version) = version {
                    options.version = version;
                }
                options.vertex.invert_y = invert_y;
                ast.set_compiler_options(&options)?;
                CrossCompiler::Msl(ast)
            }
        };

        Ok(compiler)
    }

    /// SPIRV-Cross aborts on compute stages below ESSL 3.10, so reject them first.
    fn check_stage(&self, stage: ShaderStage) -> Result<(), ShaderCompileError> {
        match (self.profile, stage) {
            (
                TargetProfile::Gles(glsl::Version::V1_00Es | glsl::Version::V3_00Es),
                ShaderStage::Compute,
            ) => Err(ShaderCompileError::UnsupportedStage {
                stage,
                language: self.options.language,
                version: self.options.profile_version,
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum FlatScalar {
    Float,
    Int,
    UInt,
}

/// The scalar type shared by every member of a type, if it can be packed into
/// an array of 4-component vectors.
fn flat_scalar(
    ast: &Ast<glsl::Target>,
    type_id: u32,
) -> Result<Option<FlatScalar>, ShaderCompileError> {
    Ok(match ast.get_type(type_id)? {
        Type::Float { .. } => Some(FlatScalar::Float),
        Type::Int { .. } => Some(FlatScalar::Int),
        Type::UInt { .. } => Some(FlatScalar::UInt),
        Type::Struct { member_types, .. } => {
            let mut common = None;
            for member in member_types {
                let Some(scalar) = flat_scalar(ast, member)? else {
                    return Ok(None);
                };
                if common.is_some_and(|common| common != scalar) {
                    return Ok(None);
                }
                common = Some(scalar);
            }
            common
        }
        _ => None,
    })
}

/// Flatten every uniform and push constant block into a plain `uniform` vector array.
///
/// SPIRV-Cross aborts on blocks it cannot flatten, so those are rejected here.
fn flatten_buffer_blocks(
    ast: &mut Ast<glsl::Target>,
    resources: &spirv_cross::spirv::ShaderResources,
) -> Result<(), ShaderCompileError> {
    for block in resources
        .uniform_buffers
        .iter()
        .chain(&resources.push_constant_buffers)
    {
        let is_single_block = matches!(
            ast.get_type(block.type_id)?,
            Type::Struct { ref array, .. } if array.is_empty()
        );
        if !is_single_block || flat_scalar(ast, block.base_type_id)?.is_none() {
            return Err(ShaderCompileError::UnflattenableBlock(block.name.clone()));
        }
        ast.flatten_buffer_block(block.id)?;
        tracing::debug!(block = %block.name, "flattened uniform block");
    }
    Ok(())
}

/// Rewrite the `TEXCOORD<location>` semantics SPIRV-Cross assigns to HLSL
/// vertex inputs to the semantic bound to each location.
///
/// Matrix inputs are split into one `TEXCOORD<location>_<column>` input per
/// column. Those keep the column suffix after the remapped semantic.
pub(crate) fn remap_vertex_semantics(code: &str) -> String {
    let mut remapped = String::with_capacity(code.len());
    let mut in_input = false;

    for line in code.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed == "struct SPIRV_Cross_Input" {
            in_input = true;
        } else if in_input && trimmed == "};" {
            in_input = false;
        }

        let semantic = if in_input {
            line.rfind(" : TEXCOORD").and_then(|start| {
                let digits_at = start + " : TEXCOORD".len();
                let rest = &line[digits_at..];
                let end = rest.find(';')?;
                let digits = rest[..end].split('_').next()?;
                let location: u32 = digits.parse().ok()?;
                let semantic = VertexSemantic::for_location(location)?;
                Some((digits_at, digits.len(), semantic))
            })
        } else {
            None
        };

        match semantic {
            Some((digits_at, len, semantic)) => {
                remapped.push_str(&line[..digits_at - "TEXCOORD".len()]);
                remapped.push_str(semantic.name);
                remapped.push_str(&line[digits_at + len..]);
            }
            None => remapped.push_str(line),
        }
    }
    remapped
}

impl ShaderBackend for CrossBackend {
    type Interface = CrossInterface;

    fn cross_compile(
        &self,
        stage: &SpirvStage,
    ) -> Result<CompiledArtifact<CrossInterface>, ShaderCompileError> {
        self.check_stage(stage.stage)?;

        let words = match self.profile {
            TargetProfile::Hlsl(_) => match workgroups::remap_num_workgroups(&stage.spirv)? {
                Some(remapped) => Cow::Owned(remapped),
                None => Cow::Borrowed(stage.spirv.as_slice()),
            },
            _ => Cow::Borrowed(stage.spirv.as_slice()),
        };

        let module = Module::from_words(&words);
        let info = ModuleInfo::from_words(&words)?;
        let mut compiler = self.create_compiler(&module)?;

        let resources = dispatch!(&compiler, ast => ast.get_shader_resources())?;
        if let (CrossCompiler::Gles(ast), true) = (&mut compiler, self.options.flatten_ubos) {
            flatten_buffer_blocks(ast, &resources)?;
        }

        let mut code = dispatch!(&mut compiler, ast => ast.compile())?;

        if let (CrossCompiler::Hlsl(_), ShaderStage::Vertex) = (&compiler, stage.stage) {
            code = remap_vertex_semantics(&code);
        }

        tracing::info!(
            stage = %stage.stage,
            language = %self.options.language,
            path = %stage.path.display(),
            "cross compiled stage"
        );

        Ok(CompiledArtifact {
            stage: stage.stage,
            code,
            resources: ShaderResources::from(resources),
            interface: CrossInterface { compiler, info },
        })
    }
}

/// The shader interface of a stage compiled with SPIRV-Cross.
pub struct CrossInterface {
    compiler: CrossCompiler,
    info: ModuleInfo,
}

impl Debug for CrossInterface {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let target = match self.compiler {
            CrossCompiler::Gles(_) => "gles",
            CrossCompiler::Hlsl(_) => "hlsl",
            CrossCompiler::Msl(_) => "msl",
        };
        f.debug_struct("CrossInterface")
            .field("compiler", &target)
            .field("info", &self.info)
            .finish()
    }
}

impl ShaderInterface for CrossInterface {
    fn storage_class(&self, id: u32) -> Option<StorageClass> {
        self.info.storage_class(id)
    }

    fn decoration_flags(&self, id: u32) -> DecorationFlags {
        self.info.decoration_flags(id)
    }

    fn buffer_block_flags(&self, id: u32) -> DecorationFlags {
        self.info.buffer_block_flags(id)
    }

    fn decoration(&self, id: u32, decoration: Decoration) -> Option<u32> {
        self.info.decoration(id, decoration)
    }

    fn array_extents(&self, type_id: u32) -> Vec<u32> {
        self.info.array_extents(type_id)
    }

    fn declared_struct_size(
        &self,
        type_id: u32,
        runtime_array_len: u32,
    ) -> Result<u32, ShaderReflectError> {
        let size = dispatch!(&self.compiler, ast => ast.get_declared_struct_size(type_id))?;
        Ok(size + runtime_array_len * self.info.runtime_array_stride(type_id))
    }

    fn is_hlsl_counter_buffer(&self, id: u32) -> bool {
        self.info.is_counter_buffer(id)
    }

    fn hlsl_counter_buffer(&self, id: u32) -> Option<u32> {
        self.info.counter_buffer(id)
    }
}

#[cfg(test)]
mod test {
    use crate::back::cross::{remap_vertex_semantics, CrossBackend, TargetProfile};
    use crate::back::{BackendOptions, ShaderBackend};
    use crate::error::ShaderCompileError;
    use crate::front::{ShaderFrontend, ShadercFrontend, SpirvStage};
    use crate::reflect::{reflect_stage, ShaderInterface};
    use shadercross_common::{ShaderLanguage, ShaderStage};
    use shadercross_preprocess::{IncludeResolver, Preamble, ShaderSource};
    use rspirv::binary::Assemble;
    use rspirv::dr::{Builder, Operand};
    use spirv::{Decoration, StorageClass};
    use spirv_cross::glsl;
    use std::path::PathBuf;

    fn parse(stage: ShaderStage, path: &str) -> SpirvStage {
        let includes = IncludeResolver::with_working_dir(
            vec![PathBuf::from("../test/shaders/include")],
            "../test/shaders",
        );
        let frontend = ShadercFrontend::new(Preamble::new(&[]), includes).unwrap();
        let source = ShaderSource::load(stage, path).unwrap();
        frontend.parse(&source).unwrap()
    }

    #[test]
    pub fn remaps_hlsl_vertex_inputs() {
        let code = "struct SPIRV_Cross_Input\n{\n    float4 a_pos : TEXCOORD0;\n    float2 a_uv : TEXCOORD2;\n    float4 a_far : TEXCOORD40;\n};\n\nstruct SPIRV_Cross_Output\n{\n    float2 v_uv : TEXCOORD0;\n};\n";
        let remapped = remap_vertex_semantics(code);
        assert!(remapped.contains("float4 a_pos : POSITION;\n"));
        assert!(remapped.contains("float2 a_uv : TEXCOORD0;\n"));
        assert!(remapped.contains("float4 a_far : TEXCOORD40;\n"));
        assert!(remapped.contains("float2 v_uv : TEXCOORD0;\n"));
        assert_eq!(remapped.lines().count(), code.lines().count());
    }

    #[test]
    pub fn remaps_matrix_vertex_inputs() {
        let code = "struct SPIRV_Cross_Input\n{\n    float4 a_position : TEXCOORD0;\n    float4 a_model_0 : TEXCOORD6_0;\n    float4 a_model_1 : TEXCOORD6_1;\n    float4 a_model_2 : TEXCOORD6_2;\n    float4 a_model_3 : TEXCOORD6_3;\n};\n";
        let remapped = remap_vertex_semantics(code);
        assert!(remapped.contains("float4 a_position : POSITION;\n"));
        for column in 0..4 {
            assert!(remapped.contains(&format!(
                "float4 a_model_{column} : TEXCOORD4_{column};\n"
            )));
        }
        assert!(!remapped.contains("TEXCOORD6"));
    }

    #[test]
    pub fn rejects_unknown_profiles() {
        let mut options = BackendOptions::new(ShaderLanguage::Hlsl);
        options.profile_version = 45;
        assert!(matches!(
            CrossBackend::new(options),
            Err(ShaderCompileError::UnsupportedProfile { version: 45, .. })
        ));

        let mut options = BackendOptions::new(ShaderLanguage::Metal);
        options.profile_version = 13;
        assert!(CrossBackend::new(options).is_err());

        for version in [150, 250, 330, 400] {
            let mut options = BackendOptions::new(ShaderLanguage::Gles);
            options.profile_version = version;
            assert!(matches!(
                CrossBackend::new(options),
                Err(ShaderCompileError::UnsupportedProfile { .. })
            ));
        }
    }

    #[test]
    pub fn maps_every_gles_profile() {
        for (version, expected) in [
            (100, glsl::Version::V1_00Es),
            (200, glsl::Version::V1_00Es),
            (300, glsl::Version::V3_00Es),
            (310, glsl::Version::V3_10Es),
            (320, glsl::Version::V3_20Es),
        ] {
            let mut options = BackendOptions::new(ShaderLanguage::Gles);
            options.profile_version = version;
            let backend = CrossBackend::new(options).unwrap();
            assert!(
                matches!(backend.profile, TargetProfile::Gles(v) if v == expected),
                "{version} mapped to {:?}",
                backend.profile
            );
        }
    }

    #[test]
    pub fn flattening_requires_gles() {
        for language in [ShaderLanguage::Hlsl, ShaderLanguage::Metal] {
            let mut options = BackendOptions::new(language);
            options.flatten_ubos = true;
            assert!(matches!(
                CrossBackend::new(options),
                Err(ShaderCompileError::UnsupportedOption { .. })
            ));
        }
    }

    #[test]
    pub fn compile_gles_310_compute() {
        let compute = parse(ShaderStage::Compute, "../test/shaders/particles.comp");
        let mut options = BackendOptions::new(ShaderLanguage::Gles);
        options.profile_version = 310;
        let backend = CrossBackend::new(options).unwrap();
        let artifact = backend.cross_compile(&compute).unwrap();
        assert!(artifact.code.starts_with("#version 310 es"));
        assert_eq!(artifact.resources.storage_buffers.len(), 2);
    }

    #[test]
    pub fn gles_compute_needs_310() {
        let compute = parse(ShaderStage::Compute, "../test/shaders/particles.comp");
        for version in [200, 300] {
            let mut options = BackendOptions::new(ShaderLanguage::Gles);
            options.profile_version = version;
            let backend = CrossBackend::new(options).unwrap();
            assert!(matches!(
                backend.cross_compile(&compute),
                Err(ShaderCompileError::UnsupportedStage {
                    stage: ShaderStage::Compute,
                    ..
                })
            ));
        }
    }

    // layout(push_constant) uniform Push { vec4 color; vec4 scale; } push;
    // layout(location = 0) out vec4 frag_color;
    // void main() { frag_color = push.scale; }
    fn push_constant_stage() -> SpirvStage {
        let mut b = Builder::new();
        b.set_version(1, 0);
        b.capability(spirv::Capability::Shader);
        b.memory_model(spirv::AddressingModel::Logical, spirv::MemoryModel::GLSL450);

        let void = b.type_void();
        let float = b.type_float(32);
        let vec4 = b.type_vector(float, 4);
        let block = b.type_struct([vec4, vec4]);
        let block_pointer = b.type_pointer(None, StorageClass::PushConstant, block);
        let member_pointer = b.type_pointer(None, StorageClass::PushConstant, vec4);
        let output_pointer = b.type_pointer(None, StorageClass::Output, vec4);
        let push = b.variable(block_pointer, None, StorageClass::PushConstant, None);
        let output = b.variable(output_pointer, None, StorageClass::Output, None);
        let int = b.type_int(32, 1);
        let scale = b.constant_bit32(int, 1);

        b.name(block, "Push");
        b.decorate(block, Decoration::Block, []);
        b.member_decorate(block, 0, Decoration::Offset, [Operand::LiteralBit32(0)]);
        b.member_decorate(block, 1, Decoration::Offset, [Operand::LiteralBit32(16)]);
        b.decorate(output, Decoration::Location, [Operand::LiteralBit32(0)]);

        let fn_type = b.type_function(void, []);
        let main = b
            .begin_function(void, None, spirv::FunctionControl::NONE, fn_type)
            .unwrap();
        b.begin_block(None).unwrap();
        let chain = b.access_chain(member_pointer, None, push, [scale]).unwrap();
        let value = b.load(vec4, None, chain, None, []).unwrap();
        b.store(output, value, None, []).unwrap();
        b.ret().unwrap();
        b.end_function().unwrap();

        b.entry_point(spirv::ExecutionModel::Fragment, main, "main", [output]);
        b.execution_mode(main, spirv::ExecutionMode::OriginUpperLeft, []);

        SpirvStage {
            stage: ShaderStage::Fragment,
            path: PathBuf::from("push.frag"),
            spirv: b.module().assemble(),
        }
    }

    #[test]
    pub fn flattens_uniform_and_push_constant_blocks() {
        let vertex = parse(ShaderStage::Vertex, "../test/shaders/basic.vert");
        let fragment = parse(ShaderStage::Fragment, "../test/shaders/material.frag");
        let mut options = BackendOptions::new(ShaderLanguage::Gles);
        options.profile_version = 300;
        options.flatten_ubos = true;
        let backend = CrossBackend::new(options).unwrap();

        let artifact = backend.cross_compile(&vertex).unwrap();
        assert!(artifact.code.contains("vec4 Transform[4];"));

        let artifact = backend.cross_compile(&fragment).unwrap();
        assert!(artifact.code.contains("vec4 Material[2];"));
        assert!(!artifact.code.contains("uniform Material"));

        let artifact = backend.cross_compile(&push_constant_stage()).unwrap();
        assert_eq!(artifact.resources.push_constant_buffers.len(), 1);
        assert!(artifact.code.contains("vec4 Push[2];"));
    }

    #[test]
    pub fn rejects_mixed_blocks_when_flattening() {
        let fragment = parse(ShaderStage::Fragment, "../test/shaders/mixed.frag");
        let mut options = BackendOptions::new(ShaderLanguage::Gles);
        options.profile_version = 300;
        options.flatten_ubos = true;
        let backend = CrossBackend::new(options).unwrap();
        let Err(ShaderCompileError::UnflattenableBlock(name)) = backend.cross_compile(&fragment)
        else {
            panic!("expected an unflattenable block");
        };
        assert_eq!(name, "Params");
    }

    #[test]
    pub fn remaps_num_workgroups_for_hlsl() {
        let compute = parse(ShaderStage::Compute, "../test/shaders/dispatch.comp");
        let backend = CrossBackend::new(BackendOptions::new(ShaderLanguage::Hlsl)).unwrap();
        let artifact = backend.cross_compile(&compute).unwrap();
        assert!(artifact.code.contains("cbuffer SPIRV_Cross_NumWorkgroups"));
        assert!(artifact.code.contains("register(b0)"));
        assert_eq!(artifact.resources.uniform_buffers.len(), 1);
        assert_eq!(
            artifact.resources.uniform_buffers[0].name,
            "SPIRV_Cross_NumWorkgroups"
        );
    }

    #[test]
    pub fn compile_hlsl_matrix_vertex_input() {
        let vertex = parse(ShaderStage::Vertex, "../test/shaders/instanced.vert");
        let backend = CrossBackend::new(BackendOptions::new(ShaderLanguage::Hlsl)).unwrap();
        let artifact = backend.cross_compile(&vertex).unwrap();
        assert!(artifact.code.contains(": POSITION;"));
        for column in 0..4 {
            assert!(artifact.code.contains(&format!(": TEXCOORD4_{column};")));
        }
    }

    #[test]
    pub fn compile_gles_100() {
        let vertex = parse(ShaderStage::Vertex, "../test/shaders/basic.vert");
        let backend = CrossBackend::new(BackendOptions::new(ShaderLanguage::Gles)).unwrap();
        let artifact = backend.cross_compile(&vertex).unwrap();

        assert!(artifact.code.starts_with("#version 100"));
        assert_eq!(artifact.stage, ShaderStage::Vertex);
        assert!(!artifact.resources.stage_inputs.is_empty());
    }

    #[test]
    pub fn compile_hlsl_with_semantics() {
        let vertex = parse(ShaderStage::Vertex, "../test/shaders/basic.vert");
        let backend = CrossBackend::new(BackendOptions::new(ShaderLanguage::Hlsl)).unwrap();
        let artifact = backend.cross_compile(&vertex).unwrap();

        assert!(artifact.code.contains(": POSITION;"));
        assert!(artifact.code.contains(": TEXCOORD0;"));
    }

    #[test]
    pub fn compile_msl_fragment() {
        let fragment = parse(ShaderStage::Fragment, "../test/shaders/basic.frag");
        let mut options = BackendOptions::new(ShaderLanguage::Metal);
        options.profile_version = 20;
        let backend = CrossBackend::new(options).unwrap();
        let artifact = backend.cross_compile(&fragment).unwrap();
        assert!(artifact.code.contains("#include <metal_stdlib>"));
    }

    #[test]
    pub fn reflects_uniform_block_size() {
        let vertex = parse(ShaderStage::Vertex, "../test/shaders/basic.vert");
        let backend = CrossBackend::new(BackendOptions::new(ShaderLanguage::Gles)).unwrap();
        let artifact = backend.cross_compile(&vertex).unwrap();

        let doc = reflect_stage(
            &artifact.interface,
            &artifact.resources,
            ShaderStage::Vertex,
            "basic_vs.glsl",
            ShaderLanguage::Gles,
            200,
        )
        .unwrap();

        let ubos = doc.reflection.group("uniform_buffers").unwrap();
        assert_eq!(ubos.len(), 1);
        assert_eq!(ubos[0].block_size, Some(64));
        assert_eq!(ubos[0].binding, Some(0));

        let inputs = doc.reflection.group("inputs").unwrap();
        let position = inputs.iter().find(|r| r.name == "a_position").unwrap();
        assert_eq!(position.location, Some(0));
        assert_eq!(position.semantic, Some("POSITION"));

        let uv = inputs.iter().find(|r| r.name == "a_texcoord").unwrap();
        assert_eq!(uv.semantic, Some("TEXCOORD0"));
        assert_eq!(
            artifact.interface.storage_class(ubos[0].id),
            Some(spirv::StorageClass::Uniform)
        );
    }

    #[test]
    pub fn reflects_compute_storage_buffers() {
        let compute = parse(ShaderStage::Compute, "../test/shaders/particles.comp");
        let backend = CrossBackend::new(BackendOptions::new(ShaderLanguage::Hlsl)).unwrap();
        let artifact = backend.cross_compile(&compute).unwrap();

        let doc = reflect_stage(
            &artifact.interface,
            &artifact.resources,
            ShaderStage::Compute,
            "particles_cs.hlsl",
            ShaderLanguage::Hlsl,
            50,
        )
        .unwrap();

        // SPIR-V 1.0 storage buffers are BufferBlock decorated uniforms, so they are sized.
        let buffers = doc.reflection.group("storage_buffers").unwrap();
        let input = buffers.iter().find(|r| r.binding == Some(0)).unwrap();
        assert!(input.readonly);
        assert!(!input.writeonly);
        assert_eq!(input.block_size, Some(0));
        assert_eq!(input.unsized_array_stride, Some(16));

        let output = buffers.iter().find(|r| r.binding == Some(1)).unwrap();
        assert!(!output.readonly);
        assert_eq!(output.hlsl_counter_buffer_id, None);
    }
}
