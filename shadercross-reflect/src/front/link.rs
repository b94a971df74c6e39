use crate::error::{FrontendLog, ShaderCompileError};
use crate::front::{LinkedProgram, SpirvStage};
use rspirv::dr::{Module, Operand};
use rustc_hash::{FxHashMap, FxHashSet};
use shadercross_common::ShaderStage;
use spirv::{Decoration, Op, StorageClass};

fn load_module(stage: &SpirvStage) -> Result<Module, ShaderCompileError> {
    let mut loader = rspirv::dr::Loader::new();
    rspirv::binary::parse_words(&stage.spirv, &mut loader)
        .map_err(|e| ShaderCompileError::SpirvParseError(format!("{e:?}")))?;
    Ok(loader.module())
}

/// Get the location of every variable of the given storage class, keyed by location.
fn interface_locations(module: &Module, class: StorageClass) -> FxHashMap<u32, spirv::Word> {
    let variables: FxHashSet<spirv::Word> = module
        .types_global_values
        .iter()
        .filter(|global| {
            global.class.opcode == Op::Variable
                && global.operands.first() == Some(&Operand::StorageClass(class))
        })
        .filter_map(|global| global.result_id)
        .collect();

    module
        .annotations
        .iter()
        .filter_map(|op| {
            if op.class.opcode != Op::Decorate {
                return None;
            }
            let Some(Operand::Decoration(Decoration::Location)) = op.operands.get(1) else {
                return None;
            };
            let Some(&Operand::IdRef(target)) = op.operands.first() else {
                return None;
            };
            if !variables.contains(&target) {
                return None;
            }
            let Some(&Operand::LiteralBit32(location)) = op.operands.get(2) else {
                return None;
            };
            Some((location, target))
        })
        .collect()
}

/// Link parsed stages into a program.
///
/// Every module must declare an entry point, and every located fragment
/// input must be written by a vertex output at the same location.
pub fn link_stages(stages: Vec<SpirvStage>) -> Result<LinkedProgram, ShaderCompileError> {
    let mut errors = Vec::new();
    let mut modules = FxHashMap::default();

    for stage in &stages {
        let module = load_module(stage)?;
        if module.entry_points.is_empty() {
            errors.push(format!(
                "ERROR: {}: {} stage declares no entry point",
                stage.path.display(),
                stage.stage
            ));
        }
        modules.insert(stage.stage, module);
    }

    if let (Some(vertex), Some(fragment)) = (
        modules.get(&ShaderStage::Vertex),
        modules.get(&ShaderStage::Fragment),
    ) {
        let outputs = interface_locations(vertex, StorageClass::Output);
        let inputs = interface_locations(fragment, StorageClass::Input);

        let mut missing: Vec<u32> = inputs
            .keys()
            .copied()
            .filter(|location| !outputs.contains_key(location))
            .collect();
        missing.sort();

        for location in missing {
            errors.push(format!(
                "ERROR: fragment input at location {location} is not written by the vertex stage"
            ));
        }
    }

    if !errors.is_empty() {
        return Err(ShaderCompileError::LinkError(FrontendLog::new(
            errors.join("\n"),
        )));
    }

    Ok(LinkedProgram::new(stages))
}

#[cfg(test)]
mod test {
    use crate::error::ShaderCompileError;
    use crate::front::link::link_stages;
    use crate::front::SpirvStage;
    use rspirv::binary::Assemble;
    use rspirv::dr::{Builder, Operand};
    use shadercross_common::ShaderStage;
    use spirv::{Decoration, StorageClass};

    fn module(stage: ShaderStage, class: StorageClass, locations: &[u32], entry: bool) -> SpirvStage {
        let mut b = Builder::new();
        b.set_version(1, 0);
        b.memory_model(spirv::AddressingModel::Logical, spirv::MemoryModel::GLSL450);

        let void = b.type_void();
        let float = b.type_float(32);
        let vec4 = b.type_vector(float, 4);
        let pointer = b.type_pointer(None, class, vec4);
        let mut interface = Vec::new();
        for &location in locations {
            let var = b.variable(pointer, None, class, None);
            b.decorate(var, Decoration::Location, [Operand::LiteralBit32(location)]);
            interface.push(var);
        }

        let fn_ty = b.type_function(void, []);
        let main = b
            .begin_function(void, None, spirv::FunctionControl::NONE, fn_ty)
            .unwrap();
        b.begin_block(None).unwrap();
        b.ret().unwrap();
        b.end_function().unwrap();

        if entry {
            let model = match stage {
                ShaderStage::Vertex => spirv::ExecutionModel::Vertex,
                ShaderStage::Fragment => spirv::ExecutionModel::Fragment,
                ShaderStage::Compute => spirv::ExecutionModel::GLCompute,
            };
            b.entry_point(model, main, "main", interface);
        }

        SpirvStage {
            stage,
            path: format!("test.{}", stage.short_name()).into(),
            spirv: b.module().assemble(),
        }
    }

    #[test]
    pub fn matching_interfaces_link() {
        let program = link_stages(vec![
            module(ShaderStage::Vertex, StorageClass::Output, &[0, 1, 2], true),
            module(ShaderStage::Fragment, StorageClass::Input, &[0, 2], true),
        ])
        .unwrap();
        assert_eq!(program.stages().len(), 2);
        assert!(program.stage(ShaderStage::Fragment).is_ok());
        assert!(matches!(
            program.stage(ShaderStage::Compute),
            Err(ShaderCompileError::MissingStage(ShaderStage::Compute))
        ));
    }

    #[test]
    pub fn unwritten_fragment_input_fails() {
        let err = link_stages(vec![
            module(ShaderStage::Vertex, StorageClass::Output, &[0], true),
            module(ShaderStage::Fragment, StorageClass::Input, &[0, 3], true),
        ])
        .unwrap_err();

        let ShaderCompileError::LinkError(log) = err else {
            panic!("expected a link error");
        };
        assert!(log.log.contains("location 3"));
    }

    #[test]
    pub fn missing_entry_point_fails() {
        let err = link_stages(vec![module(
            ShaderStage::Compute,
            StorageClass::Input,
            &[],
            false,
        )])
        .unwrap_err();
        assert!(matches!(err, ShaderCompileError::LinkError(_)));
    }
}
