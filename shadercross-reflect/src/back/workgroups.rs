use crate::error::ShaderCompileError;
use rspirv::binary::Assemble;
use rspirv::dr::{Builder, Instruction, Module, Operand};
use rustc_hash::FxHashMap;
use spirv::{BuiltIn, Decoration, Op, StorageClass};

/// The name of the constant buffer that replaces `gl_NumWorkGroups`.
pub const NUM_WORKGROUPS_BLOCK: &str = "SPIRV_Cross_NumWorkgroups";

fn invalid(message: &str) -> ShaderCompileError {
    ShaderCompileError::SpirvParseError(format!("NumWorkgroups builtin: {message}"))
}

/// Find the variable decorated with the given builtin.
fn find_builtin(module: &Module, builtin: BuiltIn) -> Option<spirv::Word> {
    module.annotations.iter().find_map(|op| {
        if op.class.opcode != Op::Decorate {
            return None;
        }
        let Some(Operand::Decoration(Decoration::BuiltIn)) = op.operands.get(1) else {
            return None;
        };
        let Some(&Operand::BuiltIn(decorated)) = op.operands.get(2) else {
            return None;
        };
        if decorated != builtin {
            return None;
        }
        match op.operands.first() {
            Some(&Operand::IdRef(target)) => Some(target),
            _ => None,
        }
    })
}

/// Pointer types of the module, keyed by id.
fn pointer_types(module: &Module) -> FxHashMap<spirv::Word, (StorageClass, spirv::Word)> {
    module
        .types_global_values
        .iter()
        .filter(|inst| inst.class.opcode == Op::TypePointer)
        .filter_map(|inst| {
            let id = inst.result_id?;
            match (inst.operands.first(), inst.operands.get(1)) {
                (Some(&Operand::StorageClass(class)), Some(&Operand::IdRef(pointee))) => {
                    Some((id, (class, pointee)))
                }
                _ => None,
            }
        })
        .collect()
}

fn references(inst: &Instruction, id: spirv::Word) -> bool {
    inst.operands.iter().any(|op| op.id_ref_any() == Some(id))
}

/// Move the `NumWorkgroups` builtin input of a compute module into a uniform
/// block at set 0, binding 0.
///
/// HLSL has no system value for the dispatch size, so it has to be supplied
/// in a constant buffer. Every load of the builtin, or of one of its
/// components, becomes a load from the single `uint3` member of the block.
///
/// Returns `None` if the module does not use the builtin.
pub fn remap_num_workgroups(words: &[u32]) -> Result<Option<Vec<u32>>, ShaderCompileError> {
    let mut loader = rspirv::dr::Loader::new();
    rspirv::binary::parse_words(words, &mut loader)
        .map_err(|e| ShaderCompileError::SpirvParseError(format!("{e:?}")))?;
    let module = loader.module();

    let Some(builtin) = find_builtin(&module, BuiltIn::NumWorkgroups) else {
        return Ok(None);
    };

    let pointers = pointer_types(&module);
    let value_type = module
        .types_global_values
        .iter()
        .find(|inst| inst.result_id == Some(builtin) && inst.class.opcode == Op::Variable)
        .and_then(|inst| inst.result_type)
        .and_then(|ty| pointers.get(&ty))
        .map(|&(_, pointee)| pointee)
        .ok_or_else(|| invalid("not a variable"))?;
    let component_type = module
        .types_global_values
        .iter()
        .find(|inst| inst.result_id == Some(value_type) && inst.class.opcode == Op::TypeVector)
        .and_then(|inst| match inst.operands.first() {
            Some(&Operand::IdRef(component)) => Some(component),
            _ => None,
        })
        .ok_or_else(|| invalid("not a vector"))?;

    let mut builder = Builder::new_from_module(module);

    // Declared by hand so an identical struct elsewhere in the module is not reused.
    let block = builder.id();
    builder
        .module_mut()
        .types_global_values
        .push(Instruction::new(
            Op::TypeStruct,
            None,
            Some(block),
            vec![Operand::IdRef(value_type)],
        ));
    let block_pointer = builder.type_pointer(None, StorageClass::Uniform, block);
    let member_pointer = builder.type_pointer(None, StorageClass::Uniform, value_type);
    let variable = builder.variable(block_pointer, None, StorageClass::Uniform, None);
    let first_member = builder.constant_bit32(component_type, 0);

    builder.name(block, NUM_WORKGROUPS_BLOCK);
    builder.member_name(block, 0, "count");
    builder.decorate(block, Decoration::Block, []);
    builder.member_decorate(block, 0, Decoration::Offset, [Operand::LiteralBit32(0)]);
    builder.decorate(variable, Decoration::DescriptorSet, [Operand::LiteralBit32(0)]);
    builder.decorate(variable, Decoration::Binding, [Operand::LiteralBit32(0)]);

    let mut functions = std::mem::take(&mut builder.module_mut().functions);
    for function in &mut functions {
        for body in &mut function.blocks {
            let mut instructions = Vec::with_capacity(body.instructions.len() + 1);
            for mut inst in body.instructions.drain(..) {
                if !references(&inst, builtin) {
                    instructions.push(inst);
                    continue;
                }

                match inst.class.opcode {
                    Op::Load => {
                        let chain = builder.id();
                        instructions.push(Instruction::new(
                            Op::AccessChain,
                            Some(member_pointer),
                            Some(chain),
                            vec![Operand::IdRef(variable), Operand::IdRef(first_member)],
                        ));
                        inst.operands[0] = Operand::IdRef(chain);
                    }
                    Op::AccessChain | Op::InBoundsAccessChain
                        if inst.operands.first() == Some(&Operand::IdRef(builtin)) =>
                    {
                        let pointee = inst
                            .result_type
                            .and_then(|ty| pointers.get(&ty))
                            .map(|&(_, pointee)| pointee)
                            .ok_or_else(|| invalid("access chain without a pointer type"))?;
                        inst.result_type =
                            Some(builder.type_pointer(None, StorageClass::Uniform, pointee));
                        inst.operands[0] = Operand::IdRef(variable);
                        inst.operands.insert(1, Operand::IdRef(first_member));
                    }
                    _ => return Err(invalid("only loads and access chains are supported")),
                }
                instructions.push(inst);
            }
            body.instructions = instructions;
        }
    }
    builder.module_mut().functions = functions;

    let module = builder.module_mut();
    module
        .annotations
        .retain(|inst| !references(inst, builtin));
    module
        .debug_names
        .retain(|inst| !references(inst, builtin));
    module
        .types_global_values
        .retain(|inst| inst.result_id != Some(builtin));
    for entry_point in &mut module.entry_points {
        entry_point
            .operands
            .retain(|op| op.id_ref_any() != Some(builtin));
    }

    tracing::debug!(
        block = NUM_WORKGROUPS_BLOCK,
        "moved NumWorkgroups into a uniform block at binding 0"
    );
    Ok(Some(builder.module().assemble()))
}
