use crate::error::ShaderCompileError;
use crate::reflect::DecorationFlags;
use rspirv::dr::{Instruction, Module, Operand};
use rustc_hash::FxHashMap;
use spirv::{Decoration, Op, StorageClass};

/// The decorations and type declarations of a SPIR-V module that
/// spirv-cross does not expose.
#[derive(Debug, Default, Clone)]
pub struct ModuleInfo {
    storage_classes: FxHashMap<spirv::Word, StorageClass>,
    variable_types: FxHashMap<spirv::Word, spirv::Word>,
    decorations: FxHashMap<spirv::Word, Vec<(Decoration, Option<u32>)>>,
    member_decorations: FxHashMap<spirv::Word, FxHashMap<u32, DecorationFlags>>,
    member_offsets: FxHashMap<spirv::Word, FxHashMap<u32, u32>>,
    counter_buffers: FxHashMap<spirv::Word, spirv::Word>,
    types: FxHashMap<spirv::Word, TypeDecl>,
    constants: FxHashMap<spirv::Word, u32>,
}

#[derive(Debug, Clone)]
enum TypeDecl {
    Pointer(spirv::Word),
    Array { element: spirv::Word, length: spirv::Word },
    RuntimeArray(spirv::Word),
    Struct(Vec<spirv::Word>),
}

fn id_operand(inst: &Instruction, index: usize) -> Option<spirv::Word> {
    match inst.operands.get(index) {
        Some(&Operand::IdRef(id)) => Some(id),
        _ => None,
    }
}

fn literal_operand(inst: &Instruction, index: usize) -> Option<u32> {
    match inst.operands.get(index) {
        Some(&Operand::LiteralBit32(value)) => Some(value),
        _ => None,
    }
}

fn decoration_operand(inst: &Instruction, index: usize) -> Option<Decoration> {
    match inst.operands.get(index) {
        Some(&Operand::Decoration(decoration)) => Some(decoration),
        _ => None,
    }
}

impl ModuleInfo {
    /// Parse module info from SPIR-V words.
    pub fn from_words(words: &[u32]) -> Result<ModuleInfo, ShaderCompileError> {
        let mut loader = rspirv::dr::Loader::new();
        rspirv::binary::parse_words(words, &mut loader)
            .map_err(|e| ShaderCompileError::SpirvParseError(format!("{e:?}")))?;
        Ok(ModuleInfo::from_module(&loader.module()))
    }

    /// Collect module info from a loaded module.
    pub fn from_module(module: &Module) -> ModuleInfo {
        let mut info = ModuleInfo::default();

        for inst in &module.annotations {
            match inst.class.opcode {
                Op::Decorate => {
                    let (Some(target), Some(decoration)) =
                        (id_operand(inst, 0), decoration_operand(inst, 1))
                    else {
                        continue;
                    };
                    info.decorations
                        .entry(target)
                        .or_default()
                        .push((decoration, literal_operand(inst, 2)));
                }
                Op::MemberDecorate => {
                    let (Some(target), Some(member), Some(decoration)) = (
                        id_operand(inst, 0),
                        literal_operand(inst, 1),
                        decoration_operand(inst, 2),
                    ) else {
                        continue;
                    };
                    *info
                        .member_decorations
                        .entry(target)
                        .or_default()
                        .entry(member)
                        .or_default() |= DecorationFlags::from_decoration(decoration);
                    if let (Decoration::Offset, Some(offset)) =
                        (decoration, literal_operand(inst, 3))
                    {
                        info.member_offsets
                            .entry(target)
                            .or_default()
                            .insert(member, offset);
                    }
                }
                Op::DecorateId => {
                    let (Some(target), Some(Decoration::CounterBuffer), Some(counter)) = (
                        id_operand(inst, 0),
                        decoration_operand(inst, 1),
                        id_operand(inst, 2),
                    ) else {
                        continue;
                    };
                    info.counter_buffers.insert(target, counter);
                }
                _ => {}
            }
        }

        for inst in &module.types_global_values {
            let Some(result_id) = inst.result_id else {
                continue;
            };

            match inst.class.opcode {
                Op::Variable => {
                    if let Some(&Operand::StorageClass(class)) = inst.operands.first() {
                        info.storage_classes.insert(result_id, class);
                    }
                    if let Some(ty) = inst.result_type {
                        info.variable_types.insert(result_id, ty);
                    }
                }
                Op::TypePointer => {
                    if let Some(pointee) = id_operand(inst, 1) {
                        info.types.insert(result_id, TypeDecl::Pointer(pointee));
                    }
                }
                Op::TypeArray => {
                    if let (Some(element), Some(length)) = (id_operand(inst, 0), id_operand(inst, 1))
                    {
                        info.types
                            .insert(result_id, TypeDecl::Array { element, length });
                    }
                }
                Op::TypeRuntimeArray => {
                    if let Some(element) = id_operand(inst, 0) {
                        info.types.insert(result_id, TypeDecl::RuntimeArray(element));
                    }
                }
                Op::TypeStruct => {
                    let members = inst
                        .operands
                        .iter()
                        .filter_map(|op| match op {
                            &Operand::IdRef(id) => Some(id),
                            _ => None,
                        })
                        .collect();
                    info.types.insert(result_id, TypeDecl::Struct(members));
                }
                Op::Constant | Op::SpecConstant => {
                    if let Some(value) = literal_operand(inst, 0) {
                        info.constants.insert(result_id, value);
                    }
                }
                _ => {}
            }
        }

        info
    }

    pub fn storage_class(&self, id: spirv::Word) -> Option<StorageClass> {
        self.storage_classes.get(&id).copied()
    }

    pub fn decoration_flags(&self, id: spirv::Word) -> DecorationFlags {
        self.decorations
            .get(&id)
            .into_iter()
            .flatten()
            .fold(DecorationFlags::empty(), |flags, &(decoration, _)| {
                flags | DecorationFlags::from_decoration(decoration)
            })
    }

    pub fn decoration(&self, id: spirv::Word, decoration: Decoration) -> Option<u32> {
        self.decorations
            .get(&id)?
            .iter()
            .find(|&&(d, _)| d == decoration)
            .map(|&(_, value)| value.unwrap_or(0))
    }

    /// The decorations of the variable, plus those shared by every member of
    /// the struct it points to.
    pub fn buffer_block_flags(&self, id: spirv::Word) -> DecorationFlags {
        let mut flags = self.decoration_flags(id);

        let Some(base) = self.variable_types.get(&id).map(|&ty| self.base_type(ty)) else {
            return flags;
        };
        let Some(TypeDecl::Struct(members)) = self.types.get(&base) else {
            return flags;
        };
        if members.is_empty() {
            return flags;
        }

        let member_flags = self.member_decorations.get(&base);
        let shared = (0..members.len() as u32).fold(DecorationFlags::all(), |shared, index| {
            shared
                & member_flags
                    .and_then(|m| m.get(&index))
                    .copied()
                    .unwrap_or_default()
        });
        flags |= shared;
        flags
    }

    /// Strip pointers and arrays from a type.
    pub fn base_type(&self, mut type_id: spirv::Word) -> spirv::Word {
        loop {
            match self.types.get(&type_id) {
                Some(&TypeDecl::Pointer(inner))
                | Some(&TypeDecl::Array { element: inner, .. })
                | Some(&TypeDecl::RuntimeArray(inner)) => type_id = inner,
                _ => return type_id,
            }
        }
    }

    /// Array extents of a type, outermost first.
    pub fn array_extents(&self, type_id: spirv::Word) -> Vec<u32> {
        let mut extents = Vec::new();
        let mut current = type_id;
        if let Some(&TypeDecl::Pointer(pointee)) = self.types.get(&current) {
            current = pointee;
        }

        loop {
            match self.types.get(&current) {
                Some(&TypeDecl::Array { element, length }) => {
                    extents.push(self.constants.get(&length).copied().unwrap_or(0));
                    current = element;
                }
                Some(&TypeDecl::RuntimeArray(element)) => {
                    extents.push(0);
                    current = element;
                }
                _ => return extents,
            }
        }
    }

    /// The array stride of the runtime array member of a struct, or 0.
    ///
    /// A runtime array has to be the member at the highest offset, which need
    /// not be the last declared member.
    pub fn runtime_array_stride(&self, struct_id: spirv::Word) -> u32 {
        let Some(TypeDecl::Struct(members)) = self.types.get(&struct_id) else {
            return 0;
        };
        let offsets = self.member_offsets.get(&struct_id);
        let Some(&last) = members
            .iter()
            .enumerate()
            .max_by_key(|&(index, _)| {
                offsets
                    .and_then(|offsets| offsets.get(&(index as u32)))
                    .copied()
                    .unwrap_or(0)
            })
            .map(|(_, member)| member)
        else {
            return 0;
        };
        match self.types.get(&last) {
            Some(TypeDecl::RuntimeArray(_)) => {
                self.decoration(last, Decoration::ArrayStride).unwrap_or(0)
            }
            _ => 0,
        }
    }

    pub fn is_counter_buffer(&self, id: spirv::Word) -> bool {
        self.counter_buffers.values().any(|&counter| counter == id)
    }

    pub fn counter_buffer(&self, id: spirv::Word) -> Option<spirv::Word> {
        self.counter_buffers.get(&id).copied()
    }
}
