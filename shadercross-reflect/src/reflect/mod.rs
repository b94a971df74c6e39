use crate::error::ShaderReflectError;
use bitflags::bitflags;
use spirv::{Decoration, StorageClass};

/// Classification of shader resources into reflection records.
pub mod classify;

/// Reflection documents.
pub mod document;

/// SPIR-V module queries for decorations, storage classes and types.
pub mod module;

pub use classify::{classify, ResourceKind};
pub use document::{reflect_stage, ReflectionDocument, ResourceRecord, StageReflection};

bitflags! {
    /// The decorations on a resource that are surfaced in reflection.
    #[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Default)]
    pub struct DecorationFlags: u32 {
        const LOCATION = 1 << 0;
        const DESCRIPTOR_SET = 1 << 1;
        const BINDING = 1 << 2;
        const INPUT_ATTACHMENT_INDEX = 1 << 3;
        const NON_READABLE = 1 << 4;
        const NON_WRITABLE = 1 << 5;
        const BLOCK = 1 << 6;
        const BUFFER_BLOCK = 1 << 7;
    }
}

impl DecorationFlags {
    /// The flag for the given decoration, if it is one that is tracked.
    pub fn from_decoration(decoration: Decoration) -> DecorationFlags {
        match decoration {
            Decoration::Location => DecorationFlags::LOCATION,
            Decoration::DescriptorSet => DecorationFlags::DESCRIPTOR_SET,
            Decoration::Binding => DecorationFlags::BINDING,
            Decoration::InputAttachmentIndex => DecorationFlags::INPUT_ATTACHMENT_INDEX,
            Decoration::NonReadable => DecorationFlags::NON_READABLE,
            Decoration::NonWritable => DecorationFlags::NON_WRITABLE,
            Decoration::Block => DecorationFlags::BLOCK,
            Decoration::BufferBlock => DecorationFlags::BUFFER_BLOCK,
            _ => DecorationFlags::empty(),
        }
    }
}

/// A shader interface resource as reported by the backend.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Resource {
    /// The id of the variable.
    pub id: u32,
    /// The type of the variable, including any array dimensions.
    pub type_id: u32,
    /// The underlying type, with pointers and arrays stripped.
    pub base_type_id: u32,
    /// The declared name, which may be empty.
    pub name: String,
}

impl From<spirv_cross::spirv::Resource> for Resource {
    fn from(value: spirv_cross::spirv::Resource) -> Self {
        Resource {
            id: value.id,
            type_id: value.type_id,
            base_type_id: value.base_type_id,
            name: value.name,
        }
    }
}

/// The resources of a compiled stage, grouped by category.
#[derive(Debug, Clone, Default)]
pub struct ShaderResources {
    pub subpass_inputs: Vec<Resource>,
    pub stage_inputs: Vec<Resource>,
    pub stage_outputs: Vec<Resource>,
    pub sampled_images: Vec<Resource>,
    pub separate_images: Vec<Resource>,
    pub separate_samplers: Vec<Resource>,
    pub storage_images: Vec<Resource>,
    pub storage_buffers: Vec<Resource>,
    pub uniform_buffers: Vec<Resource>,
    pub push_constant_buffers: Vec<Resource>,
    pub atomic_counters: Vec<Resource>,
}

impl From<spirv_cross::spirv::ShaderResources> for ShaderResources {
    fn from(value: spirv_cross::spirv::ShaderResources) -> Self {
        fn convert(resources: Vec<spirv_cross::spirv::Resource>) -> Vec<Resource> {
            resources.into_iter().map(Resource::from).collect()
        }

        ShaderResources {
            subpass_inputs: convert(value.subpass_inputs),
            stage_inputs: convert(value.stage_inputs),
            stage_outputs: convert(value.stage_outputs),
            sampled_images: convert(value.sampled_images),
            separate_images: convert(value.separate_images),
            separate_samplers: convert(value.separate_samplers),
            storage_images: convert(value.storage_images),
            storage_buffers: convert(value.storage_buffers),
            uniform_buffers: convert(value.uniform_buffers),
            push_constant_buffers: convert(value.push_constant_buffers),
            atomic_counters: convert(value.atomic_counters),
        }
    }
}

/// Queries on the shader interface of a compiled stage.
///
/// Ids are SPIR-V result ids of the stage's module.
pub trait ShaderInterface {
    /// The storage class of a variable.
    fn storage_class(&self, id: u32) -> Option<StorageClass>;

    /// The tracked decorations present on an id.
    fn decoration_flags(&self, id: u32) -> DecorationFlags;

    /// The decorations of a buffer block variable: the decorations on the
    /// variable, plus the member decorations shared by every member of its block.
    fn buffer_block_flags(&self, id: u32) -> DecorationFlags;

    /// The literal value of a decoration on an id, if present.
    fn decoration(&self, id: u32, decoration: Decoration) -> Option<u32>;

    /// The array extents of a type, outermost first. Runtime arrays have an extent of 0.
    fn array_extents(&self, type_id: u32) -> Vec<u32>;

    /// The declared size of a struct type, with the given number of elements
    /// in a trailing runtime array.
    fn declared_struct_size(
        &self,
        type_id: u32,
        runtime_array_len: u32,
    ) -> Result<u32, ShaderReflectError>;

    /// The name used for ids that have no name of their own.
    fn fallback_name(&self, id: u32) -> String {
        format!("_{id}")
    }

    /// Whether the buffer is the counter buffer of another buffer.
    fn is_hlsl_counter_buffer(&self, id: u32) -> bool;

    /// The counter buffer paired with the buffer, if any.
    fn hlsl_counter_buffer(&self, id: u32) -> Option<u32>;
}

impl<T: ShaderInterface + ?Sized> ShaderInterface for &T {
    fn storage_class(&self, id: u32) -> Option<StorageClass> {
        (**self).storage_class(id)
    }

    fn decoration_flags(&self, id: u32) -> DecorationFlags {
        (**self).decoration_flags(id)
    }

    fn buffer_block_flags(&self, id: u32) -> DecorationFlags {
        (**self).buffer_block_flags(id)
    }

    fn decoration(&self, id: u32, decoration: Decoration) -> Option<u32> {
        (**self).decoration(id, decoration)
    }

    fn array_extents(&self, type_id: u32) -> Vec<u32> {
        (**self).array_extents(type_id)
    }

    fn declared_struct_size(
        &self,
        type_id: u32,
        runtime_array_len: u32,
    ) -> Result<u32, ShaderReflectError> {
        (**self).declared_struct_size(type_id, runtime_array_len)
    }

    fn fallback_name(&self, id: u32) -> String {
        (**self).fallback_name(id)
    }

    fn is_hlsl_counter_buffer(&self, id: u32) -> bool {
        (**self).is_hlsl_counter_buffer(id)
    }

    fn hlsl_counter_buffer(&self, id: u32) -> Option<u32> {
        (**self).hlsl_counter_buffer(id)
    }
}
