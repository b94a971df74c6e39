use crate::error::ShaderReflectError;
use crate::reflect::document::ResourceRecord;
use crate::reflect::{DecorationFlags, Resource, ShaderInterface};
use shadercross_common::semantics::VertexSemantic;
use spirv::{Decoration, StorageClass};

/// How a resource is classified.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResourceKind {
    Regular,
    /// Storage buffers read their decorations from the buffer block flags,
    /// and may be paired with an HLSL counter buffer.
    StorageBuffer,
    /// Vertex stage inputs carry the semantic bound to their location.
    VertexInput,
}

/// Classify a resource into a reflection record.
///
/// Returns `Ok(None)` for resources that are not reported, which are the
/// counter buffers backing HLSL append and consume buffers.
pub fn classify(
    iface: &impl ShaderInterface,
    resource: &Resource,
    kind: ResourceKind,
) -> Result<Option<ResourceRecord>, ShaderReflectError> {
    if kind == ResourceKind::StorageBuffer && iface.is_hlsl_counter_buffer(resource.id) {
        return Ok(None);
    }

    let storage_class = iface.storage_class(resource.id);
    let is_push_constant = storage_class == Some(StorageClass::PushConstant);
    let is_block = iface
        .decoration_flags(resource.base_type_id)
        .intersects(DecorationFlags::BLOCK | DecorationFlags::BUFFER_BLOCK);
    let is_sized_block = is_block
        && matches!(
            storage_class,
            Some(StorageClass::Uniform) | Some(StorageClass::UniformConstant)
        );

    let name = if !resource.name.is_empty() {
        resource.name.clone()
    } else if is_block && !is_push_constant {
        iface.fallback_name(resource.base_type_id)
    } else {
        iface.fallback_name(resource.id)
    };

    let mask = match kind {
        ResourceKind::StorageBuffer => iface.buffer_block_flags(resource.id),
        _ => iface.decoration_flags(resource.id),
    };

    let decoration = |flag: DecorationFlags, decoration: Decoration| {
        if mask.contains(flag) {
            Some(iface.decoration(resource.id, decoration).unwrap_or(0))
        } else {
            None
        }
    };

    let extents = iface.array_extents(resource.type_id);
    let array = if extents.is_empty() {
        None
    } else {
        Some(extents.iter().sum::<u32>())
    };

    let (block_size, unsized_array_stride) = if is_sized_block {
        let size = iface.declared_struct_size(resource.base_type_id, 0)?;
        let stride = iface
            .declared_struct_size(resource.base_type_id, 1)?
            .saturating_sub(size);
        (Some(size), Some(stride).filter(|&stride| stride != 0))
    } else {
        (None, None)
    };

    let location = decoration(DecorationFlags::LOCATION, Decoration::Location);
    let semantic = match (kind, location) {
        (ResourceKind::VertexInput, Some(location)) => VertexSemantic::for_location(location),
        _ => None,
    };

    let hlsl_counter_buffer_id = match kind {
        ResourceKind::StorageBuffer => iface.hlsl_counter_buffer(resource.id),
        _ => None,
    };

    Ok(Some(ResourceRecord {
        id: resource.id,
        name,
        array,
        location,
        set: decoration(DecorationFlags::DESCRIPTOR_SET, Decoration::DescriptorSet),
        binding: decoration(DecorationFlags::BINDING, Decoration::Binding),
        attachment: decoration(
            DecorationFlags::INPUT_ATTACHMENT_INDEX,
            Decoration::InputAttachmentIndex,
        ),
        writeonly: mask.contains(DecorationFlags::NON_READABLE),
        readonly: mask.contains(DecorationFlags::NON_WRITABLE),
        block_size,
        unsized_array_stride,
        semantic: semantic.map(|s| s.name),
        semantic_index: semantic.map(|s| s.index),
        hlsl_counter_buffer_id,
    }))
}

#[cfg(test)]
pub(crate) mod test {
    use crate::error::ShaderReflectError;
    use crate::reflect::{classify, DecorationFlags, Resource, ResourceKind, ShaderInterface};
    use rustc_hash::FxHashMap;
    use spirv::{Decoration, StorageClass};

    /// An in-memory shader interface.
    #[derive(Default)]
    pub struct FakeInterface {
        pub storage_classes: FxHashMap<u32, StorageClass>,
        pub flags: FxHashMap<u32, DecorationFlags>,
        pub block_flags: FxHashMap<u32, DecorationFlags>,
        pub values: FxHashMap<(u32, u32), u32>,
        pub extents: FxHashMap<u32, Vec<u32>>,
        pub sizes: FxHashMap<u32, (u32, u32)>,
        pub counters: FxHashMap<u32, u32>,
    }

    impl FakeInterface {
        pub fn decorate(&mut self, id: u32, decoration: Decoration, value: u32) -> &mut Self {
            *self.flags.entry(id).or_default() |= DecorationFlags::from_decoration(decoration);
            self.values.insert((id, decoration as u32), value);
            self
        }
    }

    impl ShaderInterface for FakeInterface {
        fn storage_class(&self, id: u32) -> Option<StorageClass> {
            self.storage_classes.get(&id).copied()
        }

        fn decoration_flags(&self, id: u32) -> DecorationFlags {
            self.flags.get(&id).copied().unwrap_or_default()
        }

        fn buffer_block_flags(&self, id: u32) -> DecorationFlags {
            self.decoration_flags(id) | self.block_flags.get(&id).copied().unwrap_or_default()
        }

        fn decoration(&self, id: u32, decoration: Decoration) -> Option<u32> {
            self.values.get(&(id, decoration as u32)).copied()
        }

        fn array_extents(&self, type_id: u32) -> Vec<u32> {
            self.extents.get(&type_id).cloned().unwrap_or_default()
        }

        fn declared_struct_size(
            &self,
            type_id: u32,
            runtime_array_len: u32,
        ) -> Result<u32, ShaderReflectError> {
            let (size, stride) = self.sizes.get(&type_id).copied().unwrap_or_default();
            Ok(size + stride * runtime_array_len)
        }

        fn is_hlsl_counter_buffer(&self, id: u32) -> bool {
            self.counters.values().any(|&counter| counter == id)
        }

        fn hlsl_counter_buffer(&self, id: u32) -> Option<u32> {
            self.counters.get(&id).copied()
        }
    }

    pub fn resource(id: u32, type_id: u32, base_type_id: u32, name: &str) -> Resource {
        Resource {
            id,
            type_id,
            base_type_id,
            name: name.to_string(),
        }
    }

    #[test]
    pub fn named_resources_keep_their_name() {
        let iface = FakeInterface::default();
        let record = classify(&iface, &resource(7, 8, 9, "albedo"), ResourceKind::Regular)
            .unwrap()
            .unwrap();
        assert_eq!(record.name, "albedo");
        assert_eq!(record.id, 7);
    }

    #[test]
    pub fn unnamed_blocks_fall_back_to_base_type() {
        let mut iface = FakeInterface::default();
        iface.storage_classes.insert(10, StorageClass::Uniform);
        iface.decorate(12, Decoration::Block, 0);

        let record = classify(&iface, &resource(10, 11, 12, ""), ResourceKind::Regular)
            .unwrap()
            .unwrap();
        assert_eq!(record.name, "_12");
    }

    #[test]
    pub fn unnamed_push_constants_fall_back_to_own_id() {
        let mut iface = FakeInterface::default();
        iface.storage_classes.insert(10, StorageClass::PushConstant);
        iface.decorate(12, Decoration::Block, 0);

        let record = classify(&iface, &resource(10, 11, 12, ""), ResourceKind::Regular)
            .unwrap()
            .unwrap();
        assert_eq!(record.name, "_10");
        assert_eq!(record.block_size, None);
    }

    #[test]
    pub fn array_is_sum_of_extents() {
        let mut iface = FakeInterface::default();
        iface.extents.insert(11, vec![2, 3]);

        let record = classify(&iface, &resource(10, 11, 12, "grid"), ResourceKind::Regular)
            .unwrap()
            .unwrap();
        assert_eq!(record.array, Some(5));

        let scalar = classify(&iface, &resource(20, 21, 22, "one"), ResourceKind::Regular)
            .unwrap()
            .unwrap();
        assert_eq!(scalar.array, None);
    }

    #[test]
    pub fn sized_block_requires_uniform_storage() {
        let mut iface = FakeInterface::default();
        iface.decorate(12, Decoration::Block, 0);
        iface.sizes.insert(12, (64, 16));

        iface.storage_classes.insert(10, StorageClass::Uniform);
        let uniform = classify(&iface, &resource(10, 11, 12, "ubo"), ResourceKind::Regular)
            .unwrap()
            .unwrap();
        assert_eq!(uniform.block_size, Some(64));
        assert_eq!(uniform.unsized_array_stride, Some(16));

        iface.storage_classes.insert(10, StorageClass::StorageBuffer);
        let storage = classify(&iface, &resource(10, 11, 12, "ssbo"), ResourceKind::StorageBuffer)
            .unwrap()
            .unwrap();
        assert_eq!(storage.block_size, None);
        assert_eq!(storage.unsized_array_stride, None);
    }

    #[test]
    pub fn zero_stride_is_omitted() {
        let mut iface = FakeInterface::default();
        iface.storage_classes.insert(10, StorageClass::Uniform);
        iface.decorate(12, Decoration::Block, 0);
        iface.sizes.insert(12, (32, 0));

        let record = classify(&iface, &resource(10, 11, 12, "ubo"), ResourceKind::Regular)
            .unwrap()
            .unwrap();
        assert_eq!(record.block_size, Some(32));
        assert_eq!(record.unsized_array_stride, None);
    }

    #[test]
    pub fn decorations_surface_only_when_present() {
        let mut iface = FakeInterface::default();
        iface
            .decorate(10, Decoration::DescriptorSet, 0)
            .decorate(10, Decoration::Binding, 3);

        let record = classify(&iface, &resource(10, 11, 12, "tex"), ResourceKind::Regular)
            .unwrap()
            .unwrap();
        assert_eq!(record.set, Some(0));
        assert_eq!(record.binding, Some(3));
        assert_eq!(record.location, None);
        assert_eq!(record.attachment, None);
        assert!(!record.readonly);
        assert!(!record.writeonly);
    }

    #[test]
    pub fn storage_buffers_use_block_flags() {
        let mut iface = FakeInterface::default();
        iface.storage_classes.insert(10, StorageClass::StorageBuffer);
        iface.decorate(10, Decoration::Binding, 1);
        iface.block_flags.insert(10, DecorationFlags::NON_WRITABLE);

        let as_buffer = classify(&iface, &resource(10, 11, 12, "data"), ResourceKind::StorageBuffer)
            .unwrap()
            .unwrap();
        assert!(as_buffer.readonly);
        assert_eq!(as_buffer.binding, Some(1));

        let as_regular = classify(&iface, &resource(10, 11, 12, "data"), ResourceKind::Regular)
            .unwrap()
            .unwrap();
        assert!(!as_regular.readonly);
    }

    #[test]
    pub fn vertex_inputs_carry_semantics() {
        let mut iface = FakeInterface::default();
        iface.decorate(10, Decoration::Location, 3);

        let record = classify(&iface, &resource(10, 11, 12, "uv1"), ResourceKind::VertexInput)
            .unwrap()
            .unwrap();
        assert_eq!(record.location, Some(3));
        assert_eq!(record.semantic, Some("TEXCOORD1"));
        assert_eq!(record.semantic_index, Some(1));

        let regular = classify(&iface, &resource(10, 11, 12, "uv1"), ResourceKind::Regular)
            .unwrap()
            .unwrap();
        assert_eq!(regular.semantic, None);
        assert_eq!(regular.semantic_index, None);
    }

    #[test]
    pub fn out_of_range_locations_have_no_semantic() {
        let mut iface = FakeInterface::default();
        iface.decorate(10, Decoration::Location, 17);
        iface.decorate(20, Decoration::Location, 18);
        iface.decorate(30, Decoration::Location, u32::MAX);

        let last = classify(&iface, &resource(10, 11, 12, "w"), ResourceKind::VertexInput)
            .unwrap()
            .unwrap();
        assert_eq!(last.semantic, Some("BLENDWEIGHT"));

        for id in [20, 30] {
            let record = classify(&iface, &resource(id, 11, 12, "x"), ResourceKind::VertexInput)
                .unwrap()
                .unwrap();
            assert!(record.location.is_some());
            assert_eq!(record.semantic, None);
            assert_eq!(record.semantic_index, None);
        }
    }

    #[test]
    pub fn counter_buffers_are_paired_or_skipped() {
        let mut iface = FakeInterface::default();
        iface.counters.insert(10, 20);

        let buffer = classify(&iface, &resource(10, 11, 12, "items"), ResourceKind::StorageBuffer)
            .unwrap()
            .unwrap();
        assert_eq!(buffer.hlsl_counter_buffer_id, Some(20));

        let counter =
            classify(&iface, &resource(20, 21, 22, "items_counter"), ResourceKind::StorageBuffer)
                .unwrap();
        assert!(counter.is_none());
    }
}
