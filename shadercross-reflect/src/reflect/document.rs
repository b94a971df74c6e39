use crate::error::ShaderReflectError;
use crate::reflect::{classify, Resource, ResourceKind, ShaderInterface, ShaderResources};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use shadercross_common::{ShaderLanguage, ShaderStage};

/// The reflection of a single shader resource.
///
/// Optional fields are omitted from the serialized record when absent.
/// `array` is the total declared extent of the resource, which is the sum of
/// every array dimension rather than the element count.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ResourceRecord {
    pub id: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<u32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub writeonly: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsized_array_stride: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hlsl_counter_buffer_id: Option<u32>,
}

/// The reflected resources of one stage, grouped by category.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct StageReflection {
    /// The file the stage's code was written to.
    pub file: String,
    /// Non-empty resource groups, in category order.
    pub groups: Vec<(&'static str, Vec<ResourceRecord>)>,
}

impl StageReflection {
    /// The records of a resource group, if the group is present.
    pub fn group(&self, name: &str) -> Option<&[ResourceRecord]> {
        self.groups
            .iter()
            .find(|(group, _)| *group == name)
            .map(|(_, records)| records.as_slice())
    }
}

impl Serialize for StageReflection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len() + 1))?;
        map.serialize_entry("file", &self.file)?;
        for (name, records) in &self.groups {
            map.serialize_entry(name, records)?;
        }
        map.end()
    }
}

/// The reflection document of a compiled stage.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReflectionDocument {
    pub language: ShaderLanguage,
    pub profile_version: u32,
    pub stage: ShaderStage,
    pub reflection: StageReflection,
}

impl Serialize for ReflectionDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("language", &self.language)?;
        map.serialize_entry("profile_version", &self.profile_version)?;
        map.serialize_entry(self.stage.short_name(), &self.reflection)?;
        map.end()
    }
}

impl ReflectionDocument {
    /// Serialize the document as compact JSON, or indented by two spaces when `pretty`.
    pub fn to_json(&self, pretty: bool) -> Result<String, ShaderReflectError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

fn reflect_group(
    iface: &impl ShaderInterface,
    groups: &mut Vec<(&'static str, Vec<ResourceRecord>)>,
    name: &'static str,
    resources: &[Resource],
    kind: ResourceKind,
) -> Result<(), ShaderReflectError> {
    if resources.is_empty() {
        return Ok(());
    }

    let mut records = Vec::with_capacity(resources.len());
    for resource in resources {
        if let Some(record) = classify(iface, resource, kind)? {
            records.push(record);
        }
    }
    groups.push((name, records));
    Ok(())
}

/// Build the reflection document for a compiled stage.
pub fn reflect_stage(
    iface: &impl ShaderInterface,
    resources: &ShaderResources,
    stage: ShaderStage,
    file: &str,
    language: ShaderLanguage,
    profile_version: u32,
) -> Result<ReflectionDocument, ShaderReflectError> {
    let input_kind = if stage == ShaderStage::Vertex {
        ResourceKind::VertexInput
    } else {
        ResourceKind::Regular
    };

    let mut groups = Vec::new();
    let categories: [(&'static str, &[Resource], ResourceKind); 11] = [
        ("subpass_inputs", &resources.subpass_inputs, ResourceKind::Regular),
        ("inputs", &resources.stage_inputs, input_kind),
        ("outputs", &resources.stage_outputs, ResourceKind::Regular),
        ("textures", &resources.sampled_images, ResourceKind::Regular),
        ("sep_images", &resources.separate_images, ResourceKind::Regular),
        ("sep_samplers", &resources.separate_samplers, ResourceKind::Regular),
        ("storage_images", &resources.storage_images, ResourceKind::Regular),
        ("storage_buffers", &resources.storage_buffers, ResourceKind::StorageBuffer),
        ("uniform_buffers", &resources.uniform_buffers, ResourceKind::Regular),
        ("push_cbs", &resources.push_constant_buffers, ResourceKind::Regular),
        ("counters", &resources.atomic_counters, ResourceKind::Regular),
    ];

    for (name, category, kind) in categories {
        reflect_group(iface, &mut groups, name, category, kind)?;
    }

    Ok(ReflectionDocument {
        language,
        profile_version,
        stage,
        reflection: StageReflection {
            file: file.to_string(),
            groups,
        },
    })
}

#[cfg(test)]
mod test {
    use crate::reflect::classify::test::{resource, FakeInterface};
    use crate::reflect::{reflect_stage, ShaderResources};
    use shadercross_common::{ShaderLanguage, ShaderStage};
    use spirv::{Decoration, StorageClass};

    fn vertex_resources() -> (FakeInterface, ShaderResources) {
        let mut iface = FakeInterface::default();
        iface.decorate(1, Decoration::Location, 0);
        iface.decorate(2, Decoration::Location, 2);
        iface.decorate(3, Decoration::Location, 0);
        iface.storage_classes.insert(4, StorageClass::Uniform);
        iface
            .decorate(4, Decoration::DescriptorSet, 0)
            .decorate(4, Decoration::Binding, 0)
            .decorate(6, Decoration::Block, 0);
        iface.sizes.insert(6, (64, 0));

        let resources = ShaderResources {
            stage_inputs: vec![resource(1, 10, 10, "a_pos"), resource(2, 11, 11, "a_uv")],
            stage_outputs: vec![resource(3, 11, 11, "v_uv")],
            uniform_buffers: vec![resource(4, 5, 6, "")],
            ..Default::default()
        };
        (iface, resources)
    }

    #[test]
    pub fn vertex_document_layout() {
        let (iface, resources) = vertex_resources();
        let doc = reflect_stage(
            &iface,
            &resources,
            ShaderStage::Vertex,
            "basic_vs.glsl",
            ShaderLanguage::Gles,
            200,
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&doc.to_json(false).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "language": "gles",
                "profile_version": 200,
                "vs": {
                    "file": "basic_vs.glsl",
                    "inputs": [
                        { "id": 1, "name": "a_pos", "location": 0, "semantic": "POSITION", "semantic_index": 0 },
                        { "id": 2, "name": "a_uv", "location": 2, "semantic": "TEXCOORD0", "semantic_index": 0 }
                    ],
                    "outputs": [
                        { "id": 3, "name": "v_uv", "location": 0 }
                    ],
                    "uniform_buffers": [
                        { "id": 4, "name": "_6", "set": 0, "binding": 0, "block_size": 64 }
                    ]
                }
            })
        );
    }

    #[test]
    pub fn empty_groups_are_omitted() {
        let (iface, resources) = vertex_resources();
        let doc = reflect_stage(
            &iface,
            &resources,
            ShaderStage::Vertex,
            "basic_vs.glsl",
            ShaderLanguage::Gles,
            200,
        )
        .unwrap();

        let names: Vec<_> = doc.reflection.groups.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["inputs", "outputs", "uniform_buffers"]);
        assert!(doc.reflection.group("textures").is_none());
        assert!(!doc.to_json(true).unwrap().contains("textures"));
    }

    #[test]
    pub fn fragment_inputs_have_no_semantics() {
        let (iface, resources) = vertex_resources();
        let doc = reflect_stage(
            &iface,
            &resources,
            ShaderStage::Fragment,
            "basic_fs.hlsl",
            ShaderLanguage::Hlsl,
            50,
        )
        .unwrap();

        let inputs = doc.reflection.group("inputs").unwrap();
        assert!(inputs.iter().all(|r| r.semantic.is_none()));

        let json: serde_json::Value = serde_json::from_str(&doc.to_json(false).unwrap()).unwrap();
        assert_eq!(json["language"], "hlsl");
        assert!(json["fs"].is_object());
        assert!(json.get("vs").is_none());
    }

    #[test]
    pub fn pretty_and_compact_decode_equal() {
        let (iface, resources) = vertex_resources();
        let doc = reflect_stage(
            &iface,
            &resources,
            ShaderStage::Vertex,
            "basic.sgs",
            ShaderLanguage::Metal,
            0,
        )
        .unwrap();

        let compact = doc.to_json(false).unwrap();
        let pretty = doc.to_json(true).unwrap();
        assert!(!compact.contains('\n'));
        assert!(pretty.contains("\n  \"language\""));

        let compact: serde_json::Value = serde_json::from_str(&compact).unwrap();
        let pretty: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(compact, pretty);
    }

    #[test]
    pub fn key_order_follows_record_layout() {
        let (iface, resources) = vertex_resources();
        let doc = reflect_stage(
            &iface,
            &resources,
            ShaderStage::Vertex,
            "basic_vs.glsl",
            ShaderLanguage::Gles,
            300,
        )
        .unwrap();

        let json = doc.to_json(false).unwrap();
        assert!(json.starts_with(r#"{"language":"gles","profile_version":300,"vs":{"file":"basic_vs.glsl","inputs":"#));
        assert!(json.contains(r#"{"id":1,"name":"a_pos","location":0,"semantic":"POSITION","semantic_index":0}"#));
    }
}
