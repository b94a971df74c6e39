/// The number of entries in the vertex semantic table.
pub const VERTEX_SEMANTIC_COUNT: usize = 18;

/// The number of `SV_Target` render target semantics exposed to shader source.
pub const RENDER_TARGET_SEMANTIC_COUNT: u32 = 8;

/// A vertex attribute semantic.
///
/// The semantic for a vertex input is chosen by its location: the location is
/// the index into [`VERTEX_SEMANTICS`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexSemantic {
    /// The HLSL-style semantic name, e.g. `TEXCOORD3`.
    pub name: &'static str,
    /// The semantic index, e.g. `3` for `TEXCOORD3`.
    pub index: u32,
}

const fn semantic(name: &'static str, index: u32) -> VertexSemantic {
    VertexSemantic { name, index }
}

/// The fixed vertex semantic table, indexed by attribute location.
pub const VERTEX_SEMANTICS: [VertexSemantic; VERTEX_SEMANTIC_COUNT] = [
    semantic("POSITION", 0),
    semantic("NORMAL", 0),
    semantic("TEXCOORD0", 0),
    semantic("TEXCOORD1", 1),
    semantic("TEXCOORD2", 2),
    semantic("TEXCOORD3", 3),
    semantic("TEXCOORD4", 4),
    semantic("TEXCOORD5", 5),
    semantic("TEXCOORD6", 6),
    semantic("TEXCOORD7", 7),
    semantic("COLOR0", 0),
    semantic("COLOR1", 1),
    semantic("COLOR2", 2),
    semantic("COLOR3", 3),
    semantic("TANGENT", 0),
    semantic("BINORMAL", 0),
    semantic("BLENDINDICES", 0),
    semantic("BLENDWEIGHT", 0),
];

impl VertexSemantic {
    /// Look up the semantic bound to the given attribute location.
    ///
    /// Locations outside the table have no semantic.
    pub fn for_location(location: u32) -> Option<VertexSemantic> {
        VERTEX_SEMANTICS.get(location as usize).copied()
    }
}
