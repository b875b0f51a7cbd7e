//! Extension registry and extension properties.
//!
//! Extensions are identified by plain strings. The registry is filled once at
//! setup; properties only ever store the name and a link.

use serde_json::Value;
use smallvec::SmallVec;

/// Unlit shading model for materials.
pub const KHR_MATERIALS_UNLIT: &str = "KHR_materials_unlit";

/// Quantized (integer) vertex attributes.
pub const KHR_MESH_QUANTIZATION: &str = "KHR_mesh_quantization";

/// Khronos extensions known out of the box.
pub const KHRONOS_EXTENSIONS: [&str; 2] = [KHR_MATERIALS_UNLIT, KHR_MESH_QUANTIZATION];

/// Set of extension names that may be instantiated in a graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtensionRegistry {
    names: SmallVec<[String; 4]>,
}

impl ExtensionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding [`KHRONOS_EXTENSIONS`].
    pub fn khronos() -> Self {
        KHRONOS_EXTENSIONS.into_iter().fold(Self::new(), Self::with)
    }

    /// Register a name. Returns false if it was already present.
    pub fn register(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.register(name);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Auxiliary property attached to a host under its extension name.
///
/// The payload is opaque to the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtensionProperty {
    extension_name: String,
    pub payload: Value,
}

impl ExtensionProperty {
    pub(crate) fn new(extension_name: impl Into<String>) -> Self {
        Self {
            extension_name: extension_name.into(),
            payload: Value::Object(Default::default()),
        }
    }

    #[inline]
    pub fn extension_name(&self) -> &str {
        &self.extension_name
    }
}
