//! Property - named graph node with extras and extensions.

use super::{Accessor, Buffer, ExtensionProperty, Material, Texture};
use crate::graph::SlotDef;
use serde_json::Value;
use std::fmt;

/// Slot holding a property's extension attachments, keyed by extension name.
pub const SLOT_EXTENSIONS: &str = "extensions";
/// Accessor → Buffer.
pub const SLOT_BUFFER: &str = "buffer";
/// Material → Texture.
pub const SLOT_BASE_COLOR_TEXTURE: &str = "baseColorTexture";

const ROOT_SLOTS: &[SlotDef] = &[
    SlotDef::map(SLOT_EXTENSIONS),
    SlotDef::list("buffers"),
    SlotDef::list("accessors"),
    SlotDef::list("textures"),
    SlotDef::list("materials"),
    SlotDef::list("extensionProperties"),
];
const PLAIN_SLOTS: &[SlotDef] = &[SlotDef::map(SLOT_EXTENSIONS)];
const ACCESSOR_SLOTS: &[SlotDef] = &[SlotDef::map(SLOT_EXTENSIONS), SlotDef::one(SLOT_BUFFER)];
const MATERIAL_SLOTS: &[SlotDef] = &[
    SlotDef::map(SLOT_EXTENSIONS),
    SlotDef::one(SLOT_BASE_COLOR_TEXTURE),
];

/// Kind of a property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Root,
    Buffer,
    Accessor,
    Texture,
    Material,
    Extension,
}

impl PropertyType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Buffer => "Buffer",
            Self::Accessor => "Accessor",
            Self::Texture => "Texture",
            Self::Material => "Material",
            Self::Extension => "ExtensionProperty",
        }
    }

    /// Relation slots a node of this type registers at creation.
    pub(crate) fn slots(self) -> &'static [SlotDef] {
        match self {
            Self::Root => ROOT_SLOTS,
            Self::Accessor => ACCESSOR_SLOTS,
            Self::Material => MATERIAL_SLOTS,
            Self::Buffer | Self::Texture | Self::Extension => PLAIN_SLOTS,
        }
    }

    /// Root list slot through which properties of this type are enumerated.
    pub(crate) fn root_list(self) -> Option<&'static str> {
        match self {
            Self::Root => None,
            Self::Buffer => Some("buffers"),
            Self::Accessor => Some("accessors"),
            Self::Texture => Some("textures"),
            Self::Material => Some("materials"),
            Self::Extension => Some("extensionProperties"),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Type-specific data of a property.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyBody {
    Root,
    Buffer(Buffer),
    Accessor(Accessor),
    Texture(Texture),
    Material(Material),
    Extension(ExtensionProperty),
}

impl PropertyBody {
    pub fn property_type(&self) -> PropertyType {
        match self {
            Self::Root => PropertyType::Root,
            Self::Buffer(_) => PropertyType::Buffer,
            Self::Accessor(_) => PropertyType::Accessor,
            Self::Texture(_) => PropertyType::Texture,
            Self::Material(_) => PropertyType::Material,
            Self::Extension(_) => PropertyType::Extension,
        }
    }
}

/// Data carried by every node of a [`PropertyGraph`](super::PropertyGraph).
///
/// Names are not required to be unique. Extras are free-form JSON that the
/// graph never looks into; relations to other properties live in the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    name: String,
    extras: Value,
    body: PropertyBody,
}

impl Property {
    pub(crate) fn new(name: impl Into<String>, body: PropertyBody) -> Self {
        Self {
            name: name.into(),
            extras: Value::Object(Default::default()),
            body,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn extras(&self) -> &Value {
        &self.extras
    }

    pub fn extras_mut(&mut self) -> &mut Value {
        &mut self.extras
    }

    pub fn set_extras(&mut self, extras: Value) -> &mut Self {
        self.extras = extras;
        self
    }

    #[inline]
    pub fn body(&self) -> &PropertyBody {
        &self.body
    }

    /// The variant is fixed at creation; only typed getters hand this out.
    #[inline]
    pub(crate) fn body_mut(&mut self) -> &mut PropertyBody {
        &mut self.body
    }

    #[inline]
    pub fn property_type(&self) -> PropertyType {
        self.body.property_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_and_extras() {
        let mut p = Property::new("tex", PropertyBody::Texture(Texture::default()));
        assert_eq!(p.name(), "tex");
        assert_eq!(p.extras(), &json!({}));
        p.set_name("albedo").set_extras(json!({ "author": "me" }));
        assert_eq!(p.name(), "albedo");
        assert_eq!(p.extras()["author"], "me");
        assert_eq!(p.property_type(), PropertyType::Texture);
    }

    #[test]
    fn test_every_type_has_extension_slot() {
        for ty in [
            PropertyType::Root,
            PropertyType::Buffer,
            PropertyType::Accessor,
            PropertyType::Texture,
            PropertyType::Material,
            PropertyType::Extension,
        ] {
            assert!(ty.slots().iter().any(|s| s.name == SLOT_EXTENSIONS));
        }
    }
}
