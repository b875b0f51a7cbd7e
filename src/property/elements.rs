//! Concrete property payloads: buffers, textures and materials.

use crate::util::Vec4;

/// Storage resource that accessors point at.
///
/// The numeric payload lives in the accessors themselves; a buffer only
/// records where it will be written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Buffer {
    pub uri: String,
}

/// Encoded image data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Texture {
    pub image: Vec<u8>,
    pub mime_type: String,
}

impl Texture {
    /// Size of the encoded image in bytes.
    pub fn byte_length(&self) -> usize {
        self.image.len()
    }
}

/// Surface description. The base color texture is a graph relation held by
/// the material's `baseColorTexture` slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub base_color_factor: Vec4,
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color_factor: Vec4::ONE,
            double_sided: false,
        }
    }
}
