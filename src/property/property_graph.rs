//! PropertyGraph - properties on top of the link graph.

use super::{
    Accessor, Buffer, ExtensionProperty, ExtensionRegistry, Material, Property, PropertyBody,
    PropertyType, Texture, SLOT_BASE_COLOR_TEXTURE, SLOT_BUFFER, SLOT_EXTENSIONS,
};
use crate::graph::{Graph, Link, LinkId, NodeId, SlotKind};
use crate::util::{ElementShape, Error, Result, TypedArray};
use serde_json::Value;
use tracing::debug;

/// Graph of properties with a distinguished root.
///
/// Every property is created through a factory method, which registers it in
/// one of the root's lists. The root is the only owner that survives
/// [`detach`](Self::detach); disposing a property removes it from the root
/// as well.
///
/// ```ignore
/// let mut doc = PropertyGraph::new();
/// let texture = doc.create_texture("albedo")?;
/// let material = doc.create_material("paint")?;
/// doc.set_base_color_texture(material, Some(texture))?;
///
/// // Detaching removes every reference except the root's.
/// doc.detach(texture)?;
/// assert_eq!(doc.base_color_texture(material), None);
/// assert_eq!(doc.list_properties(PropertyType::Texture), vec![texture]);
///
/// // Disposing removes the root's reference too.
/// doc.dispose_property(texture)?;
/// assert!(doc.list_properties(PropertyType::Texture).is_empty());
/// ```
pub struct PropertyGraph {
    graph: Graph,
    properties: Vec<Property>,
    root: NodeId,
    extensions: ExtensionRegistry,
}

impl Default for PropertyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyGraph {
    /// Create a graph with no registered extensions.
    pub fn new() -> Self {
        Self::with_extensions(ExtensionRegistry::new())
    }

    /// Create a graph that can instantiate the given extensions.
    pub fn with_extensions(extensions: ExtensionRegistry) -> Self {
        let mut graph = Graph::new();
        let root = graph.create_node(PropertyType::Root.slots());
        Self {
            graph,
            properties: vec![Property::new("", PropertyBody::Root)],
            root,
            extensions,
        }
    }

    /// The distinguished root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Underlying link graph, read-only.
    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    #[inline]
    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    // ========================================================================
    // Creation and lookup
    // ========================================================================

    fn insert(&mut self, name: impl Into<String>, body: PropertyBody) -> Result<NodeId> {
        let ty = body.property_type();
        let id = self.graph.create_node(ty.slots());
        debug_assert_eq!(id.slot(), self.properties.len());
        self.properties.push(Property::new(name, body));
        if let Some(list) = ty.root_list() {
            self.graph.add_ref(self.root, list, id)?;
        }
        Ok(id)
    }

    /// Create a buffer with no URI and register it under the root.
    pub fn create_buffer(&mut self, name: impl Into<String>) -> Result<NodeId> {
        self.insert(name, PropertyBody::Buffer(Buffer::default()))
    }

    /// Create an accessor. Fails if `array` is not a whole number of `shape` items.
    pub fn create_accessor(
        &mut self,
        name: impl Into<String>,
        array: impl Into<TypedArray>,
        shape: ElementShape,
    ) -> Result<NodeId> {
        let accessor = Accessor::new(array, shape)?;
        self.insert(name, PropertyBody::Accessor(accessor))
    }

    /// Create an empty texture and register it under the root.
    pub fn create_texture(&mut self, name: impl Into<String>) -> Result<NodeId> {
        self.insert(name, PropertyBody::Texture(Texture::default()))
    }

    /// Create a material with default factors and register it under the root.
    pub fn create_material(&mut self, name: impl Into<String>) -> Result<NodeId> {
        self.insert(name, PropertyBody::Material(Material::default()))
    }

    /// Create an extension property. The name must be registered.
    pub fn create_extension_property(&mut self, extension_name: &str) -> Result<NodeId> {
        if !self.extensions.contains(extension_name) {
            return Err(Error::UnknownExtension(extension_name.to_string()));
        }
        let ext = ExtensionProperty::new(extension_name);
        self.insert(extension_name, PropertyBody::Extension(ext))
    }

    /// Get a property. Disposed properties remain readable.
    #[inline]
    pub fn property(&self, id: NodeId) -> Option<&Property> {
        self.properties.get(id.slot())
    }

    /// The body variant must keep matching the slots registered at creation.
    #[inline]
    pub(crate) fn property_mut(&mut self, id: NodeId) -> Option<&mut Property> {
        self.properties.get_mut(id.slot())
    }

    /// Rename a property. Names need not be unique.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<()> {
        let property = self.property_mut(id).ok_or(Error::NodeNotFound(id))?;
        property.set_name(name);
        Ok(())
    }

    /// Free-form JSON extras of a property.
    pub fn extras_mut(&mut self, id: NodeId) -> Option<&mut Value> {
        self.property_mut(id).map(Property::extras_mut)
    }

    /// Type of a property, or `None` for an id this graph never allocated.
    pub fn property_type(&self, id: NodeId) -> Option<PropertyType> {
        self.property(id).map(Property::property_type)
    }

    /// Whether the property has been disposed.
    pub fn is_disposed(&self, id: NodeId) -> bool {
        self.graph.is_node_disposed(id)
    }

    fn expect_type(&self, id: NodeId, expected: PropertyType) -> Result<()> {
        let actual = self.property_type(id).ok_or(Error::NodeNotFound(id))?;
        if actual != expected {
            return Err(Error::WrongPropertyType {
                node: id,
                expected: expected.name(),
                actual: actual.name(),
            });
        }
        Ok(())
    }

    /// Live properties of a type, in creation order.
    pub fn list_properties(&self, ty: PropertyType) -> Vec<NodeId> {
        match ty.root_list() {
            Some(list) => self.graph.list_refs(self.root, list).unwrap_or_default(),
            None => vec![self.root],
        }
    }

    // ========================================================================
    // Relations
    // ========================================================================

    /// Properties holding a reference to `id`, usually including the root.
    pub fn list_parents(&self, id: NodeId) -> Vec<NodeId> {
        self.graph.list_parents(id)
    }

    /// Properties referenced by `id`.
    pub fn list_children(&self, id: NodeId) -> Vec<NodeId> {
        self.graph.list_children(id)
    }

    /// Remove every reference to `id` except the root's.
    ///
    /// The property stays in the graph and keeps its own references. Returns
    /// the number of links removed.
    pub fn detach(&mut self, id: NodeId) -> Result<usize> {
        self.property(id).ok_or(Error::NodeNotFound(id))?;
        Ok(self.graph.detach(id, self.root))
    }

    /// Dispose a property, removing all references to and from it.
    pub fn dispose_property(&mut self, id: NodeId) -> Result<bool> {
        if id == self.root {
            return Err(Error::unsupported("the root cannot be disposed"));
        }
        self.graph.dispose_node(id)
    }

    /// Register a callback for the disposal of a link.
    pub fn on_link_dispose<F>(&mut self, link: LinkId, listener: F) -> Result<()>
    where
        F: FnOnce(&Link) + Send + 'static,
    {
        self.graph.on_dispose(link, listener)
    }

    /// Dispose a single link. Returns false if it was already disposed.
    pub fn dispose_link(&mut self, link: LinkId) -> Result<bool> {
        self.graph.dispose_link(link)
    }

    /// Make a copy of a property that references the same resources (not
    /// copies) as the original.
    ///
    /// Scalar data, name and extras are copied; buffer, texture and extension
    /// relations are shared. Root and extension properties cannot be cloned.
    pub fn clone_property(&mut self, id: NodeId) -> Result<NodeId> {
        let source = self.property(id).ok_or(Error::NodeNotFound(id))?;
        if self.graph.is_node_disposed(id) {
            return Err(Error::NodeDisposed(id));
        }
        let ty = source.property_type();
        if matches!(ty, PropertyType::Root | PropertyType::Extension) {
            return Err(Error::unsupported(format!("clone of {ty}")));
        }
        let (name, extras, body) = (
            source.name().to_string(),
            source.extras().clone(),
            source.body().clone(),
        );

        let copy = self.insert(name, body)?;
        if let Some(p) = self.property_mut(copy) {
            p.set_extras(extras);
        }
        for def in ty.slots() {
            match def.kind {
                SlotKind::Ref => {
                    let target = self.graph.get_ref(id, def.name)?;
                    self.graph.set_ref(copy, def.name, target)?;
                }
                SlotKind::RefList => {
                    for target in self.graph.list_refs(id, def.name)? {
                        self.graph.add_ref(copy, def.name, target)?;
                    }
                }
                SlotKind::RefMap => {
                    let entries: Vec<(String, NodeId)> = self
                        .graph
                        .list_ref_map(id, def.name)?
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), v))
                        .collect();
                    for (key, target) in entries {
                        self.graph.set_ref_map(copy, def.name, &key, Some(target))?;
                    }
                }
            }
        }
        debug!(source = %id, %copy, kind = %ty, "cloned property");
        Ok(copy)
    }

    // ========================================================================
    // Extensions
    // ========================================================================

    /// Attach `extension` to `host` under `name`, replacing any previous
    /// attachment, or remove the attachment with `None`.
    ///
    /// The previous link is disposed before the new one exists, so readers
    /// never see two attachments under one name.
    pub fn set_extension(
        &mut self,
        host: NodeId,
        name: &str,
        extension: Option<NodeId>,
    ) -> Result<()> {
        if let Some(ext) = extension {
            self.expect_type(ext, PropertyType::Extension)?;
            let actual = self
                .extension_property(ext)
                .map(|e| e.extension_name().to_string())
                .unwrap_or_default();
            if actual != name {
                return Err(Error::ExtensionMismatch {
                    expected: name.to_string(),
                    actual,
                });
            }
        }
        self.graph.set_ref_map(host, SLOT_EXTENSIONS, name, extension)?;
        debug!(%host, extension = name, attached = extension.is_some(), "set extension");
        Ok(())
    }

    /// Extension attached to `host` under `name`, if any.
    pub fn get_extension(&self, host: NodeId, name: &str) -> Option<NodeId> {
        self.graph
            .get_ref_map(host, SLOT_EXTENSIONS, name)
            .ok()
            .flatten()
    }

    /// All extensions attached to `host`.
    pub fn list_extensions(&self, host: NodeId) -> Vec<NodeId> {
        self.graph
            .list_ref_map(host, SLOT_EXTENSIONS)
            .map(|entries| entries.into_iter().map(|(_, v)| v).collect())
            .unwrap_or_default()
    }

    // ========================================================================
    // Typed access
    // ========================================================================

    /// Buffer payload, or `None` if `id` is not a buffer.
    pub fn buffer(&self, id: NodeId) -> Option<&Buffer> {
        match self.property(id)?.body() {
            PropertyBody::Buffer(b) => Some(b),
            _ => None,
        }
    }

    pub fn buffer_mut(&mut self, id: NodeId) -> Option<&mut Buffer> {
        match self.property_mut(id)?.body_mut() {
            PropertyBody::Buffer(b) => Some(b),
            _ => None,
        }
    }

    /// Accessor payload, or `None` if `id` is not an accessor.
    ///
    /// The `_mut` variants below may replace the payload wholesale; the
    /// property type never changes.
    pub fn accessor(&self, id: NodeId) -> Option<&Accessor> {
        match self.property(id)?.body() {
            PropertyBody::Accessor(a) => Some(a),
            _ => None,
        }
    }

    pub fn accessor_mut(&mut self, id: NodeId) -> Option<&mut Accessor> {
        match self.property_mut(id)?.body_mut() {
            PropertyBody::Accessor(a) => Some(a),
            _ => None,
        }
    }

    /// Texture payload, or `None` if `id` is not a texture.
    pub fn texture(&self, id: NodeId) -> Option<&Texture> {
        match self.property(id)?.body() {
            PropertyBody::Texture(t) => Some(t),
            _ => None,
        }
    }

    pub fn texture_mut(&mut self, id: NodeId) -> Option<&mut Texture> {
        match self.property_mut(id)?.body_mut() {
            PropertyBody::Texture(t) => Some(t),
            _ => None,
        }
    }

    /// Material payload, or `None` if `id` is not a material.
    pub fn material(&self, id: NodeId) -> Option<&Material> {
        match self.property(id)?.body() {
            PropertyBody::Material(m) => Some(m),
            _ => None,
        }
    }

    pub fn material_mut(&mut self, id: NodeId) -> Option<&mut Material> {
        match self.property_mut(id)?.body_mut() {
            PropertyBody::Material(m) => Some(m),
            _ => None,
        }
    }

    /// Extension property payload, or `None` for any other type.
    pub fn extension_property(&self, id: NodeId) -> Option<&ExtensionProperty> {
        match self.property(id)?.body() {
            PropertyBody::Extension(e) => Some(e),
            _ => None,
        }
    }

    pub fn extension_property_mut(&mut self, id: NodeId) -> Option<&mut ExtensionProperty> {
        match self.property_mut(id)?.body_mut() {
            PropertyBody::Extension(e) => Some(e),
            _ => None,
        }
    }

    /// Point an accessor at its storage buffer, or clear it with `None`.
    pub fn set_accessor_buffer(&mut self, accessor: NodeId, buffer: Option<NodeId>) -> Result<()> {
        self.expect_type(accessor, PropertyType::Accessor)?;
        if let Some(b) = buffer {
            self.expect_type(b, PropertyType::Buffer)?;
        }
        self.graph.set_ref(accessor, SLOT_BUFFER, buffer)?;
        Ok(())
    }

    /// Storage buffer of an accessor.
    pub fn accessor_buffer(&self, accessor: NodeId) -> Option<NodeId> {
        self.graph.get_ref(accessor, SLOT_BUFFER).ok().flatten()
    }

    /// Point a material at its base color texture, or clear it with `None`.
    pub fn set_base_color_texture(
        &mut self,
        material: NodeId,
        texture: Option<NodeId>,
    ) -> Result<()> {
        self.expect_type(material, PropertyType::Material)?;
        if let Some(t) = texture {
            self.expect_type(t, PropertyType::Texture)?;
        }
        self.graph.set_ref(material, SLOT_BASE_COLOR_TEXTURE, texture)?;
        Ok(())
    }

    /// Base color texture of a material.
    pub fn base_color_texture(&self, material: NodeId) -> Option<NodeId> {
        self.graph
            .get_ref(material, SLOT_BASE_COLOR_TEXTURE)
            .ok()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{KHR_MATERIALS_UNLIT, KHR_MESH_QUANTIZATION};
    use serde_json::json;

    fn khronos() -> PropertyGraph {
        PropertyGraph::with_extensions(ExtensionRegistry::khronos())
    }

    #[test]
    fn test_factories_register_with_root() {
        let mut doc = PropertyGraph::new();
        let b = doc.create_buffer("bin").unwrap();
        let t = doc.create_texture("albedo").unwrap();
        assert_eq!(doc.list_properties(PropertyType::Buffer), vec![b]);
        assert_eq!(doc.list_properties(PropertyType::Texture), vec![t]);
        assert_eq!(doc.list_properties(PropertyType::Root), vec![doc.root()]);
        assert_eq!(doc.list_parents(t), vec![doc.root()]);
        assert_eq!(doc.property(t).unwrap().name(), "albedo");
    }

    #[test]
    fn test_create_accessor_checks_shape() {
        let mut doc = PropertyGraph::new();
        let err = doc
            .create_accessor("pos", vec![0f32; 5], ElementShape::Vec3)
            .unwrap_err();
        assert!(err.is_invariant_violation());
        assert!(doc.list_properties(PropertyType::Accessor).is_empty());
    }

    #[test]
    fn test_detach_and_dispose() {
        let mut doc = PropertyGraph::new();
        let texture = doc.create_texture("albedo").unwrap();
        let m1 = doc.create_material("a").unwrap();
        let m2 = doc.create_material("b").unwrap();
        doc.set_base_color_texture(m1, Some(texture)).unwrap();
        doc.set_base_color_texture(m2, Some(texture)).unwrap();
        assert_eq!(doc.list_parents(texture), vec![doc.root(), m1, m2]);

        assert_eq!(doc.detach(texture), Ok(2));
        assert_eq!(doc.base_color_texture(m1), None);
        assert_eq!(doc.list_parents(texture), vec![doc.root()]);
        assert_eq!(doc.list_properties(PropertyType::Texture), vec![texture]);

        assert_eq!(doc.dispose_property(texture), Ok(true));
        assert!(doc.is_disposed(texture));
        assert!(doc.list_properties(PropertyType::Texture).is_empty());
        assert_eq!(doc.property(texture).unwrap().name(), "albedo");
    }

    #[test]
    fn test_root_is_protected() {
        let mut doc = PropertyGraph::new();
        let root = doc.root();
        assert!(matches!(
            doc.dispose_property(root),
            Err(Error::UnsupportedOperation(_))
        ));
        assert!(matches!(
            doc.clone_property(root),
            Err(Error::UnsupportedOperation(_))
        ));
        assert_eq!(doc.detach(root), Ok(0));
    }

    #[test]
    fn test_extensions() {
        let mut doc = khronos();
        let material = doc.create_material("m").unwrap();
        let x = doc.create_extension_property(KHR_MATERIALS_UNLIT).unwrap();
        let y = doc.create_extension_property(KHR_MATERIALS_UNLIT).unwrap();

        assert_eq!(doc.get_extension(material, KHR_MATERIALS_UNLIT), None);
        doc.set_extension(material, KHR_MATERIALS_UNLIT, Some(x)).unwrap();
        doc.set_extension(material, KHR_MATERIALS_UNLIT, Some(y)).unwrap();
        assert_eq!(doc.get_extension(material, KHR_MATERIALS_UNLIT), Some(y));
        assert_eq!(doc.list_extensions(material), vec![y]);
        assert_eq!(doc.list_parents(x), vec![doc.root()]);

        doc.set_extension(material, KHR_MATERIALS_UNLIT, None).unwrap();
        assert!(doc.list_extensions(material).is_empty());
    }

    #[test]
    fn test_extension_name_must_match() {
        let mut doc = khronos();
        let material = doc.create_material("m").unwrap();
        let q = doc.create_extension_property(KHR_MESH_QUANTIZATION).unwrap();
        assert_eq!(
            doc.set_extension(material, KHR_MATERIALS_UNLIT, Some(q)),
            Err(Error::ExtensionMismatch {
                expected: KHR_MATERIALS_UNLIT.into(),
                actual: KHR_MESH_QUANTIZATION.into(),
            })
        );
        assert!(matches!(
            doc.set_extension(material, KHR_MATERIALS_UNLIT, Some(material)),
            Err(Error::WrongPropertyType { .. })
        ));
        assert_eq!(
            doc.create_extension_property("EXT_unknown"),
            Err(Error::UnknownExtension("EXT_unknown".into()))
        );
    }

    #[test]
    fn test_accessor_buffer_link() {
        let mut doc = PropertyGraph::new();
        let buffer = doc.create_buffer("bin").unwrap();
        let acc = doc
            .create_accessor("pos", vec![0f32; 6], ElementShape::Vec3)
            .unwrap();
        assert_eq!(doc.accessor_buffer(acc), None);

        doc.set_accessor_buffer(acc, Some(buffer)).unwrap();
        assert_eq!(doc.accessor_buffer(acc), Some(buffer));
        assert_eq!(doc.list_parents(buffer), vec![doc.root(), acc]);

        assert!(matches!(
            doc.set_accessor_buffer(acc, Some(acc)),
            Err(Error::WrongPropertyType { .. })
        ));

        doc.dispose_property(buffer).unwrap();
        assert_eq!(doc.accessor_buffer(acc), None);
        assert_eq!(doc.accessor(acc).unwrap().count(), 2);
    }

    #[test]
    fn test_clone_shares_references() {
        let mut doc = khronos();
        let texture = doc.create_texture("albedo").unwrap();
        let material = doc.create_material("paint").unwrap();
        let unlit = doc.create_extension_property(KHR_MATERIALS_UNLIT).unwrap();
        doc.set_base_color_texture(material, Some(texture)).unwrap();
        doc.set_extension(material, KHR_MATERIALS_UNLIT, Some(unlit)).unwrap();
        doc.property_mut(material)
            .unwrap()
            .set_extras(json!({ "tag": 1 }));
        doc.material_mut(material).unwrap().double_sided = true;

        let copy = doc.clone_property(material).unwrap();
        assert_ne!(copy, material);
        assert_eq!(doc.base_color_texture(copy), Some(texture));
        assert_eq!(doc.get_extension(copy, KHR_MATERIALS_UNLIT), Some(unlit));
        assert_eq!(doc.property(copy).unwrap().extras(), &json!({ "tag": 1 }));
        assert!(doc.material(copy).unwrap().double_sided);
        assert_eq!(doc.list_properties(PropertyType::Material), vec![material, copy]);
        assert_eq!(doc.list_properties(PropertyType::Texture), vec![texture]);

        // The copy is independent from here on.
        doc.set_base_color_texture(copy, None).unwrap();
        assert_eq!(doc.base_color_texture(material), Some(texture));
    }

    #[test]
    fn test_property_type_fixed_after_edits() {
        let mut doc = PropertyGraph::new();
        let texture = doc.create_texture("albedo").unwrap();
        let acc = doc
            .create_accessor("pos", vec![0f32; 3], ElementShape::Vec3)
            .unwrap();

        doc.set_name(acc, "normals").unwrap();
        doc.extras_mut(acc).unwrap()["tag"] = json!(2);
        *doc.accessor_mut(acc).unwrap() =
            Accessor::new(vec![1u16, 2], ElementShape::Vec2).unwrap();
        assert!(doc.material_mut(acc).is_none());

        assert_eq!(doc.property_type(acc), Some(PropertyType::Accessor));
        assert_eq!(doc.property(acc).unwrap().name(), "normals");
        assert_eq!(doc.property(acc).unwrap().extras()["tag"], 2);
        assert_eq!(doc.list_properties(PropertyType::Accessor), vec![acc]);
        assert!(doc.list_properties(PropertyType::Material).is_empty());
        assert!(matches!(
            doc.set_base_color_texture(acc, Some(texture)),
            Err(Error::WrongPropertyType { .. })
        ));
        assert_eq!(
            doc.set_name(NodeId::from_index(99), "x"),
            Err(Error::NodeNotFound(NodeId::from_index(99)))
        );
    }

    #[test]
    fn test_clone_accessor_copies_array() {
        let mut doc = PropertyGraph::new();
        let buffer = doc.create_buffer("bin").unwrap();
        let acc = doc
            .create_accessor("uv", vec![1f32, 2.0], ElementShape::Vec2)
            .unwrap();
        doc.set_accessor_buffer(acc, Some(buffer)).unwrap();

        let copy = doc.clone_property(acc).unwrap();
        doc.accessor_mut(copy)
            .unwrap()
            .set_xy(0, crate::util::DVec2::new(7.0, 8.0));
        assert_eq!(doc.accessor(acc).unwrap().get_xy(0).x, 1.0);
        assert_eq!(doc.accessor_buffer(copy), Some(buffer));
    }

    #[test]
    fn test_clone_extension_unsupported() {
        let mut doc = khronos();
        let unlit = doc.create_extension_property(KHR_MATERIALS_UNLIT).unwrap();
        assert!(matches!(
            doc.clone_property(unlit),
            Err(Error::UnsupportedOperation(_))
        ));
    }
}
