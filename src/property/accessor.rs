//! Accessor - typed, strided view over a flat numeric array.

use crate::util::{ComponentType, DVec2, DVec3, DVec4, ElementShape, Error, Result, TypedArray};

/// Typed numeric view: a flat array interpreted as `count` items of
/// `shape.item_size()` components each.
///
/// The array length is always a whole number of items. The link to the
/// storage [`Buffer`](super::Buffer) is kept by the
/// [`PropertyGraph`](super::PropertyGraph), not here.
///
/// Element reads and writes (`get_xyz`, `set_xyz`, ...) go through `f64`, which
/// holds every supported component exactly. They do not check the
/// window against the item size or the index against `count`. A window wider
/// than the item reads into the following item; an index past the end of the
/// array panics.
#[derive(Clone, Debug, PartialEq)]
pub struct Accessor {
    array: TypedArray,
    shape: ElementShape,
}

impl Default for Accessor {
    fn default() -> Self {
        Self {
            array: TypedArray::Float32(Vec::new()),
            shape: ElementShape::Scalar,
        }
    }
}

fn check_shape(len: usize, shape: ElementShape) -> Result<()> {
    let item_size = shape.item_size();
    if len % item_size != 0 {
        return Err(Error::ShapeMismatch {
            len,
            shape,
            item_size,
        });
    }
    Ok(())
}

impl Accessor {
    /// Create an accessor, rejecting arrays that are not a whole number of items.
    pub fn new(array: impl Into<TypedArray>, shape: ElementShape) -> Result<Self> {
        let array = array.into();
        check_shape(array.len(), shape)?;
        Ok(Self { array, shape })
    }

    /// Create a zero-filled accessor of `count` items.
    pub fn zeros(kind: crate::util::ScalarKind, shape: ElementShape, count: usize) -> Self {
        Self {
            array: TypedArray::zeros(kind, count * shape.item_size()),
            shape,
        }
    }

    #[inline]
    pub fn array(&self) -> &TypedArray {
        &self.array
    }

    /// Replace the whole array. The current shape must still divide it.
    pub fn set_array(&mut self, array: impl Into<TypedArray>) -> Result<()> {
        let array = array.into();
        check_shape(array.len(), self.shape)?;
        self.array = array;
        Ok(())
    }

    #[inline]
    pub fn shape(&self) -> ElementShape {
        self.shape
    }

    /// Change the element shape. The current array must divide into it.
    pub fn set_shape(&mut self, shape: ElementShape) -> Result<()> {
        check_shape(self.array.len(), shape)?;
        self.shape = shape;
        Ok(())
    }

    /// Number of components in one item.
    #[inline]
    pub fn item_size(&self) -> usize {
        self.shape.item_size()
    }

    /// Component type of the backing array.
    ///
    /// Fails with [`Error::UnsupportedRepresentation`] for arrays holding a
    /// kind glTF has no component type for (i32, f16, f64).
    pub fn component_type(&self) -> Result<ComponentType> {
        ComponentType::from_scalar_kind(self.array.kind())
    }

    /// Number of items.
    #[inline]
    pub fn count(&self) -> usize {
        self.array.len() / self.item_size()
    }

    /// Per-component minimum over all items.
    ///
    /// An empty accessor yields `+inf` in every component.
    pub fn min(&self) -> Vec<f64> {
        self.reduce(f64::INFINITY, f64::min)
    }

    /// Per-component maximum over all items.
    ///
    /// An empty accessor yields `-inf` in every component.
    pub fn max(&self) -> Vec<f64> {
        self.reduce(f64::NEG_INFINITY, f64::max)
    }

    fn reduce(&self, init: f64, op: fn(f64, f64) -> f64) -> Vec<f64> {
        let item_size = self.item_size();
        let mut out = vec![init; item_size];
        for i in (0..self.count() * item_size).step_by(item_size) {
            for (j, acc) in out.iter_mut().enumerate() {
                *acc = op(*acc, self.array.get(i + j));
            }
        }
        out
    }

    #[inline]
    fn component(&self, index: usize, offset: usize) -> f64 {
        self.array.get(index * self.item_size() + offset)
    }

    #[inline]
    fn set_component(&mut self, index: usize, offset: usize, value: f64) {
        let at = index * self.item_size() + offset;
        self.array.set(at, value);
    }

    pub fn get_x(&self, index: usize) -> f64 {
        self.component(index, 0)
    }

    pub fn get_xy(&self, index: usize) -> DVec2 {
        DVec2::new(self.component(index, 0), self.component(index, 1))
    }

    pub fn get_xyz(&self, index: usize) -> DVec3 {
        DVec3::new(
            self.component(index, 0),
            self.component(index, 1),
            self.component(index, 2),
        )
    }

    pub fn get_xyzw(&self, index: usize) -> DVec4 {
        DVec4::new(
            self.component(index, 0),
            self.component(index, 1),
            self.component(index, 2),
            self.component(index, 3),
        )
    }

    /// Write one component. Integer arrays truncate toward zero and saturate.
    pub fn set_x(&mut self, index: usize, x: f64) -> &mut Self {
        self.set_component(index, 0, x);
        self
    }

    pub fn set_xy(&mut self, index: usize, v: DVec2) -> &mut Self {
        self.set_component(index, 0, v.x);
        self.set_component(index, 1, v.y);
        self
    }

    pub fn set_xyz(&mut self, index: usize, v: DVec3) -> &mut Self {
        self.set_component(index, 0, v.x);
        self.set_component(index, 1, v.y);
        self.set_component(index, 2, v.z);
        self
    }

    pub fn set_xyzw(&mut self, index: usize, v: DVec4) -> &mut Self {
        self.set_component(index, 0, v.x);
        self.set_component(index, 1, v.y);
        self.set_component(index, 2, v.z);
        self.set_component(index, 3, v.w);
        self
    }
}
