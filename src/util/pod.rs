//! Scalar kinds and typed arrays - the numeric payload of accessors.

use super::{Error, Result};
use bytemuck::{Pod, Zeroable};
use half::f16;
use std::fmt;

/// Concrete numeric kind of a typed array element.
///
/// This is wider than the set of accessor component types: foreign data may be
/// loaded as any of these kinds, but only some of them map to a
/// [`ComponentType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum ScalarKind {
    /// Signed 8-bit integer
    Int8 = 0,
    /// Unsigned 8-bit integer
    Uint8 = 1,
    /// Signed 16-bit integer
    Int16 = 2,
    /// Unsigned 16-bit integer
    Uint16 = 3,
    /// Signed 32-bit integer
    Int32 = 4,
    /// Unsigned 32-bit integer
    Uint32 = 5,
    /// 16-bit floating point (IEEE 754 half precision)
    Float16 = 6,
    /// 32-bit floating point (IEEE 754 single precision)
    Float32 = 7,
    /// 64-bit floating point (IEEE 754 double precision)
    Float64 = 8,
}

impl ScalarKind {
    /// Returns the size in bytes of a single element of this kind.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 => 1,
            Self::Int16 | Self::Uint16 | Self::Float16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    /// Returns the name of this kind as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "int8_t",
            Self::Uint8 => "uint8_t",
            Self::Int16 => "int16_t",
            Self::Uint16 => "uint16_t",
            Self::Int32 => "int32_t",
            Self::Uint32 => "uint32_t",
            Self::Float16 => "float16_t",
            Self::Float32 => "float32_t",
            Self::Float64 => "float64_t",
        }
    }

    /// Returns true if this is a floating point kind.
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float16 | Self::Float32 | Self::Float64)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Accessor component type, as numbered by the GL enums glTF uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[repr(u32)]
pub enum ComponentType {
    Byte = 5120,
    UnsignedByte = 5121,
    Short = 5122,
    UnsignedShort = 5123,
    UnsignedInt = 5125,
    Float = 5126,
}

impl ComponentType {
    /// Map a scalar kind onto a component type.
    ///
    /// The supported set is closed: `Int32`, `Float16` and `Float64` have no
    /// component type and fail with [`Error::UnsupportedRepresentation`].
    pub fn from_scalar_kind(kind: ScalarKind) -> Result<Self> {
        match kind {
            ScalarKind::Float32 => Ok(Self::Float),
            ScalarKind::Uint32 => Ok(Self::UnsignedInt),
            ScalarKind::Uint16 => Ok(Self::UnsignedShort),
            ScalarKind::Uint8 => Ok(Self::UnsignedByte),
            ScalarKind::Int16 => Ok(Self::Short),
            ScalarKind::Int8 => Ok(Self::Byte),
            other => Err(Error::UnsupportedRepresentation(other)),
        }
    }

    /// Parse from the GL enum value.
    pub const fn from_gl_enum(v: u32) -> Option<Self> {
        match v {
            5120 => Some(Self::Byte),
            5121 => Some(Self::UnsignedByte),
            5122 => Some(Self::Short),
            5123 => Some(Self::UnsignedShort),
            5125 => Some(Self::UnsignedInt),
            5126 => Some(Self::Float),
            _ => None,
        }
    }

    /// The GL enum value.
    #[inline]
    pub const fn gl_enum(self) -> u32 {
        self as u32
    }

    /// The scalar kind storing this component type.
    pub const fn scalar_kind(self) -> ScalarKind {
        match self {
            Self::Byte => ScalarKind::Int8,
            Self::UnsignedByte => ScalarKind::Uint8,
            Self::Short => ScalarKind::Int16,
            Self::UnsignedShort => ScalarKind::Uint16,
            Self::UnsignedInt => ScalarKind::Uint32,
            Self::Float => ScalarKind::Float32,
        }
    }

    #[inline]
    pub const fn num_bytes(self) -> usize {
        self.scalar_kind().num_bytes()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Byte => "BYTE",
            Self::UnsignedByte => "UNSIGNED_BYTE",
            Self::Short => "SHORT",
            Self::UnsignedShort => "UNSIGNED_SHORT",
            Self::UnsignedInt => "UNSIGNED_INT",
            Self::Float => "FLOAT",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// === Element trait for typed arrays ===

/// Trait for scalar types that can back a [`TypedArray`].
pub trait ArrayPod: Pod + Zeroable + Copy + Default + PartialOrd {
    /// The corresponding ScalarKind value.
    const KIND: ScalarKind;

    /// Widen to f64 (lossless for every supported kind).
    fn to_f64(self) -> f64;

    /// Narrow from f64. Integers saturate, NaN becomes zero.
    fn from_f64(v: f64) -> Self;

    /// Wrap a vector in the matching array variant.
    fn into_array(values: Vec<Self>) -> TypedArray;

    /// Borrow the array contents if it holds this kind.
    fn slice_of(array: &TypedArray) -> Option<&[Self]>;
}

macro_rules! impl_array_pod {
    ($ty:ty, $variant:ident) => {
        impl ArrayPod for $ty {
            const KIND: ScalarKind = ScalarKind::$variant;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $ty
            }

            fn into_array(values: Vec<Self>) -> TypedArray {
                TypedArray::$variant(values)
            }

            fn slice_of(array: &TypedArray) -> Option<&[Self]> {
                match array {
                    TypedArray::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_array_pod!(i8, Int8);
impl_array_pod!(u8, Uint8);
impl_array_pod!(i16, Int16);
impl_array_pod!(u16, Uint16);
impl_array_pod!(i32, Int32);
impl_array_pod!(u32, Uint32);
impl_array_pod!(f32, Float32);
impl_array_pod!(f64, Float64);

impl ArrayPod for f16 {
    const KIND: ScalarKind = ScalarKind::Float16;

    #[inline]
    fn to_f64(self) -> f64 {
        f16::to_f64(self)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        f16::from_f64(v)
    }

    fn into_array(values: Vec<Self>) -> TypedArray {
        TypedArray::Float16(values)
    }

    fn slice_of(array: &TypedArray) -> Option<&[Self]> {
        match array {
            TypedArray::Float16(v) => Some(v),
            _ => None,
        }
    }
}

// === Typed array ===

/// Flat, homogeneously typed numeric array.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedArray {
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Float16(Vec<f16>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

macro_rules! each_variant {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            TypedArray::Int8($v) => $body,
            TypedArray::Uint8($v) => $body,
            TypedArray::Int16($v) => $body,
            TypedArray::Uint16($v) => $body,
            TypedArray::Int32($v) => $body,
            TypedArray::Uint32($v) => $body,
            TypedArray::Float16($v) => $body,
            TypedArray::Float32($v) => $body,
            TypedArray::Float64($v) => $body,
        }
    };
}

impl TypedArray {
    /// Zero-filled array of the given kind.
    pub fn zeros(kind: ScalarKind, len: usize) -> Self {
        match kind {
            ScalarKind::Int8 => Self::Int8(vec![0; len]),
            ScalarKind::Uint8 => Self::Uint8(vec![0; len]),
            ScalarKind::Int16 => Self::Int16(vec![0; len]),
            ScalarKind::Uint16 => Self::Uint16(vec![0; len]),
            ScalarKind::Int32 => Self::Int32(vec![0; len]),
            ScalarKind::Uint32 => Self::Uint32(vec![0; len]),
            ScalarKind::Float16 => Self::Float16(vec![f16::ZERO; len]),
            ScalarKind::Float32 => Self::Float32(vec![0.0; len]),
            ScalarKind::Float64 => Self::Float64(vec![0.0; len]),
        }
    }

    /// Reinterpret little-endian bytes as an array of `kind`.
    ///
    /// The input need not be aligned; elements are copied out.
    pub fn from_bytes(kind: ScalarKind, bytes: &[u8]) -> Result<Self> {
        if bytes.len() % kind.num_bytes() != 0 {
            return Err(Error::ByteLength {
                len: bytes.len(),
                kind,
            });
        }
        Ok(match kind {
            ScalarKind::Int8 => Self::Int8(bytemuck::pod_collect_to_vec(bytes)),
            ScalarKind::Uint8 => Self::Uint8(bytes.to_vec()),
            ScalarKind::Int16 => Self::Int16(bytemuck::pod_collect_to_vec(bytes)),
            ScalarKind::Uint16 => Self::Uint16(bytemuck::pod_collect_to_vec(bytes)),
            ScalarKind::Int32 => Self::Int32(bytemuck::pod_collect_to_vec(bytes)),
            ScalarKind::Uint32 => Self::Uint32(bytemuck::pod_collect_to_vec(bytes)),
            ScalarKind::Float16 => Self::Float16(bytemuck::pod_collect_to_vec(bytes)),
            ScalarKind::Float32 => Self::Float32(bytemuck::pod_collect_to_vec(bytes)),
            ScalarKind::Float64 => Self::Float64(bytemuck::pod_collect_to_vec(bytes)),
        })
    }

    /// Raw bytes of the array in native (little-endian on all glTF targets) order.
    pub fn as_bytes(&self) -> &[u8] {
        each_variant!(self, v => bytemuck::cast_slice(v.as_slice()))
    }

    /// Scalar kind of the elements.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Int8(_) => ScalarKind::Int8,
            Self::Uint8(_) => ScalarKind::Uint8,
            Self::Int16(_) => ScalarKind::Int16,
            Self::Uint16(_) => ScalarKind::Uint16,
            Self::Int32(_) => ScalarKind::Int32,
            Self::Uint32(_) => ScalarKind::Uint32,
            Self::Float16(_) => ScalarKind::Float16,
            Self::Float32(_) => ScalarKind::Float32,
            Self::Float64(_) => ScalarKind::Float64,
        }
    }

    /// Number of scalar elements.
    #[inline]
    pub fn len(&self) -> usize {
        each_variant!(self, v => v.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow as a slice of `T`, if the array holds that kind.
    pub fn as_slice<T: ArrayPod>(&self) -> Option<&[T]> {
        T::slice_of(self)
    }

    /// Read element `i` widened to f64. Panics if `i` is out of range.
    #[inline]
    pub fn get(&self, i: usize) -> f64 {
        each_variant!(self, v => v[i].to_f64())
    }

    /// Write element `i`, converting from f64. Panics if `i` is out of range.
    #[inline]
    pub fn set(&mut self, i: usize, value: f64) {
        each_variant!(self, v => v[i] = ArrayPod::from_f64(value))
    }

    /// Iterate over all elements widened to f64.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

impl<T: ArrayPod> From<Vec<T>> for TypedArray {
    fn from(values: Vec<T>) -> Self {
        T::into_array(values)
    }
}

impl<T: ArrayPod> From<&[T]> for TypedArray {
    fn from(values: &[T]) -> Self {
        T::into_array(values.to_vec())
    }
}
