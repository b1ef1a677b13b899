//! Script-visible resource handles
//!
//! A handle packs kind, arena epoch and slot index into 53 bits so it
//! survives the trip through a JavaScript number unchanged:
//!
//! ```text
//! | kind: 5 | epoch: 16 | index: 32 |
//! ```

use crate::arena::Resource;
use std::fmt;
use std::marker::PhantomData;

/// Every reference type scripts can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Pixels,
    Image,
    Texture,
    Fbo,
    Font,
    Sound,
    ChipNote,
    ChipBundle,
    Mesh,
    Path,
    StrokeMesh,
    Camera,
    Tween,
}

impl ResourceKind {
    pub const COUNT: usize = 13;

    pub const ALL: [ResourceKind; Self::COUNT] = [
        ResourceKind::Pixels,
        ResourceKind::Image,
        ResourceKind::Texture,
        ResourceKind::Fbo,
        ResourceKind::Font,
        ResourceKind::Sound,
        ResourceKind::ChipNote,
        ResourceKind::ChipBundle,
        ResourceKind::Mesh,
        ResourceKind::Path,
        ResourceKind::StrokeMesh,
        ResourceKind::Camera,
        ResourceKind::Tween,
    ];

    /// Teardown order: objects that may reference others go first, raw
    /// storage (textures, pixel buffers) last.
    pub const DESTROY_ORDER: [ResourceKind; Self::COUNT] = [
        ResourceKind::Tween,
        ResourceKind::Camera,
        ResourceKind::Fbo,
        ResourceKind::StrokeMesh,
        ResourceKind::Path,
        ResourceKind::Mesh,
        ResourceKind::ChipBundle,
        ResourceKind::ChipNote,
        ResourceKind::Sound,
        ResourceKind::Font,
        ResourceKind::Image,
        ResourceKind::Texture,
        ResourceKind::Pixels,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Pixels => "Pixels",
            ResourceKind::Image => "Image",
            ResourceKind::Texture => "Texture",
            ResourceKind::Fbo => "Fbo",
            ResourceKind::Font => "Font",
            ResourceKind::Sound => "Sound",
            ResourceKind::ChipNote => "ChipNote",
            ResourceKind::ChipBundle => "ChipBundle",
            ResourceKind::Mesh => "Mesh",
            ResourceKind::Path => "Path",
            ResourceKind::StrokeMesh => "StrokeMesh",
            ResourceKind::Camera => "Camera",
            ResourceKind::Tween => "Tween",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: u64) -> Option<Self> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const INDEX_BITS: u32 = 32;
const EPOCH_BITS: u32 = 16;
const KIND_BITS: u32 = 5;
const MAX_BITS: u64 = 1 << (INDEX_BITS + EPOCH_BITS + KIND_BITS);

/// Untyped handle as stored on the script object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawHandle {
    pub kind: ResourceKind,
    pub epoch: u16,
    pub index: u32,
}

impl RawHandle {
    pub fn to_bits(self) -> u64 {
        (self.kind.index() as u64) << (INDEX_BITS + EPOCH_BITS)
            | u64::from(self.epoch) << INDEX_BITS
            | u64::from(self.index)
    }

    pub fn from_bits(bits: u64) -> Option<Self> {
        if bits >= MAX_BITS {
            return None;
        }
        Some(Self {
            kind: ResourceKind::from_index(bits >> (INDEX_BITS + EPOCH_BITS))?,
            epoch: (bits >> INDEX_BITS) as u16,
            index: bits as u32,
        })
    }

    /// Exact: every valid handle fits in an f64 mantissa.
    pub fn to_f64(self) -> f64 {
        self.to_bits() as f64
    }

    pub fn from_f64(value: f64) -> Option<Self> {
        if !(0.0..MAX_BITS as f64).contains(&value) || value.fract() != 0.0 {
            return None;
        }
        Self::from_bits(value as u64)
    }
}

/// Typed, non-owning reference to an arena slot.
pub struct Handle<T> {
    raw: RawHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Resource> Handle<T> {
    pub(crate) fn new(epoch: u16, index: u32) -> Self {
        Self {
            raw: RawHandle {
                kind: T::KIND,
                epoch,
                index,
            },
            _marker: PhantomData,
        }
    }

    /// `None` when `raw` names a different kind.
    pub fn from_raw(raw: RawHandle) -> Option<Self> {
        (raw.kind == T::KIND).then_some(Self {
            raw,
            _marker: PhantomData,
        })
    }
}

impl<T> Handle<T> {
    pub fn raw(&self) -> RawHandle {
        self.raw
    }

    pub fn epoch(&self) -> u16 {
        self.raw.epoch
    }

    pub fn index(&self) -> u32 {
        self.raw.index
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.raw.kind, self.raw.index, self.raw.epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_round_trip_at_the_extremes() {
        let raw = RawHandle {
            kind: ResourceKind::Tween,
            epoch: u16::MAX,
            index: u32::MAX,
        };
        assert_eq!(RawHandle::from_bits(raw.to_bits()), Some(raw));
        assert_eq!(RawHandle::from_f64(raw.to_f64()), Some(raw));
        assert!(raw.to_f64() < 2f64.powi(53));
    }

    #[test]
    fn rejects_non_handles() {
        assert_eq!(RawHandle::from_f64(-1.0), None);
        assert_eq!(RawHandle::from_f64(1.5), None);
        assert_eq!(RawHandle::from_f64(f64::NAN), None);
        assert_eq!(RawHandle::from_f64(2f64.powi(60)), None);
        // kind index 13 is unused
        assert_eq!(RawHandle::from_bits(13 << 48), None);
    }

    #[test]
    fn destroy_order_covers_every_kind_once() {
        let mut seen = ResourceKind::DESTROY_ORDER.to_vec();
        seen.sort();
        assert_eq!(seen, ResourceKind::ALL.to_vec());
    }
}
