//! Resource arena
//!
//! Sole owner of every native object a script creates. Objects are only
//! ever appended; the whole arena is destroyed at once by [`Arena::reset`],
//! which also bumps the epoch so handles minted before the reset no longer
//! resolve.

use crate::error::MarshalError;
use crate::handle::{Handle, ResourceKind};
use sketch_audio::{ChipBundle, ChipNote, Sound};
use sketch_core::tween::Tween;
use sketch_render::{Fbo, Font, Image, Mesh, OrbitCamera, Path, Pixels, StrokeMesh, Texture};

/// Native types the arena can own.
pub trait Resource: Sized + 'static {
    const KIND: ResourceKind;

    fn list(arena: &Arena) -> &Vec<Self>;
    fn list_mut(arena: &mut Arena) -> &mut Vec<Self>;
}

/// Construct/destruct counts per kind, kept across resets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaStats {
    created: [u64; ResourceKind::COUNT],
    destroyed: [u64; ResourceKind::COUNT],
}

impl ArenaStats {
    pub fn created(&self, kind: ResourceKind) -> u64 {
        self.created[kind.index()]
    }

    pub fn destroyed(&self, kind: ResourceKind) -> u64 {
        self.destroyed[kind.index()]
    }

    pub fn live(&self, kind: ResourceKind) -> u64 {
        self.created(kind) - self.destroyed(kind)
    }

    pub fn total_created(&self) -> u64 {
        self.created.iter().sum()
    }

    pub fn total_destroyed(&self) -> u64 {
        self.destroyed.iter().sum()
    }

    /// Everything ever created has been destroyed.
    pub fn is_balanced(&self) -> bool {
        self.created == self.destroyed
    }
}

macro_rules! arena {
    ($($field:ident: $ty:ty => $kind:ident,)*) => {
        pub struct Arena {
            epoch: u16,
            stats: ArenaStats,
            $($field: Vec<$ty>,)*
        }

        impl Arena {
            pub fn new() -> Self {
                Self {
                    epoch: 1,
                    stats: ArenaStats::default(),
                    $($field: Vec::new(),)*
                }
            }

            /// Live objects of `kind`.
            pub fn count(&self, kind: ResourceKind) -> usize {
                match kind {
                    $(ResourceKind::$kind => self.$field.len(),)*
                }
            }

            fn destroy_kind(&mut self, kind: ResourceKind) -> usize {
                match kind {
                    $(ResourceKind::$kind => {
                        let count = self.$field.len();
                        self.$field.clear();
                        count
                    })*
                }
            }
        }

        $(
            impl Resource for $ty {
                const KIND: ResourceKind = ResourceKind::$kind;

                fn list(arena: &Arena) -> &Vec<Self> {
                    &arena.$field
                }

                fn list_mut(arena: &mut Arena) -> &mut Vec<Self> {
                    &mut arena.$field
                }
            }
        )*
    };
}

arena! {
    pixels: Pixels => Pixels,
    images: Image => Image,
    textures: Texture => Texture,
    fbos: Fbo => Fbo,
    fonts: Font => Font,
    sounds: Sound => Sound,
    chip_notes: ChipNote => ChipNote,
    chip_bundles: ChipBundle => ChipBundle,
    meshes: Mesh => Mesh,
    paths: Path => Path,
    stroke_meshes: StrokeMesh => StrokeMesh,
    cameras: OrbitCamera => Camera,
    tweens: Tween => Tween,
}

impl Arena {
    pub fn epoch(&self) -> u16 {
        self.epoch
    }

    pub fn stats(&self) -> ArenaStats {
        self.stats
    }

    /// Take ownership of `value` and hand back a handle to it.
    pub fn insert<T: Resource>(&mut self, value: T) -> Handle<T> {
        let list = T::list_mut(self);
        let index = u32::try_from(list.len()).unwrap_or(u32::MAX);
        list.push(value);
        self.stats.created[T::KIND.index()] += 1;
        Handle::new(self.epoch, index)
    }

    pub fn get<T: Resource>(&self, handle: Handle<T>) -> Result<&T, MarshalError> {
        self.check_epoch(handle)?;
        T::list(self)
            .get(handle.index() as usize)
            .ok_or(MarshalError::InvalidHandle(T::KIND.name()))
    }

    pub fn get_mut<T: Resource>(&mut self, handle: Handle<T>) -> Result<&mut T, MarshalError> {
        self.check_epoch(handle)?;
        T::list_mut(self)
            .get_mut(handle.index() as usize)
            .ok_or(MarshalError::InvalidHandle(T::KIND.name()))
    }

    fn check_epoch<T: Resource>(&self, handle: Handle<T>) -> Result<(), MarshalError> {
        if handle.epoch() == self.epoch {
            Ok(())
        } else {
            Err(MarshalError::StaleHandle(T::KIND.name()))
        }
    }

    pub fn iter<T: Resource>(&self) -> impl Iterator<Item = &T> {
        T::list(self).iter()
    }

    pub fn iter_mut<T: Resource>(&mut self) -> impl Iterator<Item = &mut T> {
        T::list_mut(self).iter_mut()
    }

    pub fn len<T: Resource>(&self) -> usize {
        T::list(self).len()
    }

    /// Live objects of every kind.
    pub fn total(&self) -> usize {
        ResourceKind::ALL.iter().map(|kind| self.count(*kind)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Destroy every object in [`ResourceKind::DESTROY_ORDER`] and start a
    /// new epoch. Returns how many objects were destroyed.
    pub fn reset(&mut self) -> usize {
        let mut destroyed = 0;
        for kind in ResourceKind::DESTROY_ORDER {
            let count = self.destroy_kind(kind);
            self.stats.destroyed[kind.index()] += count as u64;
            destroyed += count;
        }
        // epoch 0 is never issued
        self.epoch = self.epoch.checked_add(1).unwrap_or(1);
        destroyed
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        let leaked = self.reset();
        if leaked > 0 {
            tracing::debug!(leaked, "arena dropped with live objects");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_resolve() {
        let mut arena = Arena::new();
        let a = arena.insert(Pixels::new());
        let b = arena.insert(Pixels::new());
        assert_ne!(a, b);
        arena.get_mut(b).unwrap().allocate(2, 2);
        assert!(arena.get(b).unwrap().is_allocated());
        assert!(!arena.get(a).unwrap().is_allocated());
        assert_eq!(arena.len::<Pixels>(), 2);
        assert_eq!(arena.count(ResourceKind::Pixels), 2);
    }

    #[test]
    fn reset_invalidates_old_handles() {
        let mut arena = Arena::new();
        let image = arena.insert(Image::new());
        arena.reset();
        assert_eq!(arena.get(image).unwrap_err(), MarshalError::StaleHandle("Image"));
        let fresh = arena.insert(Image::new());
        assert_eq!(fresh.index(), image.index());
        assert_ne!(fresh.epoch(), image.epoch());
        assert!(arena.get(fresh).is_ok());
    }

    #[test]
    fn forged_index_is_rejected() {
        let mut arena = Arena::new();
        arena.insert(Mesh::new());
        let forged: Handle<Mesh> = Handle::new(arena.epoch(), 7);
        assert_eq!(arena.get(forged).unwrap_err(), MarshalError::InvalidHandle("Mesh"));
    }

    #[test]
    fn stats_balance_after_reset() {
        let mut arena = Arena::new();
        for _ in 0..5 {
            arena.insert(Tween::new());
        }
        arena.insert(Sound::new());
        arena.insert(OrbitCamera::new());
        assert_eq!(arena.total(), 7);
        assert_eq!(arena.stats().live(ResourceKind::Tween), 5);
        assert!(!arena.stats().is_balanced());

        assert_eq!(arena.reset(), 7);
        assert!(arena.is_empty());
        assert!(arena.stats().is_balanced());
        assert_eq!(arena.stats().destroyed(ResourceKind::Camera), 1);
        assert_eq!(arena.stats().total_created(), 7);
    }

    #[test]
    fn epoch_skips_zero_on_wrap() {
        let mut arena = Arena::new();
        arena.epoch = u16::MAX;
        arena.reset();
        assert_eq!(arena.epoch(), 1);
    }
}
