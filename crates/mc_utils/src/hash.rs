//! Hash containers based on *hashbrown* and *foldhash*.
//!
//! Every container here defaults to [`FixedHashState`], whose seed never
//! changes. The mapper relies on this: `Mapper::hash` must return the same
//! value for equal inputs in every process.

use core::hash::{BuildHasher, Hash, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x6D61_7063_7261_6674);

/// The hasher produced by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// Hash state with a fixed seed, results depend only on the input.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use mc_utils::hash::FixedHashState;
///
/// assert_eq!(FixedHashState.hash_one("judy"), FixedHashState.hash_one("judy"));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHashState

/// Passes a single `u64` straight through.
///
/// Only meant for keys that are already well distributed,
/// such as [`TypeId`](core::any::TypeId).
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// Builds [`NoOpHasher`]s.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher { hash: 0 }
    }
}

// -----------------------------------------------------------------------------
// Containers

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`] by default.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

pub use hashbrown::HashTable;

/// Hash a single value with [`FixedHashState`].
#[inline]
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    FixedHashState.hash_one(value)
}

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;

#[cfg(test)]
mod tests {
    use super::{NoOpHashState, hash_one};
    use core::hash::BuildHasher;

    #[test]
    fn fixed_hash_is_stable() {
        assert_eq!(hash_one(&42_u64), hash_one(&42_u64));
        assert_ne!(hash_one("cat"), hash_one("dog"));
    }

    #[test]
    fn noop_passes_u64_through() {
        assert_eq!(NoOpHashState.hash_one(7_u64), 7);
    }
}
