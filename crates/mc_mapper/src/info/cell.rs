//! Static storage for per-type data.
//!
//! A `static` inside a generic function is shared by every instantiation, so
//! generic types key their entries by [`TypeId`] in a [`GenericTypeCell`].
//! Non-generic types use a plain [`OnceLock`] through [`NonGenericTypeInfoCell`].

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use mc_utils::TypeIdMap;

use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// NonGenericTypeInfoCell

/// Storage for the [`TypeInfo`] of a non-generic type.
///
/// ```
/// use mc_mapper::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind};
///
/// struct Person;
///
/// fn person_info() -> &'static TypeInfo {
///     static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///     CELL.get_or_init(|| TypeInfo::new::<Person>("Person", TypeKind::Class))
/// }
///
/// assert_eq!(person_info().name(), "Person");
/// ```
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.0.get_or_init(f)
    }
}

impl Default for NonGenericTypeInfoCell {
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// GenericTypeCell

/// Storage for per-instantiation data of a generic type.
///
/// Values are leaked on first insertion and live for the rest of the process.
pub struct GenericTypeCell<T: Send + Sync + 'static>(RwLock<TypeIdMap<&'static T>>);

/// Storage for the [`TypeInfo`] of a generic type.
///
/// ```
/// use mc_mapper::MapType;
/// use mc_mapper::info::{GenericTypeInfoCell, TypeInfo, TypeKind};
///
/// struct Page<T>(Vec<T>);
///
/// fn page_info<T: MapType>() -> &'static TypeInfo {
///     static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///     CELL.get_or_insert::<Page<T>>(|| {
///         TypeInfo::generic::<Page<T>>("Page", TypeKind::Class, &[T::type_info()])
///     })
/// }
///
/// assert_eq!(page_info::<String>().name(), "Page<String>");
/// assert_eq!(page_info::<bool>().name(), "Page<bool>");
/// ```
pub type GenericTypeInfoCell = GenericTypeCell<TypeInfo>;

impl<T: Send + Sync + 'static> GenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the entry of `G`, creating it with `f` on first use.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &'static T {
        // Separate to reduce code compilation times
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &'static T {
        match self.get_by_type_id(type_id) {
            Some(value) => value,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static T> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: T) -> &'static T {
        // Another thread may have won the race, its entry is kept.
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(value)))
    }
}

impl<T: Send + Sync + 'static> Default for GenericTypeCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
