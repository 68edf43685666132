use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};

use mc_utils::hash::HashMap;

use crate::{CopyLens, ListLens, MapLens};

/// A type with an object lens.
///
/// Implemented once per mapped type, next to its converter. The lens type
/// wraps a [`CopyLens`] over `Self` and offers one setter per field, plus
/// nested lenses for fields that are themselves `Copyable`.
///
/// # Examples
///
/// ```
/// use mc_copy::{CopyLens, Copyable, Field};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Pet {
///     name: String,
///     age: u32,
/// }
///
/// struct PetLens<'a, R>(CopyLens<'a, Pet, R>);
///
/// impl<'a, R: 'a> PetLens<'a, R> {
///     fn update(self, name: Field<String>, age: Field<u32>) -> R {
///         self.0.apply(|pet| Pet {
///             name: name.resolve(&pet.name),
///             age: age.resolve(&pet.age),
///         })
///     }
/// }
///
/// impl Copyable for Pet {
///     type Lens<'a, R: 'a> = PetLens<'a, R>;
///
///     fn lens_from<'a, R: 'a>(lens: CopyLens<'a, Self, R>) -> PetLens<'a, R> {
///         PetLens(lens)
///     }
/// }
///
/// let pet = Pet { name: "Judy".into(), age: 7 };
/// let older = pet.copy_with().update(Field::Keep, Field::Set(8));
/// assert_eq!(older, Pet { name: "Judy".into(), age: 8 });
/// ```
///
/// # Family handles
///
/// A handle such as `Box<dyn Shape>` is `Copyable` through a lens over the
/// handle. Its setters cover the fields every subtype shares and call a
/// trait method, which each subtype implements with its own lens, so the
/// rebuilt handle holds the same concrete type. [`CopyLens::try_focus`]
/// narrows the handle's lens to the lens of one subtype.
pub trait Copyable: Clone + Sized {
    type Lens<'a, R: 'a>
    where
        Self: 'a;

    /// Wraps a lens addressing a value of this type.
    fn lens_from<'a, R: 'a>(lens: CopyLens<'a, Self, R>) -> Self::Lens<'a, R>;

    /// The root lens, producing the updated copy.
    fn copy_with(&self) -> Self::Lens<'_, Self> {
        Self::lens_from(CopyLens::root(self))
    }
}

// -----------------------------------------------------------------------------
// Shared pointers

/// Looks through the pointer. A change allocates a new `Arc`, the untouched
/// siblings keep theirs.
impl<T: Copyable> Copyable for Arc<T> {
    type Lens<'a, R: 'a>
        = T::Lens<'a, R>
    where
        Self: 'a;

    fn lens_from<'a, R: 'a>(lens: CopyLens<'a, Self, R>) -> Self::Lens<'a, R> {
        T::lens_from(lens.focus(|shared| &**shared, |_, value| Arc::new(value)))
    }
}

// -----------------------------------------------------------------------------
// Containers

impl<T: Clone> Copyable for Vec<T> {
    type Lens<'a, R: 'a>
        = ListLens<'a, T, R>
    where
        Self: 'a;

    #[inline]
    fn lens_from<'a, R: 'a>(lens: CopyLens<'a, Self, R>) -> Self::Lens<'a, R> {
        ListLens::new(lens)
    }
}

impl<K: Ord + Clone, V: Clone> Copyable for BTreeMap<K, V> {
    type Lens<'a, R: 'a>
        = MapLens<'a, Self, R>
    where
        Self: 'a;

    #[inline]
    fn lens_from<'a, R: 'a>(lens: CopyLens<'a, Self, R>) -> Self::Lens<'a, R> {
        MapLens::new(lens)
    }
}

impl<K, V, S> Copyable for HashMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    type Lens<'a, R: 'a>
        = MapLens<'a, Self, R>
    where
        Self: 'a;

    #[inline]
    fn lens_from<'a, R: 'a>(lens: CopyLens<'a, Self, R>) -> Self::Lens<'a, R> {
        MapLens::new(lens)
    }
}

// -----------------------------------------------------------------------------
// Tests
