use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use mc_utils::hash::HashSet;

use crate::mappable::MapType;
use crate::registry::TypeMeta;

// -----------------------------------------------------------------------------
// GenericShape

/// Built-in generic containers a [`TypeFactory`] can instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericShape {
    /// `List<T>`, a `Vec<T>`.
    List,
    /// `Set<T>`, a `HashSet<T>`. Only for element types that are `Eq + Hash`.
    Set,
    /// `Map<String, T>`, a `BTreeMap<String, T>`.
    Map,
    /// `Option<T>`.
    Option,
}

impl GenericShape {
    pub const ALL: [GenericShape; 4] = [Self::List, Self::Set, Self::Map, Self::Option];

    /// Matches the identifier of a generic type name.
    pub fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "List" => Some(Self::List),
            "Set" => Some(Self::Set),
            "Map" => Some(Self::Map),
            "Option" => Some(Self::Option),
            _ => None,
        }
    }

    /// Number of type arguments the shape takes.
    pub const fn arity(self) -> usize {
        match self {
            Self::Map => 2,
            Self::List | Self::Set | Self::Option => 1,
        }
    }
}

// -----------------------------------------------------------------------------
// TypeFactory

/// Container converters over one element type, monomorphised when the
/// element type is registered.
///
/// The registry reaches for this when type arguments only appear in data,
/// e.g. a `"__type": "List<Person>"` marker: the entry registered for
/// `Person` instantiates the `Vec<Person>` converter. Statically known
/// arguments never need it, `Vec<Person>` resolves through its own
/// [`MapType`] impl.
///
/// # Examples
///
/// ```
/// use mc_mapper::MapType;
/// use mc_mapper::convert::{GenericShape, TypeFactory};
///
/// let factory = TypeFactory::hashable::<String>();
/// let meta = factory.instantiate(GenericShape::List).unwrap();
/// assert!(meta.info().is::<Vec<String>>());
/// assert_eq!(meta.info().name(), "List<String>");
///
/// let floats = TypeFactory::of::<f64>();
/// assert!(floats.instantiate(GenericShape::Set).is_none());
/// ```
#[derive(Clone, Copy)]
pub struct TypeFactory {
    build: fn(GenericShape) -> Option<&'static TypeMeta>,
}

impl TypeFactory {
    /// Factory for any element type, without [`GenericShape::Set`].
    #[inline]
    pub fn of<T: MapType>() -> Self {
        Self {
            build: build_plain::<T>,
        }
    }

    /// Factory for element types that can live in a `HashSet`.
    #[inline]
    pub fn hashable<T: MapType + Eq + Hash>() -> Self {
        Self {
            build: build_hashable::<T>,
        }
    }

    /// The registry entry of `shape` instantiated over the element type.
    #[inline]
    pub fn instantiate(&self, shape: GenericShape) -> Option<&'static TypeMeta> {
        (self.build)(shape)
    }
}

impl fmt::Debug for TypeFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeFactory")
    }
}

fn build_plain<T: MapType>(shape: GenericShape) -> Option<&'static TypeMeta> {
    match shape {
        GenericShape::List => Vec::<T>::fallback_meta(),
        GenericShape::Map => BTreeMap::<String, T>::fallback_meta(),
        GenericShape::Option => Option::<T>::fallback_meta(),
        GenericShape::Set => None,
    }
}

fn build_hashable<T: MapType + Eq + Hash>(shape: GenericShape) -> Option<&'static TypeMeta> {
    match shape {
        GenericShape::Set => HashSet::<T>::fallback_meta(),
        other => build_plain::<T>(other),
    }
}
