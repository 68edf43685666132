use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use crate::convert::{ClassInfo, Converter, Erased, TypeFactory, TypedConverter};
use crate::info::TypeInfo;
use crate::mappable::MapType;
use crate::poly::FamilyTable;
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// TypeMeta

/// One registry entry: a type's [`TypeInfo`], its converter and, for types
/// that can appear as a type argument in data, its [`TypeFactory`].
///
/// Entries are never mutated in place. Replacing a converter swaps the whole
/// entry, and clones share the converter.
///
/// # Example
///
/// ```
/// use mc_mapper::registry::{GetTypeMeta, TypeMeta};
///
/// let meta = String::get_type_meta();
/// assert_eq!(meta.name(), "String");
/// assert!(meta.factory().is_some());
/// ```
#[derive(Clone)]
pub struct TypeMeta {
    info: &'static TypeInfo,
    converter: Arc<dyn Converter>,
    factory: Option<TypeFactory>,
}

impl TypeMeta {
    /// Entry for `T` backed by a typed converter.
    pub fn new<T: MapType>(converter: impl TypedConverter<T>) -> Self {
        Self::from_converter(Arc::new(Erased::<T, _>::new(converter)))
    }

    /// Entry backed by an object-safe converter.
    pub fn from_converter(converter: Arc<dyn Converter>) -> Self {
        Self {
            info: converter.type_info(),
            converter,
            factory: None,
        }
    }

    #[inline]
    pub fn with_factory(mut self, factory: TypeFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        self.info
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.info.id()
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.info.name()
    }

    #[inline]
    pub fn converter(&self) -> &dyn Converter {
        &*self.converter
    }

    #[inline]
    pub fn factory(&self) -> Option<TypeFactory> {
        self.factory
    }

    #[inline]
    pub fn class_info(&self) -> Option<&ClassInfo> {
        self.converter.class_info()
    }

    #[inline]
    pub fn family(&self) -> Option<&dyn FamilyTable> {
        self.converter.family()
    }

    /// The supertype named by the class metadata.
    #[inline]
    pub fn parent(&self) -> Option<TypeId> {
        self.class_info().and_then(ClassInfo::parent)
    }

    /// Whether both entries share one converter.
    #[inline]
    pub fn same_converter(&self, other: &TypeMeta) -> bool {
        Arc::ptr_eq(&self.converter, &other.converter)
    }

    pub(crate) fn inherit_factory(&mut self, previous: &TypeMeta) {
        if self.factory.is_none() {
            self.factory = previous.factory;
        }
    }
}

impl fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMeta")
            .field("info", self.info)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// GetTypeMeta

/// Builds the registry entry of a type.
///
/// Generated converters implement this for each class, registering field
/// types in [`register_dependencies`](GetTypeMeta::register_dependencies).
pub trait GetTypeMeta: MapType {
    fn get_type_meta() -> TypeMeta;

    /// Registers the types this type's converter relies on.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}
