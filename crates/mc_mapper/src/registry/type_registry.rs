use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::TypeId;
use std::sync::{PoisonError, RwLock};

use log::warn;
use mc_utils::TypeIdMap;
use mc_utils::hash::{HashMap, HashSet};

use crate::convert::GenericShape;
use crate::error::{MapError, MapResult};
use crate::info::{TypeKind, TypeName};
use crate::mappable::{Dynamic, MapType};
use crate::poly::Family;
use crate::registry::{GetTypeMeta, TypeMeta};

// -----------------------------------------------------------------------------
// TypeRegistry

/// The table from type identity to converter.
///
/// Besides the registered entries, the registry remembers entries it derived
/// on its own: container instantiations built by a [`TypeFactory`] for a type
/// named in data, and the fallback entries of built-in containers resolved
/// through their static type. Those never shadow registered entries and are
/// not listed by [`iter`](Self::iter).
///
/// # Example
///
/// ```
/// use mc_mapper::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
///
/// let meta = registry.resolve_name("List<String>").unwrap();
/// assert!(meta.info().is::<Vec<String>>());
/// assert!(registry.get_with_name("String").is_some());
/// ```
///
/// [`TypeFactory`]: crate::convert::TypeFactory
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
    open_generics: HashMap<&'static str, TypeId>,
    derived: RwLock<TypeIdMap<&'static TypeMeta>>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a empty [`TypeRegistry`].
    pub fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
            open_generics: HashMap::default(),
            derived: RwLock::new(TypeIdMap::new()),
        }
    }

    /// Create a type registry seeded with the built-in types.
    ///
    /// - `()` `bool` `char` `String`
    /// - `i8 - i64` `isize` `u8 - u64` `usize` `f32` `f64`
    /// - `Dynamic`, `List<Dynamic>`, `Map<String, Dynamic>`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<()>();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<Dynamic>();
        registry.register::<Vec<Dynamic>>();
        registry.register::<BTreeMap<String, Dynamic>>();
        registry
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(&mut self, meta: &TypeMeta) {
        let info = meta.info();
        let name = info.name();

        if !self.ambiguous_names.contains(name) {
            if self.type_name_to_id.contains_key(name) {
                warn!(
                    "type name `{name}` is shared by `{}` and another type, \
                     lookups by that name will fail",
                    info.rust_name(),
                );
                self.type_name_to_id.remove(name);
                self.ambiguous_names.insert(name);
            } else {
                self.type_name_to_id.insert(name, info.id());
            }
        }

        let open = !info.args().is_empty()
            && info.args().iter().all(|arg| arg.kind() == TypeKind::Dynamic);
        if open && info.kind() == TypeKind::Class {
            self.open_generics.insert(info.ident(), info.id());
        }
    }

    // The type must already be out of the table.
    fn remove_type_indices(&mut self, meta: &TypeMeta) {
        let info = meta.info();
        let name = info.name();
        if self.type_name_to_id.get(name) == Some(&info.id()) {
            self.type_name_to_id.remove(name);
        }
        if self.ambiguous_names.contains(name) {
            let mut holders = self
                .type_meta_table
                .values()
                .filter(|other| other.name() == name)
                .map(|other| other.id());
            match (holders.next(), holders.next()) {
                (Some(survivor), None) => {
                    self.ambiguous_names.remove(name);
                    self.type_name_to_id.insert(name, survivor);
                }
                (None, _) => {
                    self.ambiguous_names.remove(name);
                }
                _ => {}
            }
        }
        if self.open_generics.get(info.ident()) == Some(&info.id()) {
            self.open_generics.remove(info.ident());
        }
    }

    /// Try add or do nothing.
    ///
    /// Returns `false` and keeps the existing entry if the type is already registered.
    ///
    /// This method will _not_ register type dependencies.
    /// Use [`register`](Self::register) to register a type with its dependencies.
    pub fn try_insert_type_meta(&mut self, meta: TypeMeta) -> bool {
        if self.type_meta_table.contains(&meta.id()) {
            return false;
        }
        self.add_new_type_indices(&meta);
        self.type_meta_table.insert(meta.id(), meta);
        true
    }

    /// Insert or **Overwrite** an entry, returning the one it replaced.
    ///
    /// A replacement without a [`TypeFactory`](crate::convert::TypeFactory)
    /// keeps the factory of the entry it replaces.
    pub fn insert_type_meta(&mut self, mut meta: TypeMeta) -> Option<TypeMeta> {
        match self.type_meta_table.get(&meta.id()) {
            Some(previous) => meta.inherit_factory(previous),
            None => self.add_new_type_indices(&meta),
        }
        self.type_meta_table.insert(meta.id(), meta)
    }

    /// Removes an entry, returning it.
    pub fn remove(&mut self, type_id: TypeId) -> Option<TypeMeta> {
        let meta = self.type_meta_table.remove(&type_id)?;
        self.remove_type_indices(&meta);
        Some(meta)
    }

    /// Attempts to register the type `T` if it has not yet been registered already.
    ///
    /// This will also recursively register any type dependencies as specified by
    /// [`GetTypeMeta::register_dependencies`]. If `T` is already registered,
    /// neither it nor its dependencies are touched.
    pub fn register<T: GetTypeMeta>(&mut self) {
        if self.try_insert_type_meta(T::get_type_meta()) {
            T::register_dependencies(self);
        }
    }

    /// Registers the built-in fallback entry of `T`, if it has one and no
    /// entry exists yet.
    ///
    /// Used by container types to register their element types.
    pub fn register_fallback<T: MapType>(&mut self) -> bool {
        match T::fallback_meta() {
            Some(meta) => self.try_insert_type_meta(meta.clone()),
            None => false,
        }
    }

    /// Validates `family` and registers it, returning the entry it replaced.
    ///
    /// Fails with [`MapError::AmbiguousRegistration`] if two subtypes claim
    /// one discriminator value, the null sentinel or the default marker.
    pub fn insert_family<F: MapType>(&mut self, family: Family<F>) -> MapResult<Option<TypeMeta>> {
        let meta = family.into_type_meta()?;
        Ok(self.insert_type_meta(meta))
    }

    /// Whether the type with given [`TypeId`] has been registered in this registry.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    /// Returns the entry for the given [`TypeId`].
    ///
    /// Falls back to entries the registry derived on its own.
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        match self.type_meta_table.get(&type_id) {
            Some(meta) => Some(meta),
            None => self.get_derived(type_id),
        }
    }

    /// Returns the registered entry with the given type name.
    ///
    /// If the name is ambiguous, or nothing with that name has been registered, returns `None`.
    pub fn get_with_name(&self, name: &str) -> Option<&TypeMeta> {
        match self.type_name_to_id.get(name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `true` if the given type name matches multiple registered types.
    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.ambiguous_names.contains(name)
    }

    /// Resolves a type name found in data, such as a type marker.
    ///
    /// Order of resolution:
    ///
    /// 1. a registered entry with exactly that name,
    /// 2. `List`, `Set`, `Map` and `Option` over a resolvable argument, built
    ///    by the argument's [`TypeFactory`](crate::convert::TypeFactory),
    /// 3. for other generic names, the open instantiation of the generic
    ///    class (all arguments `Dynamic`) if one is registered.
    pub fn resolve_name(&self, name: &str) -> MapResult<&TypeMeta> {
        if let Some(meta) = self.get_with_name(name) {
            return Ok(meta);
        }
        let parsed = TypeName::parse(name)?;
        self.resolve_parsed(&parsed)
            .ok_or_else(|| MapError::unknown_type(name))
    }

    fn resolve_parsed(&self, name: &TypeName<'_>) -> Option<&TypeMeta> {
        let rendered = name.to_string();
        if let Some(meta) = self.get_with_name(&rendered) {
            return Some(meta);
        }
        if let Some(meta) = self.get_derived_by_name(&rendered) {
            return Some(meta);
        }
        if !name.is_generic() {
            return None;
        }

        if let Some(shape) = GenericShape::from_ident(name.ident)
            && name.args.len() == shape.arity()
        {
            let element = match shape {
                GenericShape::Map if name.args[0].ident != "String" => return None,
                GenericShape::Map => &name.args[1],
                _ => &name.args[0],
            };
            let meta = self
                .resolve_parsed(element)?
                .factory()?
                .instantiate(shape)?;
            self.remember(meta);
            return Some(meta);
        }

        match self.open_generics.get(name.ident) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Finds the entry of a container over a registered element type by its
    /// [`TypeId`] alone, e.g. `Vec<Person>` held in a `Dynamic`.
    ///
    /// Only one level deep: every factory of a registered entry is tried.
    /// A hit is remembered.
    pub fn derive_by_id(&self, type_id: TypeId) -> Option<&TypeMeta> {
        if let Some(meta) = self.get(type_id) {
            return Some(meta);
        }
        let meta = self
            .type_meta_table
            .values()
            .filter_map(TypeMeta::factory)
            .flat_map(|factory| {
                GenericShape::ALL
                    .into_iter()
                    .filter_map(move |shape| factory.instantiate(shape))
            })
            .find(|meta| meta.id() == type_id)?;
        self.remember(meta);
        Some(meta)
    }

    /// Keeps an entry the registry did not get through registration, so
    /// later lookups by [`TypeId`] find it.
    pub fn remember(&self, meta: &'static TypeMeta) {
        if self.type_meta_table.contains(&meta.id()) || self.get_derived(meta.id()).is_some() {
            return;
        }
        self.derived
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .try_insert(meta.id(), || meta);
    }

    fn get_derived(&self, type_id: TypeId) -> Option<&'static TypeMeta> {
        self.derived
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    /// Containers of containers have no factory, they are only found by name
    /// once their type has been seen.
    fn get_derived_by_name(&self, name: &str) -> Option<&'static TypeMeta> {
        self.derived
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|meta| meta.name() == name)
            .copied()
    }

    /// Registered entries, in no particular order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.type_meta_table.is_empty()
    }

    /// Automatically registers all types declared with
    /// [`impl_auto_register!`](crate::impl_auto_register).
    ///
    /// Repeated calls are cheap and do not replace existing entries.
    ///
    /// Returns `false` when the `auto_register` feature is disabled.
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::auto_register::__register_types(self);
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set()
            .entries(self.type_meta_table.values().map(TypeMeta::name))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
