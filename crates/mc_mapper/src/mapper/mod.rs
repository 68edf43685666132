//! The engine entry point.
//!
//! ## Menu
//!
//! - [`Mapper`]: a shared registry plus [`MapperOptions`], with the typed
//!   entry points for decode, encode, equality, hashing and stringify.
//! - [`MapperOptions`], [`TypeMarkerPolicy`]: discriminator key, type marker
//!   key and when the type marker is written.
//! - [`global`]: the process-wide mapper.

// -----------------------------------------------------------------------------
// Modules

mod global;
mod options;

// -----------------------------------------------------------------------------
// Exports

pub use global::global;
pub use options::{MapperOptions, TypeMarkerPolicy};

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use crate::convert::{Context, TypeFactory, TypedConverter};
use crate::error::{MapError, MapResult};
use crate::info::TypeInfo;
use crate::mappable::{Dynamic, MapType, Mappable};
use crate::poly::Family;
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
use crate::value::{Mapping, Value};

// -----------------------------------------------------------------------------
// Mapper

/// Runtime object mapper.
///
/// Clones share one registry, so a converter registered through one clone
/// is visible through all of them. Conversions take a read lock on the
/// registry for their whole duration, registration takes the write lock.
/// Registering from inside a hook or converter therefore deadlocks.
///
/// # Examples
///
/// ```
/// use mc_mapper::{Mapper, Value};
///
/// let mapper = Mapper::new();
/// let encoded = mapper.encode(&Some(String::from("Judy"))).unwrap();
/// assert_eq!(encoded, Value::from("Judy"));
/// assert_eq!(mapper.decode::<Option<String>>(&Value::Null).unwrap(), None);
/// ```
#[derive(Clone)]
pub struct Mapper {
    registry: Arc<RwLock<TypeRegistry>>,
    options: Arc<MapperOptions>,
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Mapper {
    /// A mapper with default options, the built-in types and, with the
    /// `auto_register` feature, every auto-registered type.
    pub fn new() -> Self {
        Self::with_options(MapperOptions::new())
    }

    pub fn with_options(options: MapperOptions) -> Self {
        let mut registry = TypeRegistry::new();
        registry.auto_register();
        Self {
            registry: Arc::new(RwLock::new(registry)),
            options: Arc::new(options),
        }
    }

    #[inline]
    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with a [`Context`] over this mapper's registry.
    pub fn with_context<R>(&self, f: impl FnOnce(&Context<'_>) -> R) -> R {
        let registry = self.read();
        let cx = Context::new(&registry, &self.options);
        f(&cx)
    }

    // -------------------------------------------------------------------------
    // Decode

    pub fn decode<T: MapType>(&self, value: &Value) -> MapResult<T> {
        self.with_context(|cx| cx.decode::<T>(value))
    }

    /// Decodes into the open type, see [`DynamicConverter`](crate::impls::DynamicConverter).
    pub fn decode_dynamic(&self, value: &Value) -> MapResult<Dynamic> {
        self.decode::<Dynamic>(value)
    }

    pub fn decode_from_mapping<T: MapType>(&self, map: &Mapping) -> MapResult<T> {
        self.decode(&Value::Map(map.clone()))
    }

    /// Parses the text form and decodes it.
    #[cfg(feature = "json")]
    pub fn decode_from_text<T: MapType>(&self, text: &str) -> MapResult<T> {
        self.decode(&Value::from_text(text)?)
    }

    // -------------------------------------------------------------------------
    // Encode

    pub fn encode<T: MapType>(&self, value: &T) -> MapResult<Value> {
        self.with_context(|cx| cx.encode(value))
    }

    /// Encodes by the runtime type of `value`.
    ///
    /// Pass `&*boxed` for a [`Dynamic`], the box itself is a value of type
    /// `Dynamic`.
    pub fn encode_dynamic(&self, value: &dyn Mappable) -> MapResult<Value> {
        self.with_context(|cx| cx.encode_dynamic(value))
    }

    /// Encodes a value whose encoded form is a mapping.
    pub fn encode_to_mapping<T: MapType>(&self, value: &T) -> MapResult<Mapping> {
        match self.encode(value)? {
            Value::Map(map) => Ok(map),
            other => Err(MapError::mismatch("mapping", other.shape())),
        }
    }

    /// Encodes into the compact text form.
    #[cfg(feature = "json")]
    pub fn encode_to_text<T: MapType>(&self, value: &T) -> MapResult<String> {
        self.encode(value)?.to_text()
    }

    // -------------------------------------------------------------------------
    // Equality, hash and stringify

    /// Structural equality through the registered converter of `T`.
    pub fn equals<T: MapType>(&self, a: &T, b: &T) -> bool {
        self.with_context(|cx| cx.equals(a, b))
    }

    /// Stable hash, agrees with [`equals`](Mapper::equals).
    pub fn hash<T: MapType>(&self, value: &T) -> u64 {
        self.with_context(|cx| cx.hash(value))
    }

    /// Human readable rendering, `Name(field: value, ...)` for classes.
    pub fn as_string<T: MapType>(&self, value: &T) -> String {
        self.with_context(|cx| cx.stringify(value))
    }

    // -------------------------------------------------------------------------
    // Registration

    /// Registers `converter` for `T`, returning the entry it replaced.
    ///
    /// The new entry keeps the [`TypeFactory`] of the one it replaces, so
    /// `List<T>` keeps resolving from type markers. A type registered for
    /// the first time gets a factory without `Set<T>`; use
    /// [`use_meta`](Mapper::use_meta) with [`TypeFactory::hashable`] for that.
    pub fn use_converter<T: MapType>(&self, converter: impl TypedConverter<T>) -> Option<TypeMeta> {
        let mut registry = self.write();
        let factory = registry
            .get(TypeId::of::<T>())
            .and_then(TypeMeta::factory)
            .unwrap_or_else(TypeFactory::of::<T>);
        let meta = TypeMeta::new::<T>(converter).with_factory(factory);
        Self::replace(&mut registry, meta)
    }

    /// Registers a prepared entry, returning the one it replaced.
    pub fn use_meta(&self, meta: TypeMeta) -> Option<TypeMeta> {
        Self::replace(&mut self.write(), meta)
    }

    /// Registers a polymorphic family, returning the entry it replaced.
    ///
    /// Fails with [`MapError::AmbiguousRegistration`] and leaves the registry
    /// untouched when two subtypes claim one discriminator.
    pub fn use_family<F: MapType>(&self, family: Family<F>) -> MapResult<Option<TypeMeta>> {
        let meta = family.into_type_meta()?;
        Ok(Self::replace(&mut self.write(), meta))
    }

    /// Removes the entry of `T`.
    ///
    /// Built-in types keep resolving through their fallback entry afterwards.
    pub fn unuse<T: MapType>(&self) -> Option<TypeMeta> {
        let removed = self.write().remove(TypeId::of::<T>());
        if removed.is_some() {
            debug!("removed converter of `{}`", T::type_info().name());
        }
        removed
    }

    /// Registers `T` and its dependencies unless `T` already has an entry.
    pub fn register<T: GetTypeMeta>(&self) {
        self.write().register::<T>();
    }

    fn replace(registry: &mut TypeRegistry, meta: TypeMeta) -> Option<TypeMeta> {
        let name = meta.name();
        let previous = registry.insert_type_meta(meta);
        if previous.is_some() {
            debug!("replaced converter of `{name}`");
        }
        previous
    }

    // -------------------------------------------------------------------------
    // Lookup

    /// Every registered type, in no particular order.
    pub fn list_registered(&self) -> Vec<&'static TypeInfo> {
        self.read().iter().map(TypeMeta::info).collect()
    }

    /// The entry used for `T`, registered or built in.
    pub fn lookup<T: MapType>(&self) -> Option<TypeMeta> {
        self.with_context(|cx| cx.meta_of::<T>().ok().cloned())
    }

    /// The entry a type marker with `name` resolves to.
    pub fn lookup_by_name(&self, name: &str) -> Option<TypeMeta> {
        self.read().resolve_name(name).ok().cloned()
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("registry", &*self.read())
            .field("options", &self.options)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::Mapper;
    use crate::convert::{Context, TypedConverter};
    use crate::{MapError, MapResult, Mapping, Value};

    struct Shout;

    impl TypedConverter<String> for Shout {
        fn decode(&self, value: &Value, _cx: &Context<'_>) -> MapResult<String> {
            value
                .as_str()
                .map(str::to_lowercase)
                .ok_or_else(|| MapError::mismatch("String", value.shape()))
        }

        fn encode(&self, value: &String, _cx: &Context<'_>) -> MapResult<Value> {
            Ok(Value::from(value.to_uppercase()))
        }
    }

    #[test]
    fn use_and_unuse() {
        let mapper = Mapper::new();
        let name = String::from("judy");

        let previous = mapper.use_converter::<String>(Shout).unwrap();
        assert_eq!(previous.name(), "String");
        assert_eq!(mapper.encode(&name).unwrap(), Value::from("JUDY"));
        // Containers go through the replaced element converter.
        assert_eq!(
            mapper.encode(&vec![name.clone()]).unwrap(),
            Value::List(vec![Value::from("JUDY")]),
        );
        // The factory survives the replacement.
        assert!(mapper.lookup_by_name("Set<String>").is_some());

        assert!(mapper.unuse::<String>().is_some());
        assert!(mapper.unuse::<String>().is_none());
        assert_eq!(mapper.encode(&name).unwrap(), Value::from("judy"));
    }

    #[test]
    fn clones_share_the_registry() {
        let mapper = Mapper::new();
        let clone = mapper.clone();
        clone.use_converter::<String>(Shout);
        assert_eq!(mapper.encode(&String::from("a")).unwrap(), Value::from("A"));
    }

    #[test]
    fn mapping_entry_points() {
        let mapper = Mapper::new();
        let err = mapper.encode_to_mapping(&1_i64).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch at $: expected mapping, found integer");

        let mut map = Mapping::new();
        map.insert("a", true);
        let decoded = mapper
            .decode_from_mapping::<alloc::collections::BTreeMap<String, bool>>(&map)
            .unwrap();
        assert!(decoded["a"]);
    }

    #[test]
    fn lookup() {
        let mapper = Mapper::new();
        let names: Vec<_> = mapper.list_registered().iter().map(|i| i.name()).collect();
        assert!(names.contains(&"i64"));
        assert!(names.contains(&"Dynamic"));

        assert_eq!(mapper.lookup::<Vec<bool>>().unwrap().name(), "List<bool>");
        assert!(mapper.lookup_by_name("List<bool>").is_some());
        assert!(mapper.lookup_by_name("Nope").is_none());
    }

    #[cfg(feature = "auto_register")]
    #[test]
    fn auto_registered_types() {
        let mapper = Mapper::new();
        assert!(mapper.list_registered().iter().any(|info| info.name() == "Person"));
        assert!(mapper.lookup_by_name("List<Person>").is_some());
    }
}
