use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::any::TypeId;
use core::hash::{BuildHasher, Hash, Hasher};

use log::trace;
use mc_utils::hash::FixedHashState;

use crate::error::{MapError, MapResult};
use crate::hooks::HookChain;
use crate::info::{TypeInfo, TypeKind, TypeName};
use crate::mappable::{Dynamic, MapType, Mappable};
use crate::mapper::{MapperOptions, TypeMarkerPolicy};
use crate::poly::Discriminator;
use crate::registry::{TypeMeta, TypeRegistry};
use crate::value::{Mapping, Value};

/// Upper bound on parent chains, guards against a parent cycle.
const MAX_LINEAGE: usize = 64;

// -----------------------------------------------------------------------------
// Context

/// What a converter sees of the engine during one conversion.
///
/// Nested values go back through the context, so they pick up the registry
/// entry of their type, its class hooks and its discriminators. Converters
/// never look at the registry directly for that.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    registry: &'a TypeRegistry,
    options: &'a MapperOptions,
    /// Entry for the open slot of the value being decoded, taken from its
    /// type marker. Only consulted by the immediate `Dynamic` slots.
    open_arg: Option<&'a TypeMeta>,
}

impl<'a> Context<'a> {
    #[inline]
    pub const fn new(registry: &'a TypeRegistry, options: &'a MapperOptions) -> Self {
        Self {
            registry,
            options,
            open_arg: None,
        }
    }

    #[inline]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    #[inline]
    pub fn options(&self) -> &'a MapperOptions {
        self.options
    }

    /// The entry for `T`: the registered one, else the built-in fallback.
    pub fn meta_of<T: MapType>(&self) -> MapResult<&'a TypeMeta> {
        if let Some(meta) = self.registry.get(TypeId::of::<T>()) {
            return Ok(meta);
        }
        match T::fallback_meta() {
            Some(meta) => {
                self.registry.remember(meta);
                Ok(meta)
            }
            None => Err(MapError::unknown_type(T::type_info().name())),
        }
    }

    /// The entry for a type only known by id, `name` is used in the error.
    ///
    /// Containers over registered types are found through the factories,
    /// see [`TypeRegistry::derive_by_id`].
    pub fn meta_by_id(&self, type_id: TypeId, name: &str) -> MapResult<&'a TypeMeta> {
        self.registry
            .derive_by_id(type_id)
            .ok_or_else(|| MapError::unknown_type(name))
    }

    // -------------------------------------------------------------------------
    // Decode

    /// Decodes `value` as `T`.
    ///
    /// When `T` has exactly one open type argument (`Dynamic`) and the
    /// mapping's type marker names an instantiation of the same generic
    /// base, the `Dynamic` slots of `T` decode as the marked argument.
    /// A slot value carrying its own marker follows that marker instead.
    pub fn decode<T: MapType>(&self, value: &Value) -> MapResult<T> {
        let meta = self.meta_of::<T>()?;
        let decoded = self.decode_marked(meta, value)?;
        decoded.take::<T>().map_err(|other| {
            MapError::mismatch(T::type_info().name(), (*other).rust_type_name())
        })
    }

    /// Like [`Context::decode_with`], with the open slot of `meta` filled
    /// from the type marker of `value`.
    pub fn decode_marked(&self, meta: &TypeMeta, value: &Value) -> MapResult<Dynamic> {
        let info = meta.info();
        if info.kind() == TypeKind::Dynamic {
            return self.decode_with(meta, value);
        }
        let cx = Self {
            open_arg: self.marked_open_arg(info, value),
            ..*self
        };
        cx.decode_with(meta, value)
    }

    /// The marked entry for an open `Dynamic` slot, see [`Context::decode`].
    #[inline]
    pub fn open_arg(&self) -> Option<&'a TypeMeta> {
        self.open_arg
    }

    /// A context for decoding inside an open slot, the slot entry cleared.
    #[inline]
    pub fn in_open_slot(&self) -> Self {
        Self {
            open_arg: None,
            ..*self
        }
    }

    fn marked_open_arg(&self, info: &'static TypeInfo, value: &Value) -> Option<&'a TypeMeta> {
        let args = info.args();
        let mut open = args
            .iter()
            .enumerate()
            .filter(|(_, arg)| arg.kind() == TypeKind::Dynamic)
            .map(|(i, _)| i);
        let slot = open.next()?;
        if open.next().is_some() {
            return None;
        }

        let marker = self.marker(value.as_map()?)?;
        let name = TypeName::parse(marker).ok()?;
        if name.ident != info.ident() || name.args.len() != args.len() {
            return None;
        }
        let fixed_agree = args
            .iter()
            .zip(&name.args)
            .enumerate()
            .all(|(i, (arg, named))| i == slot || named.to_string() == arg.name());
        if !fixed_agree {
            return None;
        }

        let meta = self.registry.resolve_name(&name.args[slot].to_string()).ok()?;
        if meta.info().kind() == TypeKind::Dynamic {
            return None;
        }
        trace!("type marker `{marker}` fills the open slot of `{}`", info.name());
        Some(meta)
    }

    /// Decodes with the converter of `meta`, inside the class hooks of the
    /// type and of all its ancestors.
    pub fn decode_with(&self, meta: &TypeMeta, value: &Value) -> MapResult<Dynamic> {
        self.decode_below(None, meta, value)
    }

    /// Decodes a family member, leaving out the hooks the family has already run.
    pub(crate) fn decode_member(
        &self,
        family: TypeId,
        meta: &TypeMeta,
        value: &Value,
    ) -> MapResult<Dynamic> {
        self.decode_below(Some(family), meta, value)
    }

    fn decode_below(
        &self,
        stop: Option<TypeId>,
        meta: &TypeMeta,
        value: &Value,
    ) -> MapResult<Dynamic> {
        let converter = meta.converter();
        let hooks = self.class_hooks(meta, stop);
        if hooks.is_empty() {
            return converter.decode(value, self);
        }
        hooks.decode(value.clone(), meta.info(), &mut |value| {
            converter.decode(&value, self)
        })
    }

    // -------------------------------------------------------------------------
    // Encode

    pub fn encode<T: MapType>(&self, value: &T) -> MapResult<Value> {
        let meta = self.meta_of::<T>()?;
        self.encode_as(TypeId::of::<T>(), meta, value)
    }

    /// Encodes a value by its runtime type.
    pub fn encode_dynamic(&self, value: &dyn Mappable) -> MapResult<Value> {
        let runtime = value.ty_id();
        let meta = self.meta_by_id(runtime, value.rust_type_name())?;
        self.encode_as(runtime, meta, value)
    }

    /// Encodes `value` with `meta`, where `declared` is the statically known
    /// type at this position. The type marker is written according to
    /// [`TypeMarkerPolicy`].
    pub fn encode_as(
        &self,
        declared: TypeId,
        meta: &TypeMeta,
        value: &dyn Mappable,
    ) -> MapResult<Value> {
        let mut encoded = self.encode_below(None, meta, value)?;

        let tagged = match self.options.type_marker() {
            TypeMarkerPolicy::Never => false,
            TypeMarkerPolicy::Auto => declared != value.ty_id(),
            TypeMarkerPolicy::Always => {
                meta.info().kind() == TypeKind::Class || declared != value.ty_id()
            }
        };
        if tagged {
            self.write_marker(meta, &mut encoded);
        }
        Ok(encoded)
    }

    /// Encodes the value held by a family handle.
    ///
    /// The discriminator identifies the member, the type marker is only
    /// written under [`TypeMarkerPolicy::Always`].
    pub(crate) fn encode_member(&self, family: TypeId, value: &dyn Mappable) -> MapResult<Value> {
        let meta = self.meta_by_id(value.ty_id(), value.rust_type_name())?;
        let mut encoded = self.encode_below(Some(family), meta, value)?;
        if self.options.type_marker() == TypeMarkerPolicy::Always {
            self.write_marker(meta, &mut encoded);
        }
        Ok(encoded)
    }

    fn write_marker(&self, meta: &TypeMeta, encoded: &mut Value) {
        if let Value::Map(map) = encoded {
            map.insert(self.options.type_marker_key(), meta.name());
        }
    }

    fn encode_below(
        &self,
        stop: Option<TypeId>,
        meta: &TypeMeta,
        value: &dyn Mappable,
    ) -> MapResult<Value> {
        let converter = meta.converter();
        let mut core = |value: &dyn Mappable| {
            let mut encoded = converter.encode(value, self)?;
            self.merge_discriminators(meta, &mut encoded);
            Ok(encoded)
        };

        let hooks = self.class_hooks(meta, stop);
        if hooks.is_empty() {
            return core(value);
        }
        hooks.encode(value.clone_mappable(), &mut core)
    }

    /// Writes the discriminator of every family enclosing `meta`.
    fn merge_discriminators(&self, meta: &TypeMeta, encoded: &mut Value) {
        let Value::Map(map) = encoded else {
            return;
        };

        let mut child = meta;
        for _ in 0..MAX_LINEAGE {
            let Some(parent) = child.parent().and_then(|id| self.registry.get(id)) else {
                break;
            };
            if let Some(family) = parent.family() {
                let key = family.key().unwrap_or(self.options.discriminator_key());
                match family.discriminator_of(child.id()) {
                    Some(Discriminator::Value(value)) => {
                        map.insert(key, value.clone());
                    }
                    Some(Discriminator::Null) if self.options.encode_null_discriminator() => {
                        map.insert(key, Value::Null);
                    }
                    // Claimed by no exact value, so decoding lands back on the default.
                    Some(Discriminator::Default) => {
                        map.insert(key, child.name());
                    }
                    _ => {}
                }
            }
            child = parent;
        }
    }

    /// Class hooks of `meta`, outermost ancestor first, up to but excluding `stop`.
    fn class_hooks(&self, meta: &TypeMeta, stop: Option<TypeId>) -> HookChain {
        let mut chain = HookChain::new();
        self.collect_hooks(meta, stop, &mut chain, 0);
        chain
    }

    fn collect_hooks(
        &self,
        meta: &TypeMeta,
        stop: Option<TypeId>,
        chain: &mut HookChain,
        depth: usize,
    ) {
        let Some(class) = meta.class_info() else {
            return;
        };
        if depth < MAX_LINEAGE
            && let Some(parent) = class.parent()
            && Some(parent) != stop
            && let Some(parent) = self.registry.get(parent)
        {
            self.collect_hooks(parent, stop, chain, depth + 1);
        }
        chain.nest(class.hooks());
    }

    // -------------------------------------------------------------------------
    // Mapping helpers

    /// The type marker of a mapping, if it has one.
    pub fn marker<'v>(&self, map: &'v Mapping) -> Option<&'v str> {
        map.get(self.options.type_marker_key()).and_then(Value::as_str)
    }

    pub fn expect_map<'v>(&self, value: &'v Value) -> MapResult<&'v Mapping> {
        value
            .as_map()
            .ok_or_else(|| MapError::mismatch("mapping", value.shape()))
    }

    /// Decodes `map[key]`.
    ///
    /// An absent key decodes as null, so `Option` fields may be left out.
    /// Types that do not accept null report [`MapError::MissingField`].
    pub fn field<T: MapType>(&self, map: &Mapping, key: &str) -> MapResult<T> {
        match map.get(key) {
            Some(value) => self.decode(value).map_err(|e| e.at_key(key)),
            None => self
                .decode(&Value::Null)
                .map_err(|_| MapError::missing_field(key)),
        }
    }

    /// Decodes `map[key]`, absent and null both give `None`.
    pub fn optional_field<T: MapType>(&self, map: &Mapping, key: &str) -> MapResult<Option<T>> {
        match map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => self.decode(value).map(Some).map_err(|e| e.at_key(key)),
        }
    }

    /// Decodes `map[key]`, or takes `default` when the key is absent.
    pub fn field_or<T: MapType>(
        &self,
        map: &Mapping,
        key: &str,
        default: impl FnOnce() -> T,
    ) -> MapResult<T> {
        match map.get(key) {
            Some(value) => self.decode(value).map_err(|e| e.at_key(key)),
            None => Ok(default()),
        }
    }

    /// Decodes `map[key]` inside field-level hooks.
    pub fn field_with_hook<T: MapType>(
        &self,
        map: &Mapping,
        key: &str,
        hooks: &HookChain,
    ) -> MapResult<T> {
        let meta = self.meta_of::<T>()?;
        let found = map.get(key);
        let value = found.cloned().unwrap_or_default();

        let decoded = hooks
            .decode(value, meta.info(), &mut |value| self.decode_with(meta, &value))
            .map_err(|e| match (found, e) {
                (None, e @ MapError::Hook { .. }) => e.at_key(key),
                (None, _) => MapError::missing_field(key),
                (Some(_), e) => e.at_key(key),
            })?;

        decoded.take::<T>().map_err(|other| {
            MapError::mismatch(T::type_info().name(), (*other).rust_type_name()).at_key(key)
        })
    }

    /// Encodes `value` into `map[key]`.
    pub fn put<T: MapType>(&self, map: &mut Mapping, key: &str, value: &T) -> MapResult<()> {
        let encoded = self.encode(value).map_err(|e| e.at_key(key))?;
        map.insert(key, encoded);
        Ok(())
    }

    /// Encodes `value` into `map[key]` inside field-level hooks.
    pub fn put_with_hook<T: MapType>(
        &self,
        map: &mut Mapping,
        key: &str,
        value: &T,
        hooks: &HookChain,
    ) -> MapResult<()> {
        let meta = self.meta_of::<T>()?;
        let declared = TypeId::of::<T>();
        let encoded = hooks
            .encode(Box::new(value.clone()), &mut |value| {
                if value.ty_id() == declared {
                    self.encode_as(declared, meta, value)
                } else {
                    self.encode_dynamic(value)
                }
            })
            .map_err(|e| e.at_key(key))?;
        map.insert(key, encoded);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Equality, hash and stringify

    pub fn equals<T: MapType>(&self, a: &T, b: &T) -> bool {
        match self.meta_of::<T>() {
            Ok(meta) => meta.converter().equals(a, b, self),
            Err(_) => false,
        }
    }

    pub fn hash<T: MapType>(&self, value: &T) -> u64 {
        match self.meta_of::<T>() {
            Ok(meta) => meta.converter().hash(value, self),
            Err(_) => 0,
        }
    }

    pub fn stringify<T: MapType>(&self, value: &T) -> String {
        match self.meta_of::<T>() {
            Ok(meta) => meta.converter().stringify(value, self),
            Err(_) => T::type_info().name().into(),
        }
    }

    /// Values of different runtime types are never equal.
    pub fn equals_dynamic(&self, a: &dyn Mappable, b: &dyn Mappable) -> bool {
        if a.ty_id() != b.ty_id() {
            return false;
        }
        match self.registry.derive_by_id(a.ty_id()) {
            Some(meta) => meta.converter().equals(a, b, self),
            None => false,
        }
    }

    pub fn hash_dynamic(&self, value: &dyn Mappable) -> u64 {
        match self.registry.derive_by_id(value.ty_id()) {
            Some(meta) => meta.converter().hash(value, self),
            None => 0,
        }
    }

    pub fn stringify_dynamic(&self, value: &dyn Mappable) -> String {
        match self.registry.derive_by_id(value.ty_id()) {
            Some(meta) => meta.converter().stringify(value, self),
            None => value.rust_type_name().into(),
        }
    }

    /// Starts a `Name(field: value, ...)` rendering for a class.
    #[inline]
    pub fn class_to_string<'c>(&'c self, name: &str) -> ClassString<'c, 'a> {
        let mut out = String::from(name);
        out.push('(');
        ClassString {
            cx: self,
            out,
            empty: true,
        }
    }

    /// Combines the hashes of a class's fields.
    pub fn hash_fields(&self, name: &str, fields: impl IntoIterator<Item = u64>) -> u64 {
        let mut hasher = FixedHashState.build_hasher();
        name.hash(&mut hasher);
        for field in fields {
            hasher.write_u64(field);
        }
        hasher.finish()
    }
}

impl core::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Context")
            .field("options", self.options)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ClassString

/// Builder returned by [`Context::class_to_string`].
pub struct ClassString<'c, 'a> {
    cx: &'c Context<'a>,
    out: String,
    empty: bool,
}

impl ClassString<'_, '_> {
    pub fn field<T: MapType>(mut self, name: &str, value: &T) -> Self {
        if !self.empty {
            self.out.push_str(", ");
        }
        self.empty = false;
        self.out.push_str(name);
        self.out.push_str(": ");
        self.out.push_str(&self.cx.stringify(value));
        self
    }

    pub fn finish(mut self) -> String {
        self.out.push(')');
        self.out
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use std::sync::Mutex;

    use crate::fixtures::{
        Animal, Cat, Person, PersonConverter, Wrapper, register_animals, register_animals_with,
    };
    use crate::hooks::{Hook, HookChain, Hooked, UnmappedPropertiesHook};
    use crate::{Dynamic, MapError, MapResult, Mapper, Mapping, Value};

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
    }

    impl Recorder {
        fn push(&self, stage: &str) {
            self.log.lock().unwrap().push(alloc::format!("{}.{stage}", self.name));
        }
    }

    impl Hook for Recorder {
        fn before_decode(&self, value: Value) -> MapResult<Hooked> {
            self.push("before");
            Ok(Hooked::Encoded(value))
        }

        fn after_decode(&self, value: Dynamic) -> MapResult<Dynamic> {
            self.push("after");
            Ok(value)
        }

        fn before_encode(&self, value: Dynamic) -> MapResult<Hooked> {
            self.push("before");
            Ok(Hooked::Decoded(value))
        }

        fn after_encode(&self, value: Value) -> MapResult<Value> {
            self.push("after");
            Ok(value)
        }
    }

    /// Accepts `"yes"`/`"no"` for booleans, rejects `"maybe"`.
    struct YesNo;

    impl Hook for YesNo {
        fn before_decode(&self, value: Value) -> MapResult<Hooked> {
            match value.as_str() {
                Some("yes") => Ok(Hooked::Decoded(Box::new(true))),
                Some("no") => Ok(Hooked::Decoded(Box::new(false))),
                Some("maybe") => Err(MapError::hook("undecided")),
                _ => Ok(Hooked::Encoded(value)),
            }
        }

        fn after_encode(&self, value: Value) -> MapResult<Value> {
            Ok(match value {
                Value::Bool(true) => Value::from("yes"),
                Value::Bool(false) => Value::from("no"),
                other => other,
            })
        }
    }

    fn take(log: &Log) -> Vec<String> {
        core::mem::take(&mut *log.lock().unwrap())
    }

    #[test]
    fn inherited_hooks_bracket_the_subclass() {
        let log = Log::default();
        let mapper = Mapper::new();
        register_animals_with(
            &mapper,
            HookChain::new().with(Recorder { name: "A", log: log.clone() }),
            HookChain::new().with(Recorder { name: "B", log: log.clone() }),
        );
        let cat = Cat {
            name: "Judy".into(),
            color: "Black".into(),
        };
        let bracket = ["A.before", "B.before", "B.after", "A.after"];

        let encoded = mapper.encode(&cat).unwrap();
        assert_eq!(take(&log), bracket);

        mapper.decode::<Cat>(&encoded).unwrap();
        assert_eq!(take(&log), bracket);

        let pet: Box<dyn Animal> = Box::new(cat);
        mapper.encode(&pet).unwrap();
        assert_eq!(take(&log), bracket);
        mapper.decode::<Box<dyn Animal>>(&encoded).unwrap();
        assert_eq!(take(&log), bracket);
    }

    #[test]
    fn class_hook_short_circuits() {
        struct Canned;

        impl Hook for Canned {
            fn before_decode(&self, _: Value) -> MapResult<Hooked> {
                Ok(Hooked::Decoded(Box::new(Person::judy())))
            }
        }

        let mapper = Mapper::new();
        mapper.use_converter::<Person>(PersonConverter::new(HookChain::new().with(Canned)));
        // The core would reject this input.
        let person = mapper.decode::<Person>(&Value::Int(1)).unwrap();
        assert_eq!(person, Person::judy());
    }

    #[test]
    fn field_hooks() {
        let mapper = Mapper::new();
        let hooks = HookChain::new().with(YesNo);
        let mut map = Mapping::new();
        map.insert("a", "yes");
        map.insert("b", true);
        map.insert("c", "maybe");

        mapper.with_context(|cx| {
            assert!(cx.field_with_hook::<bool>(&map, "a", &hooks).unwrap());
            assert!(cx.field_with_hook::<bool>(&map, "b", &hooks).unwrap());

            let err = cx.field_with_hook::<bool>(&map, "c", &hooks).unwrap_err();
            assert_eq!(err.to_string(), "hook failed at $.c: undecided");
            let err = cx.field_with_hook::<bool>(&map, "d", &hooks).unwrap_err();
            assert_eq!(err.to_string(), "missing field `d` at $");

            let mut out = Mapping::new();
            cx.put_with_hook(&mut out, "a", &false, &hooks).unwrap();
            assert_eq!(out.get("a"), Some(&Value::from("no")));
        });
    }

    #[test]
    fn field_helpers() {
        let mapper = Mapper::new();
        let mut map = Mapping::new();
        map.insert("name", "Judy");
        map.insert("email", Value::Null);

        mapper.with_context(|cx| {
            assert_eq!(cx.optional_field::<String>(&map, "email").unwrap(), None);
            assert_eq!(cx.optional_field::<String>(&map, "phone").unwrap(), None);
            assert_eq!(cx.field_or::<i64>(&map, "age", || 7).unwrap(), 7);
            assert_eq!(cx.field::<Option<String>>(&map, "phone").unwrap(), None);

            let err = cx.field::<i64>(&map, "name").unwrap_err();
            assert_eq!(
                err.to_string(),
                "type mismatch at $.name: expected i64, found string",
            );
            assert!(matches!(
                cx.field::<i64>(&map, "age"),
                Err(MapError::MissingField { .. })
            ));
        });
    }

    #[test]
    fn class_rendering_and_hashing() {
        let mapper = Mapper::new();
        mapper.register::<Person>();

        let judy = Person::judy();
        assert_eq!(mapper.as_string(&judy), "Person(name: Judy, age: 7, email: null)");

        let mut older = judy.clone();
        assert_eq!(mapper.hash(&judy), mapper.hash(&older));
        older.age += 1;
        assert!(!mapper.equals(&judy, &older));
        assert_ne!(mapper.hash(&judy), mapper.hash(&older));
    }

    #[cfg(feature = "json")]
    #[test]
    fn round_trip_through_text() {
        let mapper = Mapper::new();
        mapper.register::<Person>();
        let judy = Person {
            email: Some("judy@example.com".into()),
            ..Person::judy()
        };

        let text = mapper.encode_to_text(&judy).unwrap();
        assert_eq!(text, r#"{"name":"Judy","age":7,"email":"judy@example.com"}"#);
        assert_eq!(mapper.decode_from_text::<Person>(&text).unwrap(), judy);

        let err = mapper.decode_from_text::<Person>(r#"{"name":"Judy"}"#).unwrap_err();
        assert_eq!(err.to_string(), "missing field `age` at $");
        assert!(matches!(
            mapper.decode_from_text::<Person>("{"),
            Err(MapError::Text(_))
        ));
    }

    #[test]
    fn generic_names_from_data() {
        let mapper = Mapper::new();
        mapper.register::<Person>();

        let people = vec![Person::judy()];
        let mut by_name = alloc::collections::BTreeMap::new();
        by_name.insert(String::from("judy"), Person::judy());
        let held: Dynamic = Box::new(by_name);

        let encoded = mapper.encode(&held).unwrap();
        assert_eq!(
            encoded.as_map().unwrap().get("__type"),
            Some(&Value::from("Map<String, Person>")),
        );
        let decoded = mapper.decode_dynamic(&encoded).unwrap();
        assert!(mapper.equals(&decoded, &held));

        let list = mapper.lookup_by_name("List<Person>").unwrap();
        assert!(list.info().is::<Vec<Person>>());
        let encoded = mapper.encode(&people).unwrap();
        let decoded = mapper.with_context(|cx| cx.decode_with(&list, &encoded)).unwrap();
        assert_eq!(decoded.downcast_ref::<Vec<Person>>(), Some(&people));
    }

    #[test]
    fn unmapped_properties() {
        let class = crate::convert::ClassInfo::new()
            .with_fields([crate::convert::FieldInfo::new("name")]);
        let hook = UnmappedPropertiesHook::for_class("extra", &class).with_known("type");

        let mut map = Mapping::new();
        map.insert("name", "Judy");
        map.insert("type", "Cat");
        map.insert("age", 7);

        let Ok(Hooked::Encoded(Value::Map(moved))) = hook.before_decode(Value::Map(map)) else {
            panic!("mapping expected");
        };
        assert_eq!(moved.len(), 3);
        let extra = moved.get("extra").and_then(Value::as_map).unwrap();
        assert_eq!(extra.get("age"), Some(&Value::Int(7)));
        assert!(extra.get("type").is_none());
    }

    /// Type arguments of a generic target: a concrete argument in the
    /// target wins, an open one (`Dynamic`) takes the argument named by the
    /// mapping's type marker, and a slot value's own marker beats both.
    #[test]
    fn open_type_arguments_follow_the_marker() {
        use alloc::collections::BTreeMap;

        let mapper = Mapper::new();
        mapper.register::<Person>();
        mapper.register::<Wrapper<Dynamic>>();
        register_animals(&mapper);

        let held: Dynamic = Box::new(BTreeMap::from([(String::from("judy"), Person::judy())]));
        let encoded = mapper.encode(&held).unwrap();
        let map = encoded.as_map().unwrap();
        assert_eq!(map.get("__type"), Some(&Value::from("Map<String, Person>")));

        let open = mapper.decode::<BTreeMap<String, Dynamic>>(&encoded).unwrap();
        assert_eq!(open["judy"].downcast_ref::<Person>(), Some(&Person::judy()));
        let typed = mapper.decode::<BTreeMap<String, Person>>(&encoded).unwrap();
        assert_eq!(typed["judy"], Person::judy());

        // Without a marker, or with one of another base, slots stay untyped.
        for marker in [None, Some("List<Person>"), Some("Map<String, Unknown>")] {
            let mut map = map.clone();
            map.remove("__type");
            if let Some(marker) = marker {
                map.insert("__type", marker);
            }
            let plain = mapper.decode::<BTreeMap<String, Dynamic>>(&Value::Map(map)).unwrap();
            assert!(plain["judy"].is::<BTreeMap<String, Dynamic>>(), "{marker:?}");
        }

        // A slot's own marker wins.
        let mut map = map.clone();
        let mut tom = Mapping::new();
        tom.insert("name", "Tom");
        tom.insert("color", "Grey");
        tom.insert("__type", "Cat");
        map.insert("tom", Value::Map(tom));
        let mixed = mapper.decode::<BTreeMap<String, Dynamic>>(&Value::Map(map)).unwrap();
        assert!(mixed["judy"].is::<Person>());
        assert!(mixed["tom"].is::<Cat>());

        // Generic classes, also behind an open field.
        let mut wrapped = Mapping::new();
        wrapped.insert("inner", mapper.encode(&Person::judy()).unwrap());
        wrapped.insert("__type", "Wrapper<Person>");
        let decoded = mapper.decode::<Wrapper<Dynamic>>(&Value::Map(wrapped.clone())).unwrap();
        assert_eq!(decoded.inner.downcast_ref::<Person>(), Some(&Person::judy()));

        let mut outer = Mapping::new();
        outer.insert("inner", Value::Map(wrapped));
        outer.insert("__type", "Wrapper<Person>");
        let nested = mapper.decode::<Wrapper<Dynamic>>(&Value::Map(outer)).unwrap();
        let inner = nested.inner.downcast_ref::<Wrapper<Dynamic>>().unwrap();
        assert_eq!(inner.inner.downcast_ref::<Person>(), Some(&Person::judy()));
    }
}
