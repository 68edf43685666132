use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;

use log::trace;

use crate::convert::{ClassInfo, Context, Converter, TypeFactory};
use crate::error::{MapError, MapResult};
use crate::hooks::HookChain;
use crate::info::TypeInfo;
use crate::mappable::{Dynamic, MapType, Mappable};
use crate::poly::{Discriminator, DiscriminatorTable};
use crate::registry::TypeMeta;
use crate::value::Value;

// -----------------------------------------------------------------------------
// FamilyTable

/// Object-safe view of a family, used to merge discriminators on encode.
pub trait FamilyTable: Send + Sync {
    /// Discriminator key of the family, `None` for the mapper default.
    fn key(&self) -> Option<&str>;

    /// Discriminator of a direct subtype.
    fn discriminator_of(&self, subtype: TypeId) -> Option<&Discriminator>;

    fn table(&self) -> &DiscriminatorTable;
}

// -----------------------------------------------------------------------------
// Family

type Wrap<F> = Box<dyn Fn(Dynamic) -> MapResult<F> + Send + Sync>;

/// A polymorphic family: a handle type `F` (usually `Box<dyn Trait>`) and the
/// concrete subtypes it can hold.
///
/// Each subtype is registered separately with a converter whose
/// [`ClassInfo`] names `F` as parent. Decoding `F` reads the discriminator
/// property, picks the subtype and wraps its decoded value into `F`.
/// Encoding `F` encodes the held value, merging in its discriminator.
///
/// Family hooks run once around the whole conversion, before the subtype
/// is selected. Decoding a subtype directly runs them around the subtype's
/// own hooks instead.
///
/// # Examples
///
/// ```
/// use mc_mapper::poly::{Discriminator, Family};
///
/// # use mc_mapper::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind};
/// # use mc_mapper::{MapType, Mappable};
/// trait Shape: Mappable {}
///
/// #[derive(Clone)]
/// struct Circle;
/// impl Shape for Circle {}
/// # impl MapType for Circle {
/// #     fn type_info() -> &'static TypeInfo {
/// #         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
/// #         CELL.get_or_init(|| TypeInfo::new::<Circle>("Circle", TypeKind::Class))
/// #     }
/// # }
///
/// # impl Clone for Box<dyn Shape> { fn clone(&self) -> Self { unimplemented!() } }
/// # impl MapType for Box<dyn Shape> {
/// #     fn type_info() -> &'static TypeInfo {
/// #         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
/// #         CELL.get_or_init(|| TypeInfo::new::<Box<dyn Shape>>("Shape", TypeKind::Family))
/// #     }
/// # }
/// let family = Family::<Box<dyn Shape>>::new(|shape| &**shape)
///     .with_key("kind")
///     .subtype::<Circle>(Discriminator::value("circle"), |c| Box::new(c));
///
/// assert_eq!(family.table().len(), 1);
/// ```
pub struct Family<F: MapType> {
    key: Option<Cow<'static, str>>,
    table: DiscriminatorTable,
    wraps: Vec<Wrap<F>>,
    as_inner: fn(&F) -> &dyn Mappable,
    class: ClassInfo,
}

impl<F: MapType> Family<F> {
    /// Starts a family. `as_inner` exposes the concrete value held by a handle.
    pub fn new(as_inner: fn(&F) -> &dyn Mappable) -> Self {
        Self {
            key: None,
            table: DiscriminatorTable::new(),
            wraps: Vec::new(),
            as_inner,
            class: ClassInfo::new(),
        }
    }

    /// Discriminator key for this family, instead of the mapper default.
    pub fn with_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Class-level hooks shared by every subtype, run outside their own.
    pub fn with_hooks(mut self, hooks: HookChain) -> Self {
        self.class = self.class.with_hooks(hooks);
        self
    }

    /// Makes this family a subtype of another family.
    pub fn with_parent<P: ?Sized + 'static>(mut self) -> Self {
        self.class = self.class.with_parent::<P>();
        self
    }

    /// Adds a subtype `S` recognised by `discriminator`, wrapped into `F` by `wrap`.
    pub fn subtype<S: MapType>(mut self, discriminator: Discriminator, wrap: fn(S) -> F) -> Self {
        self.table.push(S::type_info(), discriminator);
        self.wraps.push(Box::new(move |decoded: Dynamic| {
            decoded.take::<S>().map(wrap).map_err(|other| {
                MapError::mismatch(S::type_info().name(), (*other).rust_type_name())
            })
        }));
        self
    }

    #[inline]
    pub fn table(&self) -> &DiscriminatorTable {
        &self.table
    }

    /// Checks the discriminators and builds the registry entry for `F`.
    pub fn into_type_meta(self) -> MapResult<TypeMeta> {
        self.table.validate(F::type_info())?;
        let converter: Arc<dyn Converter> = Arc::new(FamilyConverter { family: self });
        Ok(TypeMeta::from_converter(converter).with_factory(TypeFactory::of::<F>()))
    }
}

// -----------------------------------------------------------------------------
// FamilyConverter

struct FamilyConverter<F: MapType> {
    family: Family<F>,
}

impl<F: MapType> FamilyConverter<F> {
    fn downcast<'v>(&self, value: &'v dyn Mappable) -> MapResult<&'v dyn Mappable> {
        match value.downcast_ref::<F>() {
            Some(handle) => Ok((self.family.as_inner)(handle)),
            None => Err(MapError::mismatch(
                F::type_info().name(),
                value.rust_type_name(),
            )),
        }
    }

    /// Subtype named by the type marker, if it is a member of this family.
    fn marked_subtype(&self, value: &Value, cx: &Context<'_>) -> Option<usize> {
        let marker = cx.marker(value.as_map()?)?;
        if marker == F::type_info().name() {
            return None;
        }
        let meta = cx.registry().resolve_name(marker).ok()?;
        let index = self.family.table.position(meta.info().id())?;
        trace!(
            "type marker `{marker}` selects subtype of `{}`",
            F::type_info().name()
        );
        Some(index)
    }
}

impl<F: MapType> FamilyTable for FamilyConverter<F> {
    fn key(&self) -> Option<&str> {
        self.family.key.as_deref()
    }

    fn discriminator_of(&self, subtype: TypeId) -> Option<&Discriminator> {
        self.family.table.get(subtype)
    }

    fn table(&self) -> &DiscriminatorTable {
        &self.family.table
    }
}

impl<F: MapType> Converter for FamilyConverter<F> {
    fn type_info(&self) -> &'static TypeInfo {
        F::type_info()
    }

    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<Dynamic> {
        let index = match self.marked_subtype(value, cx) {
            Some(index) => index,
            None => {
                let map = cx.expect_map(value)?;
                let key = self
                    .family
                    .key
                    .as_deref()
                    .unwrap_or(cx.options().discriminator_key());
                self.family.table.resolve(key, map)?
            }
        };

        let Some(subtype) = self.family.table.subtypes().nth(index) else {
            return Err(MapError::unknown_type(F::type_info().name()));
        };
        let meta = cx.meta_by_id(subtype.id(), subtype.name())?;
        let decoded = cx.decode_member(TypeId::of::<F>(), meta, value)?;
        let handle = (self.family.wraps[index])(decoded)?;
        Ok(Box::new(handle))
    }

    fn encode(&self, value: &dyn Mappable, cx: &Context<'_>) -> MapResult<Value> {
        let inner = self.downcast(value)?;
        cx.encode_member(TypeId::of::<F>(), inner)
    }

    fn equals(&self, a: &dyn Mappable, b: &dyn Mappable, cx: &Context<'_>) -> bool {
        match (self.downcast(a), self.downcast(b)) {
            (Ok(a), Ok(b)) => cx.equals_dynamic(a, b),
            _ => false,
        }
    }

    fn hash(&self, value: &dyn Mappable, cx: &Context<'_>) -> u64 {
        self.downcast(value)
            .map(|inner| cx.hash_dynamic(inner))
            .unwrap_or_default()
    }

    fn stringify(&self, value: &dyn Mappable, cx: &Context<'_>) -> String {
        match self.downcast(value) {
            Ok(inner) => cx.stringify_dynamic(inner),
            Err(_) => value.rust_type_name().into(),
        }
    }

    fn class_info(&self) -> Option<&ClassInfo> {
        Some(&self.family.class)
    }

    fn family(&self) -> Option<&dyn FamilyTable> {
        Some(self)
    }
}

// -----------------------------------------------------------------------------
// Tests
