use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{TypeId, type_name};
use core::fmt;

// -----------------------------------------------------------------------------
// TypeKind

/// The shape a type takes in the encoded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Scalar such as `bool`, `i64` or `String`.
    Primitive,
    /// The open type, `Box<dyn Mappable>`.
    Dynamic,
    List,
    Set,
    Map,
    Option,
    /// Transparent wrapper such as `Arc<T>`.
    Pointer,
    /// A class encoded as a mapping of its fields.
    Class,
    /// A unit enum encoded as a scalar.
    Enum,
    /// A polymorphic family selected by a discriminator.
    Family,
    /// The encoded form itself, `Value` or `Mapping`, passed through as is.
    Encoded,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// The maximum number of type arguments a [`TypeInfo`] records.
pub const MAX_TYPE_ARGS: usize = 5;

/// Static information about a mappable type.
///
/// Obtained from [`MapType::type_info`](crate::MapType::type_info). Names are
/// short and user facing (`Person`, `List<Person>`), they are what the
/// runtime-type marker carries in encoded data.
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
    ident: &'static str,
    kind: TypeKind,
    args: Box<[&'static TypeInfo]>,
    rust_name: &'static str,
}

impl TypeInfo {
    /// Information for a type without type arguments.
    pub fn new<T: 'static + ?Sized>(name: &'static str, kind: TypeKind) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name,
            ident: name,
            kind,
            args: Box::new([]),
            rust_name: type_name::<T>(),
        }
    }

    /// Information for a generic type, named `ident<arg, ...>`.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_TYPE_ARGS`] arguments are given.
    pub fn generic<T: 'static + ?Sized>(
        ident: &'static str,
        kind: TypeKind,
        args: &[&'static TypeInfo],
    ) -> Self {
        assert!(
            args.len() <= MAX_TYPE_ARGS,
            "`{ident}` has {} type arguments, at most {MAX_TYPE_ARGS} are supported",
            args.len(),
        );

        let name = if args.is_empty() {
            ident
        } else {
            let mut parts: Vec<&str> = Vec::with_capacity(args.len() * 2 + 2);
            parts.push(ident);
            parts.push("<");
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    parts.push(", ");
                }
                parts.push(arg.name());
            }
            parts.push(">");
            concat(&parts)
        };

        Self {
            id: TypeId::of::<T>(),
            name,
            ident,
            kind,
            args: args.into(),
            rust_name: type_name::<T>(),
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full name including type arguments.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name without type arguments.
    #[inline]
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    pub fn args(&self) -> &[&'static TypeInfo] {
        &self.args
    }

    /// The compiler's name for the type, only meant for diagnostics.
    #[inline]
    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    #[inline]
    pub fn is<T: 'static + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("rust_name", &self.rust_name)
            .finish()
    }
}

impl PartialEq for TypeInfo {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

// -----------------------------------------------------------------------------
// concat

/// Concatenates the parts into a leaked `&'static str`.
///
/// Meant for names built once per type and stored in a static cell.
pub fn concat(parts: &[&str]) -> &'static str {
    let len = parts.iter().map(|s| s.len()).sum();
    let mut name = String::with_capacity(len);
    for part in parts {
        name.push_str(part);
    }
    name.leak()
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::{TypeInfo, TypeKind};
    use crate::MapType;

    #[test]
    fn generic_names() {
        let string = String::type_info();
        let info = TypeInfo::generic::<Vec<String>>("List", TypeKind::List, &[string]);

        assert_eq!(info.name(), "List<String>");
        assert_eq!(info.ident(), "List");
        assert_eq!(info.args().len(), 1);
        assert!(info.is::<Vec<String>>());
    }

    #[test]
    fn built_in_names() {
        assert_eq!(<Vec<Option<i64>>>::type_info().name(), "List<Option<i64>>");
        assert_eq!(
            <alloc::collections::BTreeMap<String, bool>>::type_info().name(),
            "Map<String, bool>",
        );
    }

    #[test]
    #[should_panic(expected = "at most 5")]
    fn too_many_arguments() {
        let i = i64::type_info();
        let _ = TypeInfo::generic::<()>("Wide", TypeKind::Class, &[i, i, i, i, i, i]);
    }
}
