//! Built-in converters.
//!
//! Every type here implements [`MapType`](crate::MapType) with a fallback
//! entry, so it resolves without registration. The registry is still seeded
//! with the scalars and the untyped containers, see
//! [`TypeRegistry::new`](crate::registry::TypeRegistry::new).
//!
//! ## Implemented Menu
//!
//! | Rust type                    | Name               | Encoded form         |
//! |------------------------------|--------------------|----------------------|
//! | `bool`                       | `bool`             | boolean              |
//! | `i8`-`i64`, `isize`          | same               | integer              |
//! | `u8`-`u64`, `usize`          | same               | integer (`<= i64::MAX`) |
//! | `f32`, `f64`                 | same               | float, integers accepted |
//! | `char`                       | `char`             | one-char string      |
//! | `String`                     | `String`           | string               |
//! | `()`                         | `()`               | null                 |
//! | `Option<T>`                  | `Option<T>`        | null or `T`          |
//! | `Vec<T>`                     | `List<T>`          | sequence             |
//! | `HashSet<T>` (`mc_utils`)    | `Set<T>`           | sequence             |
//! | `BTreeSet<T>`                | `SortedSet<T>`     | sequence             |
//! | `BTreeMap<String, T>`        | `Map<String, T>`   | mapping              |
//! | `HashMap<String, T>` (`mc_utils`) | `HashMap<String, T>` | mapping    |
//! | `Arc<T>`                     | `Arc<T>`           | as `T`               |
//! | [`Dynamic`](crate::Dynamic)  | `Dynamic`          | any                  |
//! | [`Value`](crate::Value), [`Mapping`](crate::Mapping) | same | itself  |
//!
//! [`EnumConverter`] covers unit-like enums, which are registered like classes.

// -----------------------------------------------------------------------------
// Modules

mod arc;
mod dynamic;
mod enums;
mod list;
mod map;
mod option;
mod primitives;
mod set;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use arc::ArcConverter;
pub use dynamic::DynamicConverter;
pub use enums::EnumConverter;
pub use list::ListConverter;
pub use map::{BTreeMapConverter, HashMapConverter};
pub use option::OptionConverter;
pub use primitives::{Scalar, ScalarConverter};
pub use set::{BTreeSetConverter, HashSetConverter};
pub use value::{MappingConverter, ValueConverter};

// -----------------------------------------------------------------------------
// Shared

use alloc::string::String;

/// Renders `open item, item close`.
fn join(open: char, items: impl IntoIterator<Item = String>, close: char) -> String {
    let mut out = String::new();
    out.push(open);
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&item);
    }
    out.push(close);
    out
}

/// Shorthand for a static fallback entry of a non-generic type.
macro_rules! static_fallback {
    ($ty:ty) => {{
        static META: ::std::sync::OnceLock<$crate::registry::TypeMeta> =
            ::std::sync::OnceLock::new();
        Some(META.get_or_init(<$ty as $crate::registry::GetTypeMeta>::get_type_meta))
    }};
}

/// Shorthand for a static fallback entry of a generic type.
macro_rules! generic_fallback {
    ($ty:ty) => {{
        static CELL: $crate::info::GenericTypeCell<$crate::registry::TypeMeta> =
            $crate::info::GenericTypeCell::new();
        Some(CELL.get_or_insert::<$ty>(<$ty as $crate::registry::GetTypeMeta>::get_type_meta))
    }};
}

pub(crate) use {generic_fallback, static_fallback};
