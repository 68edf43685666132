//! Static type information.
//!
//! ## Menu
//!
//! - [`TypeInfo`]: identity, registered name and type arguments of a mappable type.
//!     - [`name`](TypeInfo::name): full name, e.g. `List<Person>`, used by the type marker.
//!     - [`ident`](TypeInfo::ident): name without type arguments, e.g. `List`.
//! - [`TypeKind`]: the shape a type's converter produces.
//! - [`NonGenericTypeInfoCell`], [`GenericTypeCell`]: static storage used by `MapType` impls.
//! - [`TypeName`]: parsed form of a type name found in encoded data.
//! - [`concat`]: builds a leaked `&'static str` for generic names.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod type_info;
mod type_name;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeCell, GenericTypeInfoCell, NonGenericTypeInfoCell};
pub use type_info::{MAX_TYPE_ARGS, TypeInfo, TypeKind, concat};
pub use type_name::TypeName;
