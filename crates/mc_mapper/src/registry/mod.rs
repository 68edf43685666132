//! The type registry.
//!
//! ## Menu
//!
//! - [`TypeMeta`]: one entry, a type's static info, its converter and its
//!   optional [`TypeFactory`](crate::convert::TypeFactory).
//! - [`GetTypeMeta`]: how a type builds its own entry.
//! - [`TypeRegistry`]: `TypeId` to entry, plus name lookup for type markers.
//!
//! A type registered twice keeps the most recent entry. Names are indexed
//! for marker lookup; when two different types share a name the name becomes
//! ambiguous and lookups by that name fail.

// -----------------------------------------------------------------------------
// Modules

mod type_meta;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::TypeRegistry;
