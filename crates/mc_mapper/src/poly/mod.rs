//! Polymorphic families selected by a discriminator property.
//!
//! ## Menu
//!
//! - [`Discriminator`]: how one subtype is recognised: a scalar value, the
//!   null sentinel, the default marker or a custom check.
//! - [`DiscriminatorTable`]: the subtypes of a family and the resolution
//!   algorithm, see [`DiscriminatorTable::resolve`].
//! - [`Family`]: builder for a family handle type such as `Box<dyn Animal>`.
//! - [`FamilyTable`]: object-safe view the engine uses to merge
//!   discriminators while encoding.
//!
//! ## Encoding
//!
//! A subtype's converter does not write its own discriminator. The engine
//! follows the subtype's [`ClassInfo::parent`](crate::convert::ClassInfo::parent)
//! reference to the family entry and merges `{key: value}` into the encoded
//! mapping, once per enclosing family. A subtype with the null sentinel
//! writes `{key: null}` unless [`with_encode_null_discriminator`] turned that
//! off. The default subtype writes its own type name, which no exact value
//! claims. Check subtypes write nothing.
//!
//! [`with_encode_null_discriminator`]: crate::MapperOptions::with_encode_null_discriminator

// -----------------------------------------------------------------------------
// Modules

mod discriminator;
mod family;

// -----------------------------------------------------------------------------
// Exports

pub use discriminator::{Discriminator, DiscriminatorTable};
pub use family::{Family, FamilyTable};
