//! The converter protocol.
//!
//! ## Menu
//!
//! - [`Converter`]: object-safe per-type bundle of decode, encode, equality,
//!   hash and stringify. The registry stores these.
//! - [`TypedConverter`]: the same contract over a concrete `T`, what generated
//!   converters implement. [`Erased`] adapts one into a [`Converter`].
//! - [`Context`]: registry access handed to converters, with helpers for
//!   nested values and class fields.
//! - [`ClassInfo`], [`FieldInfo`]: explicit parent reference, class hooks and
//!   field table of a class converter.
//! - [`TypeFactory`], [`GenericShape`]: builds container converters over a
//!   type that is only known from data.

// -----------------------------------------------------------------------------
// Modules

mod class;
mod context;
mod converter;
mod factory;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use class::{ClassInfo, FieldInfo};
pub use context::{ClassString, Context};
pub use converter::Converter;
pub use factory::{GenericShape, TypeFactory};
pub use typed::{Erased, TypedConverter};
