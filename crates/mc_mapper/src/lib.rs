#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Crates

// Requires `std` for its locks. Everything `alloc` or `core` provides is used
// from there, as in the `no_std` member crates.
extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod mappable;

pub mod convert;
pub mod hooks;
pub mod impls;
pub mod info;
pub mod mapper;
pub mod poly;
pub mod registry;
pub mod value;

#[cfg(test)]
mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use error::{ErrorPath, MapError, MapResult, PathSegment};
pub use mappable::{Dynamic, MapType, Mappable};
pub use mapper::{Mapper, MapperOptions, TypeMarkerPolicy, global};
pub use value::{Mapping, Value};
