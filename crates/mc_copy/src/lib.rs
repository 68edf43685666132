#![doc = include_str!("../README.md")]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod copyable;
mod field;
mod lens;
mod list;
mod map;

// -----------------------------------------------------------------------------
// Top-level exports

pub use copyable::Copyable;
pub use field::Field;
pub use lens::CopyLens;
pub use list::ListLens;
pub use map::{LensMap, MapLens};
