//! Hooks around decode and encode.
//!
//! ## Menu
//!
//! - [`Hook`]: four optional stages, `before_decode`, `after_decode`,
//!   `before_encode` and `after_encode`.
//! - [`Hooked`]: what a `before_*` stage hands on, either a value still to be
//!   converted or an already converted one that skips the rest of the chain.
//! - [`HookChain`]: an immutable list of hooks nested outer to inner.
//! - [`UnmappedPropertiesHook`]: collects mapping keys a class does not map.
//!
//! ## Ordering
//!
//! A chain `[a, b]` runs as a bracket around the core conversion:
//!
//! ```text
//! a.before -> b.before -> core -> b.after -> a.after
//! ```
//!
//! Class hooks are inherited: the chain of a class is its parents' hooks,
//! outermost ancestor first, followed by its own. Field hooks are never
//! inherited.
//!
//! If a `before_decode` stage already produces a value of the target type,
//! the inner stages and the core decode are skipped and the value continues
//! with the `after_decode` stages of that hook and every hook outside it.
//! `before_encode` returning an encoded value short-circuits the same way.

// -----------------------------------------------------------------------------
// Modules

mod chain;
mod hook;
mod unmapped;

// -----------------------------------------------------------------------------
// Exports

pub use chain::HookChain;
pub use hook::{Hook, Hooked};
pub use unmapped::UnmappedPropertiesHook;
