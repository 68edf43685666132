use alloc::vec::Vec;
use core::any::TypeId;

use crate::hooks::{Hook, HookChain};

// -----------------------------------------------------------------------------
// FieldInfo

/// One mapped field of a class.
#[derive(Clone)]
pub struct FieldInfo {
    name: &'static str,
    key: &'static str,
    hooks: HookChain,
}

impl FieldInfo {
    /// A field encoded under its own name.
    #[inline]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            key: name,
            hooks: HookChain::new(),
        }
    }

    /// Encodes the field under `key` instead of its name.
    #[inline]
    pub fn with_key(mut self, key: &'static str) -> Self {
        self.key = key;
        self
    }

    /// Field-level hooks. They are not inherited by subclasses.
    #[inline]
    pub fn with_hooks(mut self, hooks: HookChain) -> Self {
        self.hooks = hooks;
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn key(&self) -> &'static str {
        self.key
    }

    #[inline]
    pub fn hooks(&self) -> &HookChain {
        &self.hooks
    }
}

// -----------------------------------------------------------------------------
// ClassInfo

/// Metadata a class converter exposes to the engine.
///
/// The parent is an explicit reference to the supertype's registry entry.
/// The engine follows it to collect inherited class hooks and to merge the
/// discriminators of every enclosing family when encoding.
#[derive(Clone, Default)]
pub struct ClassInfo {
    parent: Option<TypeId>,
    hooks: HookChain,
    fields: Vec<FieldInfo>,
}

impl ClassInfo {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the supertype, usually a family handle such as `Box<dyn Animal>`.
    #[inline]
    pub fn with_parent<P: ?Sized + 'static>(self) -> Self {
        self.with_parent_id(TypeId::of::<P>())
    }

    #[inline]
    pub fn with_parent_id(mut self, parent: TypeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Class-level hooks, inherited by subclasses.
    #[inline]
    pub fn with_hooks(mut self, hooks: HookChain) -> Self {
        self.hooks = hooks;
        self
    }

    /// Appends one class-level hook, nested inside those added before it.
    #[inline]
    pub fn with_hook(mut self, hook: impl Hook) -> Self {
        self.hooks = self.hooks.with(hook);
        self
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldInfo>) -> Self {
        self.fields.extend(fields);
        self
    }

    #[inline]
    pub fn parent(&self) -> Option<TypeId> {
        self.parent
    }

    #[inline]
    pub fn hooks(&self) -> &HookChain {
        &self.hooks
    }

    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }
}
