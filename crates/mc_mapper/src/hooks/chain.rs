use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::error::{MapError, MapResult};
use crate::hooks::{Hook, Hooked};
use crate::info::{TypeInfo, TypeKind};
use crate::mappable::{Dynamic, Mappable};
use crate::value::Value;

// -----------------------------------------------------------------------------
// HookChain

/// Hooks applied around one conversion, outermost first.
///
/// Hooks added later nest inside the ones added before them. A chain is
/// built once; cloning it shares the hooks.
#[derive(Clone, Default)]
pub struct HookChain {
    hooks: Vec<Arc<dyn Hook>>,
}

impl HookChain {
    #[inline]
    pub const fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Appends `hook` as the innermost hook.
    #[inline]
    pub fn with(self, hook: impl Hook) -> Self {
        self.with_shared(Arc::new(hook))
    }

    /// Appends an already shared hook as the innermost hook.
    #[inline]
    pub fn with_shared(mut self, hook: Arc<dyn Hook>) -> Self {
        self.hooks.push(hook);
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Hooks from outermost to innermost.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Arc<dyn Hook>> {
        self.hooks.iter()
    }

    /// Nests `inner` inside this chain.
    pub(crate) fn nest(&mut self, inner: &HookChain) {
        self.hooks.extend(inner.hooks.iter().cloned());
    }

    /// Runs `core` inside the decode stages of the chain.
    ///
    /// `target` is the type `core` produces, a `before_decode` stage that
    /// returns an already decoded value must return that type. For a
    /// `Dynamic` target any value is accepted and boxed once more.
    pub fn decode(
        &self,
        value: Value,
        target: &TypeInfo,
        core: &mut dyn FnMut(Value) -> MapResult<Dynamic>,
    ) -> MapResult<Dynamic> {
        run_decode(&self.hooks, value, target, core)
    }

    /// Runs `core` inside the encode stages of the chain.
    pub fn encode(
        &self,
        value: Dynamic,
        core: &mut dyn FnMut(&dyn Mappable) -> MapResult<Value>,
    ) -> MapResult<Value> {
        run_encode(&self.hooks, value, core)
    }
}

impl FromIterator<Arc<dyn Hook>> for HookChain {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Hook>>>(iter: I) -> Self {
        Self {
            hooks: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for HookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain")
            .field("len", &self.hooks.len())
            .finish()
    }
}

fn run_decode(
    hooks: &[Arc<dyn Hook>],
    value: Value,
    target: &TypeInfo,
    core: &mut dyn FnMut(Value) -> MapResult<Dynamic>,
) -> MapResult<Dynamic> {
    let Some((hook, inner)) = hooks.split_first() else {
        return core(value);
    };

    let decoded = match hook.before_decode(value)? {
        Hooked::Encoded(value) => run_decode(inner, value, target, core)?,
        Hooked::Decoded(decoded) => {
            if (*decoded).ty_id() == target.id() {
                decoded
            } else if target.kind() == TypeKind::Dynamic {
                Box::new(decoded)
            } else {
                return Err(MapError::mismatch(target.name(), (*decoded).rust_type_name()));
            }
        }
    };

    hook.after_decode(decoded)
}

fn run_encode(
    hooks: &[Arc<dyn Hook>],
    value: Dynamic,
    core: &mut dyn FnMut(&dyn Mappable) -> MapResult<Value>,
) -> MapResult<Value> {
    let Some((hook, inner)) = hooks.split_first() else {
        return core(&*value);
    };

    let encoded = match hook.before_encode(value)? {
        Hooked::Decoded(value) => run_encode(inner, value, core)?,
        Hooked::Encoded(encoded) => encoded,
    };

    hook.after_encode(encoded)
}

// -----------------------------------------------------------------------------
// Tests
