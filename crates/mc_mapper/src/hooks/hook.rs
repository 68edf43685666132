use crate::error::MapResult;
use crate::mappable::Dynamic;
use crate::value::Value;

/// Output of a `before_*` stage.
pub enum Hooked {
    /// An encoded value.
    Encoded(Value),
    /// A decoded value.
    Decoded(Dynamic),
}

/// A transformation around decode and encode of a class or a field.
///
/// Every stage defaults to passing its input through unchanged. A stage
/// reports failure with [`MapError::hook`](crate::MapError::hook).
///
/// # Examples
///
/// ```
/// use mc_mapper::hooks::{Hook, Hooked};
/// use mc_mapper::{MapResult, Value};
///
/// /// Accepts `"yes"`/`"no"` where a boolean is expected.
/// struct YesNo;
///
/// impl Hook for YesNo {
///     fn before_decode(&self, value: Value) -> MapResult<Hooked> {
///         Ok(Hooked::Encoded(match value.as_str() {
///             Some("yes") => Value::Bool(true),
///             Some("no") => Value::Bool(false),
///             _ => value,
///         }))
///     }
/// }
/// ```
pub trait Hook: Send + Sync + 'static {
    fn before_decode(&self, value: Value) -> MapResult<Hooked> {
        Ok(Hooked::Encoded(value))
    }

    fn after_decode(&self, value: Dynamic) -> MapResult<Dynamic> {
        Ok(value)
    }

    fn before_encode(&self, value: Dynamic) -> MapResult<Hooked> {
        Ok(Hooked::Decoded(value))
    }

    fn after_encode(&self, value: Value) -> MapResult<Value> {
        Ok(value)
    }
}
