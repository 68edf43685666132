use alloc::string::String;

use crate::convert::{ClassInfo, Context};
use crate::error::MapResult;
use crate::info::TypeInfo;
use crate::mappable::{Dynamic, Mappable};
use crate::poly::FamilyTable;
use crate::value::Value;

/// Object-safe converter for one type.
///
/// Values cross this boundary as `dyn Mappable`. A converter handed a value
/// of another type reports [`MapError::TypeMismatch`](crate::MapError::TypeMismatch)
/// rather than panicking; [`Erased`](crate::convert::Erased) takes care of
/// that for typed converters.
///
/// Hooks and discriminators are applied by the [`Context`] around these
/// methods, a converter only handles its own shape.
pub trait Converter: Send + Sync + 'static {
    fn type_info(&self) -> &'static TypeInfo;

    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<Dynamic>;

    fn encode(&self, value: &dyn Mappable, cx: &Context<'_>) -> MapResult<Value>;

    fn equals(&self, a: &dyn Mappable, b: &dyn Mappable, cx: &Context<'_>) -> bool;

    /// Must agree with [`equals`](Converter::equals): equal values hash equally.
    fn hash(&self, value: &dyn Mappable, cx: &Context<'_>) -> u64;

    fn stringify(&self, value: &dyn Mappable, cx: &Context<'_>) -> String;

    /// Parent reference, class hooks and fields, for class converters.
    fn class_info(&self) -> Option<&ClassInfo> {
        None
    }

    /// Discriminator table, for polymorphic family converters.
    fn family(&self) -> Option<&dyn FamilyTable> {
        None
    }
}
