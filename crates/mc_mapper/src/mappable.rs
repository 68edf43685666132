use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::TypeInfo;
use crate::registry::TypeMeta;

// -----------------------------------------------------------------------------
// Mappable

/// An object-safe view of any value the mapper can hold.
///
/// Implemented for every `Clone + Send + Sync + 'static` type, so it never
/// needs a manual impl.
///
/// Be careful with `Box<dyn Mappable>`: the box itself is also `Mappable`,
/// call methods on `*boxed` to reach the inner value.
pub trait Mappable: Any + Send + Sync {
    /// The [`TypeId`] of the concrete value.
    fn ty_id(&self) -> TypeId;

    /// Clones the concrete value into a new [`Dynamic`].
    fn clone_mappable(&self) -> Dynamic;

    /// The compiler's name for the concrete type, for diagnostics.
    fn rust_type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync + Clone> Mappable for T {
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    #[inline]
    fn clone_mappable(&self) -> Dynamic {
        Box::new(self.clone())
    }

    #[inline]
    fn rust_type_name(&self) -> &'static str {
        core::any::type_name::<T>()
    }
}

/// An owned value of any mappable type, the open ("any") type of the mapper.
pub type Dynamic = Box<dyn Mappable>;

impl Clone for Box<dyn Mappable> {
    #[inline]
    fn clone(&self) -> Self {
        (**self).clone_mappable()
    }
}

impl fmt::Debug for dyn Mappable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dyn Mappable<{}>", self.rust_type_name())
    }
}

impl dyn Mappable {
    /// Returns `true` if the concrete value is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }

    /// Moves the concrete value out, or hands the box back unchanged.
    pub fn take<T: Any>(self: Box<Self>) -> Result<T, Box<Self>> {
        if !self.is::<T>() {
            return Err(self);
        }
        let any: Box<dyn Any> = self;
        match any.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => unreachable!("type id was checked above"),
        }
    }
}

// -----------------------------------------------------------------------------
// MapType

/// Static side of a mappable type.
///
/// `Mappable` is what the engine holds at runtime, `MapType` is what typed
/// entry points such as [`Mapper::decode`](crate::Mapper::decode) need.
///
/// # Implementing
///
/// Classes implement [`type_info`](MapType::type_info) and leave
/// [`fallback_meta`](MapType::fallback_meta) as `None`, their converter is
/// registered separately. Built-in scalars and containers return a fallback
/// so that they resolve even when the registry has no entry for them.
pub trait MapType: Mappable + Clone {
    fn type_info() -> &'static TypeInfo;

    /// Registry entry used when the registry has none for this type.
    fn fallback_meta() -> Option<&'static TypeMeta> {
        None
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use super::Dynamic;

    #[test]
    fn box_reports_inner_type() {
        let value: Dynamic = Box::new(String::from("judy"));
        assert!(value.is::<String>());
        assert!(!value.is::<Dynamic>());
        assert_eq!((*value).ty_id(), core::any::TypeId::of::<String>());
    }

    #[test]
    fn clone_and_take() {
        let value: Dynamic = Box::new(7_i64);
        let copy = value.clone();
        assert_eq!(copy.take::<i64>().unwrap(), 7);
        let back = value.take::<String>().unwrap_err();
        assert_eq!(back.downcast_ref::<i64>(), Some(&7));
    }
}
