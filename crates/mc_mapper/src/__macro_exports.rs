//! Items used by exported macros. Not public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::registry::{GetTypeMeta, TypeRegistry};

    /// One link-time registration function.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    pub trait __RegisterType {
        fn __register(registry: &mut TypeRegistry);
    }

    impl<T: GetTypeMeta> __RegisterType for T {
        #[inline]
        fn __register(registry: &mut TypeRegistry) {
            registry.register::<T>();
        }
    }

    pub fn __register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}

/// Registers types with every [`Mapper`](crate::Mapper) created afterwards.
///
/// Takes types implementing [`GetTypeMeta`](crate::registry::GetTypeMeta),
/// or `fn path` for a registration function of signature
/// `fn(&mut TypeRegistry)`, which is how families and hand-written entries
/// take part. Non-generic items only, at module level.
///
/// Without the `auto_register` feature this expands to nothing.
///
/// # Examples
///
/// ```ignore
/// mc_mapper::impl_auto_register!(Person, Address);
/// mc_mapper::impl_auto_register!(fn register_animals);
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! impl_auto_register {
    (fn $func:path) => {
        const _: () = {
            $crate::__macro_exports::auto_register::inventory::submit! {
                $crate::__macro_exports::auto_register::__AutoRegisterFunc($func)
            }
        };
    };
    ($($ty:ty),+ $(,)?) => {
        $(
            const _: () = {
                $crate::__macro_exports::auto_register::inventory::submit! {
                    $crate::__macro_exports::auto_register::__AutoRegisterFunc(
                        <$ty as $crate::__macro_exports::auto_register::__RegisterType>::__register
                    )
                }
            };
        )+
    };
}

#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! impl_auto_register {
    ($($tt:tt)*) => {};
}
