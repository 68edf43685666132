use std::sync::LazyLock;

use crate::mapper::Mapper;

static GLOBAL: LazyLock<Mapper> = LazyLock::new(Mapper::new);

/// The process-wide mapper.
///
/// Created on first use with default options. With the `auto_register`
/// feature, every type declared through
/// [`impl_auto_register!`](crate::impl_auto_register) is registered then.
///
/// Registration through the global mapper is visible to every caller, tests
/// that change converters should build their own [`Mapper`] instead.
///
/// # Examples
///
/// ```
/// let encoded = mc_mapper::global().encode(&vec![true, false]).unwrap();
/// assert_eq!(encoded.to_string(), "[true,false]");
/// ```
#[inline]
pub fn global() -> &'static Mapper {
    &GLOBAL
}
