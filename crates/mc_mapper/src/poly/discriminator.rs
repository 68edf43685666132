use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use log::debug;

use crate::error::{ErrorPath, MapError, MapResult};
use crate::info::TypeInfo;
use crate::value::{Mapping, Value};

// -----------------------------------------------------------------------------
// Discriminator

/// How a subtype is recognised inside its family.
#[derive(Clone)]
pub enum Discriminator {
    /// The discriminator property equals this scalar.
    Value(Value),
    /// The discriminator property is absent or null.
    Null,
    /// Fallback for non-null values no other subtype claims.
    Default,
    /// Custom predicate over the whole mapping, tried after exact values.
    Check(fn(&Mapping) -> bool),
}

impl Discriminator {
    /// Shorthand for [`Discriminator::Value`].
    #[inline]
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }
}

impl fmt::Debug for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "Value({v})"),
            Self::Null => f.write_str("Null"),
            Self::Default => f.write_str("Default"),
            Self::Check(_) => f.write_str("Check(..)"),
        }
    }
}

// -----------------------------------------------------------------------------
// DiscriminatorTable

/// The subtypes of one family together with their discriminators.
#[derive(Clone, Default)]
pub struct DiscriminatorTable {
    entries: Vec<(&'static TypeInfo, Discriminator)>,
}

impl DiscriminatorTable {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, subtype: &'static TypeInfo, discriminator: Discriminator) {
        self.entries.push((subtype, discriminator));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn subtypes(&self) -> impl ExactSizeIterator<Item = &'static TypeInfo> + '_ {
        self.entries.iter().map(|(info, _)| *info)
    }

    pub fn position(&self, subtype: TypeId) -> Option<usize> {
        self.entries.iter().position(|(info, _)| info.id() == subtype)
    }

    pub fn get(&self, subtype: TypeId) -> Option<&Discriminator> {
        self.entries
            .iter()
            .find(|(info, _)| info.id() == subtype)
            .map(|(_, d)| d)
    }

    /// Rejects tables where one value, the null sentinel or the default
    /// marker is claimed twice.
    ///
    /// The default subtype encodes its type name as discriminator, so no
    /// other subtype may claim that name as its value.
    pub fn validate(&self, family: &'static TypeInfo) -> MapResult<()> {
        for (i, (first, a)) in self.entries.iter().enumerate() {
            for (second, b) in &self.entries[i + 1..] {
                let clash = match (a, b) {
                    (Discriminator::Value(x), Discriminator::Value(y)) if x == y => {
                        Some(x.to_string())
                    }
                    (Discriminator::Default, Discriminator::Value(v))
                        if v.as_str() == Some(first.name()) =>
                    {
                        Some(v.to_string())
                    }
                    (Discriminator::Value(v), Discriminator::Default)
                        if v.as_str() == Some(second.name()) =>
                    {
                        Some(v.to_string())
                    }
                    (Discriminator::Null, Discriminator::Null) => Some("null".into()),
                    (Discriminator::Default, Discriminator::Default) => Some("default".into()),
                    _ => None,
                };
                if let Some(value) = clash {
                    return Err(MapError::AmbiguousRegistration {
                        family: family.name(),
                        value,
                        first: first.name(),
                        second: second.name(),
                    });
                }
                if first.id() == second.id() {
                    return Err(MapError::AmbiguousRegistration {
                        family: family.name(),
                        value: alloc::format!("{a:?} and {b:?}"),
                        first: first.name(),
                        second: second.name(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Selects the subtype for `map`, returning its index.
    ///
    /// Order of preference:
    ///
    /// 1. a non-null `map[key]` equal to a registered value,
    /// 2. an absent or null `map[key]` and a subtype with [`Discriminator::Null`],
    /// 3. a [`Discriminator::Check`] predicate accepting the mapping,
    /// 4. a non-null `map[key]` and a subtype with [`Discriminator::Default`].
    ///
    /// Otherwise the result is [`MapError::UnknownDiscriminator`].
    pub fn resolve(&self, key: &str, map: &Mapping) -> MapResult<usize> {
        let found = map.get(key).filter(|v| !v.is_null());

        let exact = match found {
            Some(found) => self.find(|d| matches!(d, Discriminator::Value(v) if v == found)),
            None => self.find(|d| matches!(d, Discriminator::Null)),
        };
        if let Some(index) = exact {
            return Ok(index);
        }

        if let Some(index) = self.find(|d| matches!(d, Discriminator::Check(check) if check(map))) {
            return Ok(index);
        }

        if let Some(found) = found
            && let Some(index) = self.find(|d| matches!(d, Discriminator::Default))
        {
            debug!(
                "discriminator `{key}` = {found} unknown, decoding as default subtype `{}`",
                self.entries[index].0.name(),
            );
            return Ok(index);
        }

        Err(MapError::UnknownDiscriminator {
            path: ErrorPath::root(),
            key: String::from(key),
            value: found.cloned(),
        })
    }

    fn find(&self, pred: impl Fn(&Discriminator) -> bool) -> Option<usize> {
        self.entries.iter().position(|(_, d)| pred(d))
    }
}

impl fmt::Debug for DiscriminatorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(info, d)| (info.name(), d)))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Discriminator, DiscriminatorTable};
    use crate::mappable::MapType;
    use crate::{MapError, Mapping, Value};

    fn table() -> DiscriminatorTable {
        let mut table = DiscriminatorTable::new();
        table.push(i8::type_info(), Discriminator::value("Cat"));
        table.push(i16::type_info(), Discriminator::value(2));
        table.push(i32::type_info(), Discriminator::Null);
        table.push(i64::type_info(), Discriminator::Default);
        table
    }

    fn with_type(value: impl Into<Value>) -> Mapping {
        let mut map = Mapping::new();
        map.insert("name", "Judy");
        map.insert("type", value);
        map
    }

    #[test]
    fn exact_values_win() {
        let table = table();
        assert_eq!(table.resolve("type", &with_type("Cat")).unwrap(), 0);
        assert_eq!(table.resolve("type", &with_type(2)).unwrap(), 1);
        // `2.0` is not the integer `2`.
        assert_eq!(table.resolve("type", &with_type(2.0)).unwrap(), 3);
    }

    #[test]
    fn null_and_absent_select_the_null_sentinel() {
        let table = table();
        assert_eq!(table.resolve("type", &with_type(Value::Null)).unwrap(), 2);
        assert_eq!(table.resolve("type", &Mapping::new()).unwrap(), 2);
    }

    #[test]
    fn unknown_values_fall_back_to_default() {
        assert_eq!(table().resolve("type", &with_type("Bird")).unwrap(), 3);
    }

    #[test]
    fn null_without_sentinel_fails_even_with_default() {
        let mut table = DiscriminatorTable::new();
        table.push(i8::type_info(), Discriminator::value("Cat"));
        table.push(i64::type_info(), Discriminator::Default);

        let err = table.resolve("type", &Mapping::new()).unwrap_err();
        assert!(matches!(err, MapError::UnknownDiscriminator { value: None, .. }));
    }

    #[test]
    fn unknown_without_default_fails() {
        let mut table = DiscriminatorTable::new();
        table.push(i8::type_info(), Discriminator::value("Cat"));

        let err = table.resolve("type", &with_type("Bird")).unwrap_err();
        let MapError::UnknownDiscriminator { key, value, .. } = err else {
            panic!("unexpected error {err}");
        };
        assert_eq!(key, "type");
        assert_eq!(value, Some(Value::from("Bird")));
    }

    #[test]
    fn checks_run_after_exact_values() {
        let mut table = DiscriminatorTable::new();
        table.push(i8::type_info(), Discriminator::value("Cat"));
        table.push(i16::type_info(), Discriminator::Check(|m| m.contains_key("wings")));
        table.push(i64::type_info(), Discriminator::Default);

        let mut map = with_type("Cat");
        map.insert("wings", 2);
        assert_eq!(table.resolve("type", &map).unwrap(), 0);

        map.insert("type", "Owl");
        assert_eq!(table.resolve("type", &map).unwrap(), 1);
    }

    #[test]
    fn duplicates_are_rejected() {
        let family = <()>::type_info();
        assert!(table().validate(family).is_ok());

        let mut values = table();
        values.push(u8::type_info(), Discriminator::value("Cat"));
        let err = values.validate(family).unwrap_err();
        let MapError::AmbiguousRegistration { first, second, .. } = err else {
            panic!("unexpected error {err}");
        };
        assert_eq!((first, second), ("i8", "u8"));

        let mut defaults = table();
        defaults.push(u8::type_info(), Discriminator::Default);
        assert!(matches!(
            defaults.validate(family),
            Err(MapError::AmbiguousRegistration { .. })
        ));

        let mut named = table();
        named.push(u8::type_info(), Discriminator::value("i64"));
        assert!(matches!(
            named.validate(family),
            Err(MapError::AmbiguousRegistration { .. })
        ));

        let mut twice = table();
        twice.push(i8::type_info(), Discriminator::value("Kitten"));
        assert!(matches!(
            twice.validate(family),
            Err(MapError::AmbiguousRegistration { .. })
        ));
    }
}
