/// One argument of an object lens update.
///
/// `Keep` means "not provided" and leaves the field as it is. `Set(None)`
/// on an optional field clears it, which is why `Option` alone cannot stand
/// in for this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field<T> {
    Keep,
    Set(T),
}

impl<T> Default for Field<T> {
    #[inline]
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> From<T> for Field<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

impl<T> Field<T> {
    #[inline]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    #[inline]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// The new value, or a clone of `current` for `Keep`.
    #[inline]
    pub fn resolve(self, current: &T) -> T
    where
        T: Clone,
    {
        match self {
            Self::Keep => current.clone(),
            Self::Set(value) => value,
        }
    }

    #[inline]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Keep => None,
            Self::Set(value) => Some(value),
        }
    }
}
