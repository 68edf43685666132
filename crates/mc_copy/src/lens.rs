use alloc::boxed::Box;
use core::fmt;

/// A borrowed value plus the continuation that receives its replacement.
///
/// `T` is the part of the value this lens addresses, `R` is what the whole
/// lens chain finally produces, usually the updated root value. Every
/// terminal operation consumes the lens and feeds one new `T` into the
/// continuation, which rebuilds the enclosing values level by level.
///
/// # Examples
///
/// ```
/// use mc_copy::CopyLens;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Point { x: i32, y: i32 }
///
/// let p = Point { x: 1, y: 2 };
/// let moved = CopyLens::root(&p)
///     .focus(|p| &p.x, |p, x| Point { x, ..p.clone() })
///     .apply(|x| x + 10);
///
/// assert_eq!(moved, Point { x: 11, y: 2 });
/// assert_eq!(p, Point { x: 1, y: 2 });
/// ```
pub struct CopyLens<'a, T, R> {
    value: &'a T,
    result: Box<dyn FnOnce(T) -> R + 'a>,
}

impl<'a, T: 'a> CopyLens<'a, T, T> {
    /// A lens over the whole of `value`, returning the new value as is.
    #[inline]
    pub fn root(value: &'a T) -> Self {
        Self::new(value, |new| new)
    }
}

impl<'a, T: 'a, R: 'a> CopyLens<'a, T, R> {
    #[inline]
    pub fn new(value: &'a T, result: impl FnOnce(T) -> R + 'a) -> Self {
        Self {
            value,
            result: Box::new(result),
        }
    }

    /// The current value.
    #[inline]
    pub fn value(&self) -> &'a T {
        self.value
    }

    /// Replaces the addressed value.
    #[inline]
    pub fn set(self, value: T) -> R {
        (self.result)(value)
    }

    /// Replaces the addressed value with `f` of the current one.
    #[inline]
    pub fn apply(self, f: impl FnOnce(&'a T) -> T) -> R {
        let new = f(self.value);
        (self.result)(new)
    }

    /// Feeds the current value back unchanged, through the whole chain.
    pub fn keep(self) -> R
    where
        T: Clone,
    {
        let current = self.value.clone();
        (self.result)(current)
    }

    /// Steps into a part of the value.
    ///
    /// `get` borrows the part, `set` builds a new `T` from the current one
    /// with the part replaced. The nested lens hands that new `T` to this
    /// lens's continuation.
    pub fn focus<U: 'a>(
        self,
        get: impl FnOnce(&'a T) -> &'a U,
        set: impl FnOnce(&'a T, U) -> T + 'a,
    ) -> CopyLens<'a, U, R> {
        let Self { value, result } = self;
        CopyLens::new(get(value), move |part| result(set(value, part)))
    }

    /// Steps into a part that may not be there, such as one subtype held by
    /// a family handle. Hands the lens back when `get` finds nothing.
    pub fn try_focus<U: 'a>(
        self,
        get: impl FnOnce(&'a T) -> Option<&'a U>,
        set: impl FnOnce(&'a T, U) -> T + 'a,
    ) -> Result<CopyLens<'a, U, R>, Self> {
        let Some(part) = get(self.value) else {
            return Err(self);
        };
        let Self { value, result } = self;
        Ok(CopyLens::new(part, move |part| result(set(value, part))))
    }

    /// Post-composes `f` onto the result.
    pub fn chain<S: 'a>(self, f: impl FnOnce(R) -> S + 'a) -> CopyLens<'a, T, S> {
        let Self { value, result } = self;
        CopyLens::new(value, move |new| f(result(new)))
    }
}

impl<T: fmt::Debug, R> fmt::Debug for CopyLens<'_, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyLens")
            .field("value", self.value)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::CopyLens;

    #[derive(Clone, Debug, PartialEq)]
    struct Inner {
        a: i32,
        b: String,
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Outer {
        inner: Inner,
        c: bool,
    }

    fn outer() -> Outer {
        Outer {
            inner: Inner {
                a: 1,
                b: "b".into(),
            },
            c: true,
        }
    }

    #[test]
    fn keep_is_identity() {
        let value = outer();
        assert_eq!(CopyLens::root(&value).keep(), value);
    }

    #[test]
    fn nested_set_rebuilds_every_level() {
        let value = outer();
        let updated = CopyLens::root(&value)
            .focus(|o| &o.inner, |o, inner| Outer { inner, ..o.clone() })
            .focus(|i| &i.a, |i, a| Inner { a, ..i.clone() })
            .set(5);

        assert_eq!(updated.inner.a, 5);
        assert_eq!(updated.inner.b, value.inner.b);
        assert_eq!(updated.c, value.c);
        assert_eq!(value.inner.a, 1);
    }

    #[test]
    fn try_focus_hands_the_lens_back() {
        let value = (Some(1), 2);
        let first = CopyLens::root(&value)
            .try_focus(|v| v.0.as_ref(), |v, a| (Some(a), v.1))
            .ok()
            .unwrap()
            .set(5);
        assert_eq!(first, (Some(5), 2));

        let empty: (Option<i32>, i32) = (None, 2);
        let lens = CopyLens::root(&empty)
            .try_focus(|v| v.0.as_ref(), |v, a| (Some(a), v.1))
            .err()
            .unwrap();
        assert_eq!(lens.apply(|v| (v.0, 3)), (None, 3));
    }

    #[test]
    fn chain_post_composes() {
        let value = outer();
        let flag = CopyLens::root(&value)
            .chain(|o| o.c)
            .apply(|o| Outer { c: false, ..o.clone() });
        assert!(!flag);
    }
}
