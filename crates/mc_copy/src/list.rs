use alloc::vec::Vec;

use crate::{CopyLens, Copyable};

/// Lens over a `Vec`.
///
/// Untouched elements are cloned into the new list, so elements held in
/// `Arc` keep their allocation.
pub struct ListLens<'a, T, R> {
    lens: CopyLens<'a, Vec<T>, R>,
}

impl<'a, T: Clone + 'a, R: 'a> ListLens<'a, T, R> {
    #[inline]
    pub fn new(lens: CopyLens<'a, Vec<T>, R>) -> Self {
        Self { lens }
    }

    #[inline]
    pub fn value(&self) -> &'a [T] {
        self.lens.value()
    }

    #[inline]
    pub fn into_lens(self) -> CopyLens<'a, Vec<T>, R> {
        self.lens
    }

    /// Lens over the element at `index`, `None` if out of range.
    pub fn at(self, index: usize) -> Option<CopyLens<'a, T, R>> {
        let item = self.lens.value().get(index)?;
        Some(
            self.lens
                .focus(move |_| item, move |list, item| replaced(list, index, item)),
        )
    }

    /// Object lens over the element at `index`, `None` if out of range.
    #[inline]
    pub fn at_with(self, index: usize) -> Option<T::Lens<'a, R>>
    where
        T: Copyable,
    {
        self.at(index).map(T::lens_from)
    }

    #[inline]
    pub fn replace(self, list: Vec<T>) -> R {
        self.lens.set(list)
    }

    pub fn add(self, item: T) -> R {
        self.apply(|list| {
            let mut out = Vec::with_capacity(list.len() + 1);
            out.extend_from_slice(list);
            out.push(item);
            out
        })
    }

    pub fn add_all(self, items: impl IntoIterator<Item = T>) -> R {
        self.apply(|list| list.iter().cloned().chain(items).collect())
    }

    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(self, index: usize, item: T) -> R {
        self.apply(|list| {
            let mut out = list.to_vec();
            out.insert(index, item);
            out
        })
    }

    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove_at(self, index: usize) -> R {
        self.apply(|list| {
            let mut out = list.to_vec();
            out.remove(index);
            out
        })
    }

    pub fn remove_where(self, mut predicate: impl FnMut(&T) -> bool) -> R {
        self.apply(|list| list.iter().filter(|item| !predicate(item)).cloned().collect())
    }

    /// Replaces the list with `f` of the current one.
    pub fn apply(self, f: impl FnOnce(&'a [T]) -> Vec<T>) -> R {
        self.lens.apply(|list| f(list))
    }
}

fn replaced<T: Clone>(list: &[T], index: usize, item: T) -> Vec<T> {
    let mut out = Vec::with_capacity(list.len());
    out.extend_from_slice(&list[..index]);
    out.push(item);
    out.extend_from_slice(&list[index + 1..]);
    out
}

// -----------------------------------------------------------------------------
// Tests
