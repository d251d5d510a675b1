//! Owning iteration

use crate::{Storage, Vector};
use memx::relocate::relocate;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::{fmt, ptr, slice};

/// An iterator that moves elements out of a [`Vector`]
///
/// The storage comes along with the iterator and is told it holds nothing,
/// so the live range `[front, back)` is tracked here. Inline policies keep
/// their elements inside the iterator, so the data pointer is re-read on
/// every step instead of cached.
pub struct IntoIter<T, S: Storage<T>> {
    storage: S,
    front: usize,
    back: usize,
    _marker: PhantomData<T>,
}

impl<T, S: Storage<T>> IntoIter<T, S> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[front, back)` holds the remaining live elements.
        unsafe {
            slice::from_raw_parts(self.storage.as_ptr().add(self.front), self.back - self.front)
        }
    }
}

impl<T, S: Storage<T>> IntoIterator for Vector<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T, S>;

    fn into_iter(self) -> IntoIter<T, S> {
        let mut storage = self.into_storage();
        let back = storage.len();
        // SAFETY: The iterator takes over responsibility for the elements.
        unsafe { storage.set_len(0) };
        IntoIter {
            storage,
            front: 0,
            back,
            _marker: PhantomData,
        }
    }
}

impl<T, S: Storage<T>> Iterator for IntoIter<T, S> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        let i = self.front;
        self.front += 1;
        // SAFETY: Slot `i` was live and is now outside the tracked range.
        Some(unsafe { relocate(self.storage.as_ptr().add(i)) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<T, S: Storage<T>> DoubleEndedIterator for IntoIter<T, S> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: Slot `back` was live and is now outside the tracked range.
        Some(unsafe { relocate(self.storage.as_ptr().add(self.back)) })
    }
}

impl<T, S: Storage<T>> ExactSizeIterator for IntoIter<T, S> {}

impl<T, S: Storage<T>> FusedIterator for IntoIter<T, S> {}

impl<T, S: Storage<T>> Drop for IntoIter<T, S> {
    fn drop(&mut self) {
        let remaining = self.back - self.front;
        // SAFETY: Only the untaken range is still live. The storage reports
        //         length zero, so it frees the buffer without dropping again.
        unsafe {
            let rest = self.storage.as_mut_ptr().add(self.front);
            ptr::drop_in_place(slice::from_raw_parts_mut(rest, remaining));
        }
    }
}

impl<T: fmt::Debug, S: Storage<T>> fmt::Debug for IntoIter<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

#[cfg(test)]
mod test {
    use crate::{InlineVec, Vector};

    #[test]
    fn both_ends() {
        let v: Vector<u32> = (1..=5).collect();
        let mut it = v.into_iter();
        assert_eq!(it.next(), Some(1));
        assert_eq!(it.next_back(), Some(5));
        assert_eq!(it.len(), 3);
        assert_eq!(it.as_slice(), &[2, 3, 4]);
        assert_eq!(it.collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn inline_survives_moves() {
        let v: InlineVec<String, 4> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let it = v.into_iter();
        let moved = Box::new(it);
        assert_eq!(moved.rev().collect::<Vec<_>>(), ["c", "b", "a"]);
    }
}
