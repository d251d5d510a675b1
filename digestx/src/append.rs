//! Feeding values into a hash algorithm
//!
//! [`HashAppend`] is the customization point: a type describes which bytes
//! represent its value, and any [`HashAlgorithm`] can absorb them. Types whose
//! value is exactly their object representation opt in through
//! [`ContiguouslyHashable`] and are fed as one run of bytes, which also lets
//! a slice of them be fed in a single call.
//!
//! Variable-length sequences feed their length before their elements, so
//! `["ab", "c"]` and `["a", "bc"]` hash differently. Fixed-size arrays do not,
//! since their length is part of the type.

use crate::HashAlgorithm;
use bytemuck::NoUninit;

/// A type that can be fed into a [`HashAlgorithm`]
pub trait HashAppend {
    /// Feed the bytes representing `self`.
    fn hash_append<H: HashAlgorithm + ?Sized>(&self, hasher: &mut H);

    /// Feed every element of a slice, without a length prefix.
    ///
    /// Contiguously hashable types override this with a single byte feed.
    #[inline]
    fn hash_append_slice<H: HashAlgorithm + ?Sized>(items: &[Self], hasher: &mut H)
    where
        Self: Sized,
    {
        for item in items {
            item.hash_append(hasher);
        }
    }
}

/// Marker for types whose value is a function solely of their bytes
///
/// Implementing this makes a type hash as its raw object representation.
/// The [`NoUninit`] bound guarantees there are no padding bytes to read.
///
/// # Safety
///
/// Two values must compare equal exactly when their object representations
/// are identical. Floating point types break this (`0.0 == -0.0`, and NaN is
/// unequal to itself) and must not implement it.
pub unsafe trait ContiguouslyHashable: NoUninit {}

/// Implement [`ContiguouslyHashable`] for a list of primitive types
macro_rules! contiguous {
    ($($t:ty),*) => {
        $(
            // SAFETY: Integer-like primitives compare by value, and each value
            //         has exactly one representation.
            unsafe impl ContiguouslyHashable for $t {}
        )*
    };
}

contiguous!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char, ());

impl<T: ContiguouslyHashable> HashAppend for T {
    #[inline(always)]
    fn hash_append<H: HashAlgorithm + ?Sized>(&self, hasher: &mut H) {
        hasher.update(bytemuck::bytes_of(self));
    }

    #[inline(always)]
    fn hash_append_slice<H: HashAlgorithm + ?Sized>(items: &[Self], hasher: &mut H) {
        if std::mem::size_of::<T>() != 0 {
            hasher.update(bytemuck::cast_slice(items));
        }
    }
}

impl HashAppend for str {
    #[inline]
    fn hash_append<H: HashAlgorithm + ?Sized>(&self, hasher: &mut H) {
        self.len().hash_append(hasher);
        hasher.update(self.as_bytes());
    }
}

impl HashAppend for String {
    /// Same bytes as the equivalent `str`, so borrowed lookups agree.
    #[inline]
    fn hash_append<H: HashAlgorithm + ?Sized>(&self, hasher: &mut H) {
        self.as_str().hash_append(hasher);
    }
}

impl<T: HashAppend> HashAppend for [T] {
    #[inline]
    fn hash_append<H: HashAlgorithm + ?Sized>(&self, hasher: &mut H) {
        self.len().hash_append(hasher);
        T::hash_append_slice(self, hasher);
    }
}

impl<T: HashAppend> HashAppend for Vec<T> {
    #[inline]
    fn hash_append<H: HashAlgorithm + ?Sized>(&self, hasher: &mut H) {
        self.as_slice().hash_append(hasher);
    }
}

impl<T: HashAppend, const N: usize> HashAppend for [T; N] {
    #[inline]
    fn hash_append<H: HashAlgorithm + ?Sized>(&self, hasher: &mut H) {
        T::hash_append_slice(self, hasher);
    }
}

impl<T: HashAppend> HashAppend for Option<T> {
    fn hash_append<H: HashAlgorithm + ?Sized>(&self, hasher: &mut H) {
        match self {
            None => 0_u8.hash_append(hasher),
            Some(value) => {
                1_u8.hash_append(hasher);
                value.hash_append(hasher);
            }
        }
    }
}

/// Implement [`HashAppend`] for tuples, feeding each field in order
macro_rules! tuple {
    ($($name:ident)+) => {
        impl<$($name: HashAppend),+> HashAppend for ($($name,)+) {
            #[allow(non_snake_case)]
            fn hash_append<HH: HashAlgorithm + ?Sized>(&self, hasher: &mut HH) {
                let ($($name,)+) = self;
                $($name.hash_append(hasher);)+
            }
        }
    };
}

tuple!(A);
tuple!(A B);
tuple!(A B C);
tuple!(A B C D);

#[cfg(test)]
mod test {
    use super::HashAppend;
    use crate::{Fnv1a64, HashAlgorithm};

    /// Records everything fed to it
    #[derive(Default)]
    struct Tape(Vec<u8>);

    impl HashAlgorithm for Tape {
        fn update(&mut self, bytes: &[u8]) {
            self.0.extend_from_slice(bytes);
        }

        fn output(&mut self, out: &mut [u8]) {
            out.fill(0);
        }
    }

    fn tape<T: HashAppend + ?Sized>(value: &T) -> Vec<u8> {
        let mut t = Tape::default();
        value.hash_append(&mut t);
        t.0
    }

    #[test]
    fn integers_feed_native_bytes() {
        assert_eq!(tape(&0x0102_u16), 0x0102_u16.to_ne_bytes());
        assert_eq!(tape(&true), [1]);
    }

    #[test]
    fn strings_prefix_length() {
        let mut expected = 3_usize.to_ne_bytes().to_vec();
        expected.extend_from_slice(b"abc");
        assert_eq!(tape("abc"), expected);
        assert_eq!(tape(&String::from("abc")), expected);
    }

    #[test]
    fn sequences_are_length_prefixed() {
        let a = vec![String::from("ab"), String::from("c")];
        let b = vec![String::from("a"), String::from("bc")];
        assert_ne!(tape(&a), tape(&b));

        let ints = [1_u32, 2, 3];
        let mut expected = 3_usize.to_ne_bytes().to_vec();
        expected.extend(ints.iter().flat_map(|i| i.to_ne_bytes()));
        assert_eq!(tape(&ints[..]), expected);
        assert_eq!(tape(&ints), expected[std::mem::size_of::<usize>()..]);
    }

    #[test]
    fn tuples_and_options() {
        assert_eq!(tape(&(1_u8, 2_u8)), [1, 2]);
        assert_eq!(tape(&None::<u8>), [0]);
        assert_eq!(tape(&Some(9_u8)), [1, 9]);
    }

    #[test]
    fn works_through_dyn() {
        let mut fnv = Fnv1a64::new();
        let dynamic: &mut dyn HashAlgorithm = &mut fnv;
        "key".hash_append(dynamic);
        let mut direct = Fnv1a64::new();
        "key".hash_append(&mut direct);
        assert_eq!(fnv, direct);
    }
}
