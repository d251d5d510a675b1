//! FNV-1a with 64-bit state
//!
//! A byte-at-a-time multiply-xor pump. Cheap to construct and good enough for
//! short keys; its output is just the accumulator, so it is idempotent.

use crate::{HashAlgorithm, SeedableAlgorithm};

/// 64-bit FNV offset basis
const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// 64-bit FNV prime
const PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a hash state with a 64-bit accumulator
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Fnv1a64 {
    /// Running accumulator
    state: u64,
}

impl Fnv1a64 {
    /// A state that has absorbed nothing.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            state: OFFSET_BASIS,
        }
    }
}

impl Default for Fnv1a64 {
    fn default() -> Self {
        Self::new()
    }
}

impl HashAlgorithm for Fnv1a64 {
    #[inline]
    fn update(&mut self, bytes: &[u8]) {
        let mut state = self.state;
        for &byte in bytes {
            state ^= u64::from(byte);
            state = state.wrapping_mul(PRIME);
        }
        self.state = state;
    }

    /// Writes the accumulator as little-endian bytes. Positions past the
    /// eighth byte are zero.
    fn output(&mut self, out: &mut [u8]) {
        let bytes = self.state.to_le_bytes();
        let n = out.len().min(bytes.len());
        out[..n].copy_from_slice(&bytes[..n]);
        out[n..].fill(0);
    }

    #[inline(always)]
    fn finish(&mut self) -> u64 {
        self.state
    }
}

impl SeedableAlgorithm for Fnv1a64 {
    /// Feeds the eight little-endian seed bytes as the first input.
    fn with_seed(seed: u64) -> Self {
        let mut hasher = Self::new();
        hasher.update(&seed.to_le_bytes());
        hasher
    }
}

#[cfg(test)]
mod test {
    use super::Fnv1a64;
    use crate::{HashAlgorithm, SeedableAlgorithm};

    #[test]
    fn output_is_idempotent() {
        let mut h = Fnv1a64::new();
        h.update(b"foobar");
        let mut first = [0_u8; 12];
        let mut second = [0xff_u8; 12];
        h.output(&mut first);
        h.output(&mut second);
        assert_eq!(first, second);
        assert_eq!(&first[8..], &[0, 0, 0, 0]);
        assert_eq!(h.finish(), 0x85944171f73967e8);
    }

    #[test]
    fn seed_is_a_prefix() {
        let mut seeded = Fnv1a64::with_seed(0x0102_0304_0506_0708);
        seeded.update(b"x");
        let mut manual = Fnv1a64::new();
        manual.update(&[8, 7, 6, 5, 4, 3, 2, 1, b'x']);
        assert_eq!(seeded, manual);
    }
}
