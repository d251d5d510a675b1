//! Keccak-f\[1600\] and the sponge construction built on it
//!
//! One generic [`Sponge`] covers the SHA-3 fixed-length digests, the
//! original Keccak padding and the SHAKE extendable-output functions. The
//! parameters are a security level in bits, which fixes the rate, and the
//! domain separation byte written at the start of the padding.
//!
//! State words are read and written as little-endian bytes, so digests agree
//! with FIPS 202 on every host.

use crate::{HashAlgorithm, SeedableAlgorithm};
use std::fmt;

/// Number of permutation rounds
const ROUNDS: usize = 24;

/// Size of the permutation state in bytes
const STATE_BYTES: usize = 200;

/// Iota round constants
const RC: [u64; ROUNDS] = [
    0x0000_0000_0000_0001,
    0x0000_0000_0000_8082,
    0x8000_0000_0000_808a,
    0x8000_0000_8000_8000,
    0x0000_0000_0000_808b,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8009,
    0x0000_0000_0000_008a,
    0x0000_0000_0000_0088,
    0x0000_0000_8000_8009,
    0x0000_0000_8000_000a,
    0x0000_0000_8000_808b,
    0x8000_0000_0000_008b,
    0x8000_0000_0000_8089,
    0x8000_0000_0000_8003,
    0x8000_0000_0000_8002,
    0x8000_0000_0000_0080,
    0x0000_0000_0000_800a,
    0x8000_0000_8000_000a,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8080,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8008,
];

/// Rho rotation offsets, in pi traversal order
const RHO: [u32; 24] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
];

/// Pi lane traversal order, starting after lane 1
const PI: [usize; 24] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
];

/// The Keccak-f\[1600\] permutation.
///
/// Lanes are indexed `x + 5 * y`.
pub fn keccak_f(a: &mut [u64; 25]) {
    for rc in RC {
        // Theta
        let mut c = [0_u64; 5];
        for (x, column) in c.iter_mut().enumerate() {
            *column = a[x] ^ a[x + 5] ^ a[x + 10] ^ a[x + 15] ^ a[x + 20];
        }
        for x in 0..5 {
            let d = c[(x + 4) % 5] ^ c[(x + 1) % 5].rotate_left(1);
            for y in 0..5 {
                a[5 * y + x] ^= d;
            }
        }

        // Rho and pi
        let mut last = a[1];
        for (&j, &r) in PI.iter().zip(RHO.iter()) {
            let next = a[j];
            a[j] = last.rotate_left(r);
            last = next;
        }

        // Chi
        for y in 0..5 {
            let row = [a[5 * y], a[5 * y + 1], a[5 * y + 2], a[5 * y + 3], a[5 * y + 4]];
            for x in 0..5 {
                a[5 * y + x] = row[x] ^ (!row[(x + 1) % 5] & row[(x + 2) % 5]);
            }
        }

        // Iota
        a[0] ^= rc;
    }
}

/// A Keccak sponge with `BITS` of security and padding byte `DOMAIN`
///
/// The rate is `1600 - 2 * BITS` bits. Output may be read to any length;
/// the first read applies the padding and switches to the squeeze phase.
#[derive(Clone)]
pub struct Sponge<const BITS: usize, const DOMAIN: u8> {
    /// Permutation state
    state: [u64; 25],
    /// Byte position within the rate portion of the state
    pos: usize,
    /// Set once padding has been applied
    squeezing: bool,
}

/// SHA3-224
pub type Sha3_224 = Sponge<224, 0x06>;
/// SHA3-256
pub type Sha3_256 = Sponge<256, 0x06>;
/// SHA3-384
pub type Sha3_384 = Sponge<384, 0x06>;
/// SHA3-512
pub type Sha3_512 = Sponge<512, 0x06>;
/// Keccak-256 with the original pre-standard padding
pub type Keccak256 = Sponge<256, 0x01>;
/// SHAKE128 extendable output
pub type Shake128 = Sponge<128, 0x1f>;
/// SHAKE256 extendable output
pub type Shake256 = Sponge<256, 0x1f>;

impl<const BITS: usize, const DOMAIN: u8> Sponge<BITS, DOMAIN> {
    /// Bytes absorbed or squeezed per permutation
    pub const RATE: usize = STATE_BYTES - BITS / 4;

    /// A sponge that has absorbed nothing.
    pub const fn new() -> Self {
        assert!(BITS > 0 && BITS % 32 == 0 && BITS < 800, "unsupported sponge size");
        Self {
            state: [0; 25],
            pos: 0,
            squeezing: false,
        }
    }

    /// XOR one byte into the state at byte offset `i`.
    #[inline(always)]
    fn xor_byte(&mut self, i: usize, byte: u8) {
        self.state[i / 8] ^= u64::from(byte) << (8 * (i % 8));
    }

    /// Read the state byte at byte offset `i`.
    #[inline(always)]
    fn read_byte(&self, i: usize) -> u8 {
        (self.state[i / 8] >> (8 * (i % 8))) as u8
    }

    /// Apply the padding and switch to squeezing.
    fn pad(&mut self) {
        self.xor_byte(self.pos, DOMAIN);
        self.xor_byte(Self::RATE - 1, 0x80);
        keccak_f(&mut self.state);
        self.pos = 0;
        self.squeezing = true;
    }
}

impl<const BITS: usize, const DOMAIN: u8> Default for Sponge<BITS, DOMAIN> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const BITS: usize, const DOMAIN: u8> fmt::Debug for Sponge<BITS, DOMAIN> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sponge<{}, {:#04x}> {{ pos: {}, squeezing: {} }}",
            BITS, DOMAIN, self.pos, self.squeezing
        )
    }
}

impl<const BITS: usize, const DOMAIN: u8> HashAlgorithm for Sponge<BITS, DOMAIN> {
    fn update(&mut self, mut bytes: &[u8]) {
        assert!(
            !self.squeezing,
            "sponge cannot absorb input after output has begun"
        );
        while !bytes.is_empty() {
            if self.pos % 8 == 0 && bytes.len() >= 8 {
                // Whole words at a time while aligned
                let words = ((Self::RATE - self.pos) / 8).min(bytes.len() / 8);
                let (head, rest) = bytes.split_at(words * 8);
                for (i, word) in head.chunks_exact(8).enumerate() {
                    let mut lane = [0u8; 8];
                    lane.copy_from_slice(word);
                    self.state[self.pos / 8 + i] ^= u64::from_le_bytes(lane);
                }
                self.pos += words * 8;
                bytes = rest;
            } else {
                self.xor_byte(self.pos, bytes[0]);
                self.pos += 1;
                bytes = &bytes[1..];
            }
            if self.pos == Self::RATE {
                keccak_f(&mut self.state);
                self.pos = 0;
            }
        }
    }

    fn output(&mut self, out: &mut [u8]) {
        if !self.squeezing {
            self.pad();
        }
        for byte in out {
            if self.pos == Self::RATE {
                keccak_f(&mut self.state);
                self.pos = 0;
            }
            *byte = self.read_byte(self.pos);
            self.pos += 1;
        }
    }
}

impl<const BITS: usize, const DOMAIN: u8> SeedableAlgorithm for Sponge<BITS, DOMAIN> {
    /// Absorbs the eight little-endian seed bytes before any input.
    fn with_seed(seed: u64) -> Self {
        let mut sponge = Self::new();
        sponge.update(&seed.to_le_bytes());
        sponge
    }
}
