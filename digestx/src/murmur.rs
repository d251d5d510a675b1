//! MurmurHash3, x64 variant with 128-bit output
//!
//! This matches Austin Appleby's public domain `MurmurHash3_x64_128`
//! bit for bit, including its little-endian block loads. The reference
//! function is one-shot. Here partial blocks are buffered so input can
//! arrive in pieces of any size.
//!
//! The first 16 output bytes are the standard digest: `h1` then `h2`, each
//! little-endian. Output beyond that continues in counter mode, mixing the
//! finalized lanes with a block counter through the same `fmix64` finalizer.

use crate::{HashAlgorithm, SeedableAlgorithm};
use arrayvec::ArrayVec;

/// Block size in bytes
const BLOCK: usize = 16;

/// Multiplier applied to the first lane of each block
const C1: u64 = 0x87c3_7b91_1142_53d5;
/// Multiplier applied to the second lane of each block
const C2: u64 = 0x4cf5_ad43_2745_937f;

/// Final avalanche of one 64-bit lane
#[inline(always)]
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;
    k
}

/// Premix of the first lane's input word
#[inline(always)]
fn mix_k1(k1: u64) -> u64 {
    k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2)
}

/// Premix of the second lane's input word
#[inline(always)]
fn mix_k2(k2: u64) -> u64 {
    k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1)
}

/// Little-endian load of up to eight bytes, zero-extended
#[inline(always)]
fn load_le(bytes: &[u8]) -> u64 {
    let mut word = [0_u8; 8];
    word[..bytes.len()].copy_from_slice(bytes);
    u64::from_le_bytes(word)
}

/// Output phase state
#[derive(Clone, Debug)]
struct Squeeze {
    /// Finalized lanes, the standard 128-bit digest
    lanes: [u64; 2],
    /// Bytes of the current output block
    block: [u8; BLOCK],
    /// Read position within `block`
    pos: usize,
    /// Index of the current output block
    counter: u64,
}

impl Squeeze {
    /// Start the output stream at the standard digest.
    fn new(h1: u64, h2: u64) -> Self {
        let mut squeeze = Self {
            lanes: [h1, h2],
            block: [0; BLOCK],
            pos: 0,
            counter: 0,
        };
        squeeze.fill_block();
        squeeze
    }

    /// Compute the bytes of block `counter`.
    fn fill_block(&mut self) {
        let [h1, h2] = self.lanes;
        let (a, b) = if self.counter == 0 {
            (h1, h2)
        } else {
            let a = fmix64(h1 ^ self.counter.wrapping_mul(C1));
            let b = fmix64(h2 ^ self.counter.wrapping_mul(C2));
            let a = a.wrapping_add(b);
            (a, b.wrapping_add(a))
        };
        self.block[..8].copy_from_slice(&a.to_le_bytes());
        self.block[8..].copy_from_slice(&b.to_le_bytes());
    }

    /// Copy the next bytes of the stream into `out`.
    fn read(&mut self, mut out: &mut [u8]) {
        while !out.is_empty() {
            if self.pos == BLOCK {
                self.counter = self.counter.wrapping_add(1);
                self.fill_block();
                self.pos = 0;
            }
            let n = out.len().min(BLOCK - self.pos);
            out[..n].copy_from_slice(&self.block[self.pos..self.pos + n]);
            self.pos += n;
            out = &mut out[n..];
        }
    }
}

/// Incremental MurmurHash3 x64/128 state
#[derive(Clone, Debug)]
pub struct Murmur3 {
    /// First hash lane
    h1: u64,
    /// Second hash lane
    h2: u64,
    /// Total number of bytes absorbed
    len: u64,
    /// Partial block carried between updates
    tail: ArrayVec<u8, BLOCK>,
    /// Present once output has begun
    squeeze: Option<Squeeze>,
}

impl Murmur3 {
    /// A state with the given seed in both lanes.
    pub fn new(seed: u64) -> Self {
        Self {
            h1: seed,
            h2: seed,
            len: 0,
            tail: ArrayVec::new(),
            squeeze: None,
        }
    }

    /// Mix one full block into both lanes.
    #[inline(always)]
    fn block(&mut self, block: &[u8]) {
        let k1 = load_le(&block[..8]);
        let k2 = load_le(&block[8..BLOCK]);

        self.h1 ^= mix_k1(k1);
        self.h1 = self
            .h1
            .rotate_left(27)
            .wrapping_add(self.h2)
            .wrapping_mul(5)
            .wrapping_add(0x52dc_e729);

        self.h2 ^= mix_k2(k2);
        self.h2 = self
            .h2
            .rotate_left(31)
            .wrapping_add(self.h1)
            .wrapping_mul(5)
            .wrapping_add(0x3849_5ab5);
    }

    /// Mix the tail and length, returning the finalized lanes.
    fn finalize(&self) -> (u64, u64) {
        let (mut h1, mut h2) = (self.h1, self.h2);
        let tail = self.tail.as_slice();
        if tail.len() > 8 {
            h2 ^= mix_k2(load_le(&tail[8..]));
        }
        if !tail.is_empty() {
            h1 ^= mix_k1(load_le(&tail[..tail.len().min(8)]));
        }

        h1 ^= self.len;
        h2 ^= self.len;
        h1 = h1.wrapping_add(h2);
        h2 = h2.wrapping_add(h1);
        h1 = fmix64(h1);
        h2 = fmix64(h2);
        h1 = h1.wrapping_add(h2);
        h2 = h2.wrapping_add(h1);
        (h1, h2)
    }

    /// The output stream, finalizing on first use.
    fn squeeze(&mut self) -> &mut Squeeze {
        let squeeze = match self.squeeze.take() {
            Some(squeeze) => squeeze,
            None => {
                let (h1, h2) = self.finalize();
                Squeeze::new(h1, h2)
            }
        };
        self.squeeze.insert(squeeze)
    }
}

impl Default for Murmur3 {
    fn default() -> Self {
        Self::new(0)
    }
}

impl HashAlgorithm for Murmur3 {
    fn update(&mut self, mut bytes: &[u8]) {
        assert!(
            self.squeeze.is_none(),
            "Murmur3 cannot absorb input after output has begun"
        );
        self.len = self.len.wrapping_add(bytes.len() as u64);

        if !self.tail.is_empty() {
            let room = self.tail.remaining_capacity();
            let (head, rest) = bytes.split_at(bytes.len().min(room));
            self.tail.extend(head.iter().copied());
            bytes = rest;
            if !self.tail.is_full() {
                return;
            }
            let block = self.tail.take();
            self.block(&block);
        }

        let mut blocks = bytes.chunks_exact(BLOCK);
        for block in &mut blocks {
            self.block(block);
        }
        // The tail is empty here and the remainder is shorter than a block.
        self.tail.extend(blocks.remainder().iter().copied());
    }

    fn output(&mut self, out: &mut [u8]) {
        self.squeeze().read(out);
    }

    /// The low 64 bits of the standard digest, regardless of how much output
    /// has been read.
    fn finish(&mut self) -> u64 {
        self.squeeze().lanes[0]
    }
}

impl SeedableAlgorithm for Murmur3 {
    fn with_seed(seed: u64) -> Self {
        Self::new(seed)
    }
}

#[cfg(test)]
mod test {
    use super::{fmix64, Murmur3};
    use crate::HashAlgorithm;

    const FOX: &[u8] = b"The quick brown fox jumps over the lazy dog";

    fn one_shot(data: &[u8]) -> [u8; 16] {
        let mut h = Murmur3::default();
        h.update(data);
        let mut out = [0; 16];
        h.output(&mut out);
        out
    }

    #[test]
    fn fmix_fixes_zero() {
        assert_eq!(fmix64(0), 0);
    }

    #[test]
    fn split_feeding_matches_one_shot() {
        let expected = one_shot(FOX);
        for split in 0..FOX.len() {
            for second in split..FOX.len() {
                let mut h = Murmur3::default();
                h.update(&FOX[..split]);
                h.update(&FOX[split..second]);
                h.update(&FOX[second..]);
                let mut out = [0; 16];
                h.output(&mut out);
                assert_eq!(out, expected, "split at {} and {}", split, second);
            }
        }
    }

    #[test]
    fn stream_continues_past_digest() {
        let mut whole = Murmur3::default();
        whole.update(FOX);
        let mut long = [0_u8; 40];
        whole.output(&mut long);
        assert_eq!(long[..16], one_shot(FOX));

        let mut pieces = Murmur3::default();
        pieces.update(FOX);
        let mut parts = [0_u8; 40];
        pieces.output(&mut parts[..3]);
        pieces.output(&mut parts[3..21]);
        pieces.output(&mut parts[21..]);
        assert_eq!(parts, long);
        assert_ne!(long[16..32], long[..16]);
    }

    #[test]
    fn finish_is_low_lane() {
        let mut h = Murmur3::default();
        h.update(FOX);
        let digest = one_shot(FOX);
        let low = u64::from_le_bytes(digest[..8].try_into().expect("eight bytes"));
        assert_eq!(h.finish(), low);
        assert_eq!(low, 0xe34bbc7bbc071b6c);
    }

    #[test]
    #[should_panic]
    fn update_after_output() {
        let mut h = Murmur3::default();
        h.finish();
        h.update(b"late");
    }
}
