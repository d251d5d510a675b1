//! Known-answer vectors for each algorithm

use digestx::{
    digest, Fnv1a64, HashAlgorithm, Keccak256, Murmur3, SeedableAlgorithm, Sha3_256, Shake128,
};
use hex_literal::hex;

const FOX: &[u8] = b"The quick brown fox jumps over the lazy dog";

#[test]
fn fnv1a64() {
    let mut h = Fnv1a64::new();
    assert_eq!(h.finish(), 0xcbf29ce484222325);
    let mut h = Fnv1a64::new();
    h.update(b"a");
    assert_eq!(h.finish(), 0xaf63dc4c8601ec8c);
    assert_eq!(
        digest::<Fnv1a64, 8>(b"foobar"),
        0x85944171f73967e8_u64.to_le_bytes()
    );
}

#[test]
fn murmur3_empty() {
    assert_eq!(digest::<Murmur3, 16>(b""), [0; 16]);
}

#[test]
fn murmur3_fox() {
    assert_eq!(
        digest::<Murmur3, 16>(FOX),
        hex!("6c1b07bc7bbc4be347939ac4a93c437a")
    );
}

#[test]
fn murmur3_seed_changes_digest() {
    let mut seeded = Murmur3::with_seed(1);
    seeded.update(FOX);
    let mut out = [0; 16];
    seeded.output(&mut out);
    assert_ne!(out, digest::<Murmur3, 16>(FOX));
}

#[test]
fn sha3_256() {
    assert_eq!(
        digest::<Sha3_256, 32>(b""),
        hex!("a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a")
    );
    assert_eq!(
        digest::<Sha3_256, 32>(b"foobar"),
        hex!("09234807e4af85f17c66b48ee3bca89dffd1f1233659f9f940a2b17b0b8c6bc5")
    );
}

#[test]
fn keccak256() {
    assert_eq!(
        digest::<Keccak256, 32>(b""),
        hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
    );
}

#[test]
fn shake128() {
    assert_eq!(
        digest::<Shake128, 32>(b""),
        hex!("7f9c2ba4e88f827d616045507605853ed73b8093f6efbc88eb1a6eacfa66ef26")
    );
}
