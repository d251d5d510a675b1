//! Cross-check the sponge against the `sha3` crate over many input lengths

use digestx::{HashAlgorithm, Keccak256, Sha3_224, Sha3_256, Sha3_384, Sha3_512, Shake256};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

/// Inputs of every length around the rate boundaries
fn inputs() -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    (0..400)
        .map(|len| (0..len).map(|_| rng.gen()).collect())
        .collect()
}

fn ours<A: HashAlgorithm + Default>(data: &[u8], out_len: usize) -> Vec<u8> {
    let mut h = A::default();
    // Split the input to exercise the partial-word path
    let mid = data.len() / 3;
    h.update(&data[..mid]);
    h.update(&data[mid..]);
    let mut out = vec![0; out_len];
    h.output(&mut out);
    out
}

fn oracle<D: sha3::Digest>(data: &[u8]) -> Vec<u8> {
    D::digest(data).to_vec()
}

#[test]
fn fixed_length_digests() {
    for data in inputs() {
        assert_eq!(ours::<Sha3_224>(&data, 28), oracle::<sha3::Sha3_224>(&data));
        assert_eq!(ours::<Sha3_256>(&data, 32), oracle::<sha3::Sha3_256>(&data));
        assert_eq!(ours::<Sha3_384>(&data, 48), oracle::<sha3::Sha3_384>(&data));
        assert_eq!(ours::<Sha3_512>(&data, 64), oracle::<sha3::Sha3_512>(&data));
        assert_eq!(ours::<Keccak256>(&data, 32), oracle::<sha3::Keccak256>(&data));
    }
}

#[test]
fn extendable_output() {
    use sha3::digest::{ExtendableOutput, Update, XofReader};

    for data in inputs().iter().step_by(7) {
        let mut reference = sha3::Shake256::default();
        reference.update(data);
        let mut expected = vec![0; 300];
        reference.finalize_xof().read(&mut expected);
        assert_eq!(ours::<Shake256>(data, 300), expected);
    }
}
