use ark_bn254::{Bn254, Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_serialize::CanonicalSerialize;
use ark_std::UniformRand;
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

/// Personalization tags binding each proof of knowledge to the secret it
/// speaks for. Phase 1 used τ/α/β; phase 2 contributes δ.
pub const PERSONALIZATION_TAU: u8 = 1;
pub const PERSONALIZATION_ALPHA: u8 = 2;
pub const PERSONALIZATION_BETA: u8 = 3;
pub const PERSONALIZATION_DELTA: u8 = 1;

/// Schnorr-like proof of knowledge of a scalar `x` committed as `[x]₁`,
/// bound to the previous transcript hash through the challenge point `R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    /// `[s]₁` for fresh randomness `s`.
    pub s_g: G1Affine,
    /// `[s·x]₁`.
    pub sx_g: G1Affine,
    /// `[x·R]₂` where `R = gen_r(s_g, sx_g, prev_hash, personalization)`.
    pub x_r: G2Affine,
}

/// Produces the proof of knowledge of `x`, chained to `prev_hash`.
pub fn gen_public_key<R: RngCore + CryptoRng>(
    x: Fr,
    prev_hash: &[u8],
    personalization: u8,
    rng: &mut R,
) -> PublicKey {
    let s = Fr::rand(rng);
    let s_g = (G1Affine::generator() * s).into_affine();
    let sx_g = (s_g * x).into_affine();
    let r = gen_r(&s_g, &sx_g, prev_hash, personalization);
    let x_r = (r * x).into_affine();
    PublicKey { s_g, sx_g, x_r }
}

/// Deterministic challenge point: SHA-256 over
/// `s_g ‖ sx_g ‖ prev_hash ‖ personalization` seeds a ChaCha20 stream from
/// which a uniformly random G2 point is drawn. Contributor and verifier
/// recompute the same point; its discrete log stays unknown.
pub fn gen_r(s_g: &G1Affine, sx_g: &G1Affine, prev_hash: &[u8], personalization: u8) -> G2Affine {
    let mut buf = Vec::new();
    s_g.serialize_compressed(&mut buf)
        .expect("point serialization failed");
    sx_g.serialize_compressed(&mut buf)
        .expect("point serialization failed");

    let mut hasher = Sha256::new();
    hasher.update(&buf);
    hasher.update(prev_hash);
    hasher.update([personalization]);
    let seed: [u8; 32] = hasher.finalize().into();

    let mut rng = ChaCha20Rng::from_seed(seed);
    G2Projective::rand(&mut rng).into_affine()
}

/// True iff `e(a₁, a₂) == e(b₁, b₂)`, i.e. the discrete-log ratio `a₁ : b₁`
/// in G1 equals `b₂ : a₂` in G2. Identity inputs are rejected.
pub fn same_ratio(a1: G1Affine, b1: G1Affine, a2: G2Affine, b2: G2Affine) -> bool {
    if a1.is_zero() || b1.is_zero() || a2.is_zero() || b2.is_zero() {
        return false;
    }
    Bn254::pairing(a1, a2) == Bn254::pairing(b1, b2)
}

/// Collapses two equal-length vectors into one point each via a shared
/// random linear combination, so a single pairing check covers the whole
/// vector equality with overwhelming soundness. The combination scalars
/// must be fresh on every call.
pub fn merge<R: RngCore + CryptoRng>(
    a: &[G1Affine],
    b: &[G1Affine],
    rng: &mut R,
) -> (G1Affine, G1Affine) {
    debug_assert_eq!(a.len(), b.len());
    let scalars: Vec<Fr> = (0..a.len()).map(|_| Fr::rand(rng)).collect();
    let merged_a = G1Projective::msm_unchecked(a, &scalars).into_affine();
    let merged_b = G1Projective::msm_unchecked(b, &scalars).into_affine();
    (merged_a, merged_b)
}
