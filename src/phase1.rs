use ark_bn254::{G1Affine, G2Affine};

use crate::utils::PublicKey;

/// Universal powers-of-τ parameters produced by the phase 1 ceremony.
///
/// For a domain of size `n`:
/// * `tau_g1[i] = [τⁱ]₁` for `i ∈ [0, 2n−2]`
/// * `alpha_tau_g1[i] = [ατⁱ]₁` and `beta_tau_g1[i] = [βτⁱ]₁` for `i ∈ [0, n−1]`
/// * `tau_g2[i] = [τⁱ]₂` for `i ∈ [0, n−1]`
/// * `beta_g2 = [β]₂`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase1Parameters {
    pub tau_g1: Vec<G1Affine>,
    pub alpha_tau_g1: Vec<G1Affine>,
    pub beta_tau_g1: Vec<G1Affine>,
    pub tau_g2: Vec<G2Affine>,
    pub beta_g2: G2Affine,
}

/// Proofs of knowledge for the last τ, α and β contributions, carried along
/// from phase 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase1PublicKeys {
    pub tau: PublicKey,
    pub alpha: PublicKey,
    pub beta: PublicKey,
}

/// Output of the universal phase 1 ceremony, consumed read-only when
/// specializing to a circuit. This crate only deserializes and reads it;
/// running phase 1 itself is out of scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase1 {
    pub parameters: Phase1Parameters,
    pub public_keys: Phase1PublicKeys,
    pub hash: [u8; 32],
}

impl Phase1 {
    /// Domain size `n` supported by this SRS.
    pub fn size(&self) -> usize {
        self.parameters.alpha_tau_g1.len()
    }
}
