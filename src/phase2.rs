use ark_bn254::{Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, One, Zero};
use ark_std::UniformRand;
use rand::{CryptoRng, RngCore};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use tracing::{debug, info_span};
use zeroize::Zeroize;

use crate::errors::{Result, SetupError};
use crate::lagrange::{bit_reverse, lagrange_coeffs_g1, lagrange_coeffs_g2};
use crate::phase1::Phase1;
use crate::r1cs::{Coeff, R1cs, Term};
use crate::utils::{gen_public_key, gen_r, merge, same_ratio, PublicKey, PERSONALIZATION_DELTA};

/// Proving-key tail re-randomized by every δ contribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase2Parameters {
    /// `[δ]₁`, the running product of all contributed deltas.
    pub delta_g1: G1Affine,
    /// `[δ]₂`.
    pub delta_g2: G2Affine,
    /// Per-private-wire terms `[(βAᵢ(τ) + αBᵢ(τ) + Cᵢ(τ))/δ]₁`.
    pub l: Vec<G1Affine>,
    /// `[τⁱ(τⁿ − 1)/δ]₁` for the quotient polynomial, `n−1` entries.
    pub z: Vec<G1Affine>,
}

/// Circuit-specific phase 2 state. Mutated in place by [`Phase2::contribute`],
/// chained through the transcript hash.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase2 {
    pub parameters: Phase2Parameters,
    /// Proof of knowledge of the most recent δ, bound to the previous
    /// transcript hash.
    pub public_key: PublicKey,
    pub hash: [u8; 32],
}

/// Per-wire A/B evaluations and verification-key terms, produced once at
/// initialization; no later contribution touches them.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase2Evaluations {
    pub a_g1: Vec<G1Affine>,
    pub b_g1: Vec<G1Affine>,
    pub b_g2: Vec<G2Affine>,
    /// `[βAᵢ(τ) + αBᵢ(τ) + Cᵢ(τ)]₁` for the public wires.
    pub vkk: Vec<G1Affine>,
}

fn accumulate_g1(acc: &mut G1Projective, term: &Term, base: &G1Affine, table: &[Fr]) {
    match term.coeff {
        Coeff::Zero => {}
        Coeff::One => *acc += *base,
        Coeff::MinusOne => *acc -= *base,
        Coeff::Two => {
            *acc += *base;
            *acc += *base;
        }
        Coeff::Generic(index) => *acc += *base * table[index],
    }
}

fn accumulate_g2(acc: &mut G2Projective, term: &Term, base: &G2Affine, table: &[Fr]) {
    match term.coeff {
        Coeff::Zero => {}
        Coeff::One => *acc += *base,
        Coeff::MinusOne => *acc -= *base,
        Coeff::Two => {
            *acc += *base;
            *acc += *base;
        }
        Coeff::Generic(index) => *acc += *base * table[index],
    }
}

impl Phase2 {
    /// Specializes the universal phase 1 SRS to `r1cs`, producing the
    /// identity contribution (δ = 1) together with the immutable wire
    /// evaluations.
    pub fn new<R: RngCore + CryptoRng>(
        r1cs: &R1cs,
        phase1: &Phase1,
        rng: &mut R,
    ) -> Result<(Phase2, Phase2Evaluations)> {
        let size = phase1.size();
        let _span = info_span!(
            "phase2_init",
            constraints = r1cs.num_constraints(),
            domain = size
        )
        .entered();

        r1cs.validate()?;
        if !size.is_power_of_two() {
            return Err(SetupError::DomainSize(size));
        }
        if r1cs.num_constraints() > size {
            return Err(SetupError::CircuitTooLarge {
                constraints: r1cs.num_constraints(),
                capacity: size,
            });
        }
        let srs = &phase1.parameters;
        if srs.tau_g1.len() != 2 * size - 1
            || srs.beta_tau_g1.len() != size
            || srs.tau_g2.len() != size
        {
            return Err(SetupError::Invariant("phase 1 SRS has inconsistent lengths"));
        }

        // Lagrange coefficients of [τ]₁, [τ]₂, [ατ]₁, [βτ]₁; the four runs
        // are independent.
        let ((coeff_tau1, coeff_tau2), (coeff_alpha_tau1, coeff_beta_tau1)) = rayon::join(
            || {
                rayon::join(
                    || lagrange_coeffs_g1(&srs.tau_g1, size),
                    || lagrange_coeffs_g2(&srs.tau_g2, size),
                )
            },
            || {
                rayon::join(
                    || lagrange_coeffs_g1(&srs.alpha_tau_g1, size),
                    || lagrange_coeffs_g1(&srs.beta_tau_g1, size),
                )
            },
        );
        let (coeff_tau1, coeff_tau2) = (coeff_tau1?, coeff_tau2?);
        let (coeff_alpha_tau1, coeff_beta_tau1) = (coeff_alpha_tau1?, coeff_beta_tau1?);

        let num_wires = r1cs.num_wires();
        let table = &r1cs.coefficients;
        let mut a = vec![G1Projective::zero(); num_wires];
        let mut b1 = vec![G1Projective::zero(); num_wires];
        let mut b2 = vec![G2Projective::zero(); num_wires];
        let mut beta_a = vec![G1Projective::zero(); num_wires];
        let mut alpha_b = vec![G1Projective::zero(); num_wires];
        let mut c = vec![G1Projective::zero(); num_wires];

        for (i, constraint) in r1cs.constraints.iter().enumerate() {
            for t in &constraint.l {
                accumulate_g1(&mut a[t.wire], t, &coeff_tau1[i], table);
                accumulate_g1(&mut beta_a[t.wire], t, &coeff_beta_tau1[i], table);
            }
            for t in &constraint.r {
                accumulate_g1(&mut b1[t.wire], t, &coeff_tau1[i], table);
                accumulate_g2(&mut b2[t.wire], t, &coeff_tau2[i], table);
                accumulate_g1(&mut alpha_b[t.wire], t, &coeff_alpha_tau1[i], table);
            }
            for t in &constraint.o {
                accumulate_g1(&mut c[t.wire], t, &coeff_tau1[i], table);
            }
        }

        // Z[i] = [τⁱ(τⁿ − 1)]₁ = [τ^{i+n}]₁ − [τⁱ]₁ over the evaluation
        // domain, bit-reversed to match the Lagrange coefficient order,
        // then truncated to the n−1 meaningful entries.
        let mut z = vec![G1Projective::zero(); size];
        for i in 0..size - 1 {
            z[i] = srs.tau_g1[i + size].into_group() - srs.tau_g1[i];
        }
        bit_reverse(&mut z);
        z.truncate(size - 1);
        let z = G1Projective::normalize_batch(&z);

        // K[i] = βAᵢ + αBᵢ + Cᵢ; public wires feed the verification key,
        // private wires the δ-scaled L.
        let num_public = r1cs.num_public;
        let mut l = Vec::with_capacity(num_wires - num_public);
        let mut vkk = Vec::with_capacity(num_public);
        for i in 0..num_wires {
            let k = beta_a[i] + alpha_b[i] + c[i];
            if i < num_public {
                vkk.push(k);
            } else {
                l.push(k);
            }
        }
        let l = G1Projective::normalize_batch(&l);
        let vkk = G1Projective::normalize_batch(&vkk);

        let evaluations = Phase2Evaluations {
            a_g1: G1Projective::normalize_batch(&a),
            b_g1: G1Projective::normalize_batch(&b1),
            b_g2: G2Projective::normalize_batch(&b2),
            vkk,
        };

        let mut phase2 = Phase2 {
            parameters: Phase2Parameters {
                delta_g1: G1Affine::generator(),
                delta_g2: G2Affine::generator(),
                l,
                z,
            },
            public_key: gen_public_key(Fr::one(), &[], PERSONALIZATION_DELTA, rng),
            hash: [0u8; 32],
        };
        phase2.hash = phase2.hash_contents();
        Ok((phase2, evaluations))
    }

    /// Applies a fresh δ: multiplies both deltas by it, divides L and Z by
    /// it, attaches a proof of knowledge bound to the previous transcript
    /// hash, and re-hashes. δ and δ⁻¹ are scrubbed before returning.
    pub fn contribute<R: RngCore + CryptoRng>(&mut self, rng: &mut R) {
        let _span = info_span!("phase2_contribute").entered();

        let (mut delta, mut delta_inv) = loop {
            let delta = Fr::rand(rng);
            if let Some(inv) = delta.inverse() {
                break (delta, inv);
            }
        };

        self.public_key = gen_public_key(delta, &self.hash, PERSONALIZATION_DELTA, rng);

        self.parameters.delta_g1 = (self.parameters.delta_g1 * delta).into_affine();
        self.parameters.delta_g2 = (self.parameters.delta_g2 * delta).into_affine();

        let z: Vec<G1Projective> = self
            .parameters
            .z
            .par_iter()
            .map(|p| *p * delta_inv)
            .collect();
        self.parameters.z = G1Projective::normalize_batch(&z);

        let l: Vec<G1Projective> = self
            .parameters
            .l
            .par_iter()
            .map(|p| *p * delta_inv)
            .collect();
        self.parameters.l = G1Projective::normalize_batch(&l);

        delta.0 .0.zeroize();
        delta_inv.0 .0.zeroize();

        self.hash = self.hash_contents();
        debug!("δ contribution applied");
    }

    /// SHA-256 over the canonical serialization of
    /// `{public_key, [δ]₁, L, Z, [δ]₂}`.
    pub fn hash_contents(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        self.write_contents(&mut hasher)
            .expect("hashing a contribution cannot fail");
        hasher.finalize().into()
    }
}

/// Verifies an ordered chain of phase 2 states, `states[0]` being the
/// output of [`Phase2::new`]. Chains of length zero or one are vacuously
/// valid.
pub fn verify_phase2(states: &[Phase2]) -> Result<()> {
    let _span = info_span!("verify_phase2", states = states.len()).entered();
    for pair in states.windows(2) {
        verify_transition(&pair[0], &pair[1])?;
    }
    Ok(())
}

fn verify_transition(prev: &Phase2, next: &Phase2) -> Result<()> {
    let mut rng = rand::thread_rng();
    let pk = &next.public_key;
    let r = gen_r(&pk.s_g, &pk.sx_g, &prev.hash, PERSONALIZATION_DELTA);

    // Knowledge of δ.
    if !same_ratio(pk.s_g, pk.sx_g, pk.x_r, r) {
        return Err(SetupError::DeltaPok);
    }

    // [δ]₁ and [δ]₂ both advance by the proven δ.
    if !same_ratio(
        next.parameters.delta_g1,
        prev.parameters.delta_g1,
        r,
        pk.x_r,
    ) {
        return Err(SetupError::DeltaG1Update);
    }
    if !same_ratio(
        pk.s_g,
        pk.sx_g,
        next.parameters.delta_g2,
        prev.parameters.delta_g2,
    ) {
        return Err(SetupError::DeltaG2Update);
    }

    // L and Z scale by δ⁻¹: collapse each vector pair with a fresh random
    // combination and check the ratio against the δ advance.
    if next.parameters.l.len() != prev.parameters.l.len() {
        return Err(SetupError::LUpdate);
    }
    if !next.parameters.l.is_empty() {
        let (l, prev_l) = merge(&next.parameters.l, &prev.parameters.l, &mut rng);
        if !same_ratio(l, prev_l, next.parameters.delta_g2, prev.parameters.delta_g2) {
            return Err(SetupError::LUpdate);
        }
    }
    if next.parameters.z.len() != prev.parameters.z.len() {
        return Err(SetupError::ZUpdate);
    }
    if !next.parameters.z.is_empty() {
        let (z, prev_z) = merge(&next.parameters.z, &prev.parameters.z, &mut rng);
        if !same_ratio(z, prev_z, next.parameters.delta_g2, prev.parameters.delta_g2) {
            return Err(SetupError::ZUpdate);
        }
    }

    if next.hash_contents() != next.hash {
        return Err(SetupError::HashMismatch);
    }

    Ok(())
}
