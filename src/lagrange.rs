use ark_bn254::{Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{FftField, Field, One};
use rayon::prelude::*;

use crate::errors::{Result, SetupError};

/// Converts `[f(ω⁰)], [f(ω¹)], …` into the commitments to the coefficients
/// of `f` in the Lagrange basis, i.e. an inverse DFT carried out on group
/// elements instead of scalars. Applied to the powers `[τⁱ]` it yields
/// `[Lᵢ(τ)]`.
pub fn lagrange_coeffs_g1(powers: &[G1Affine], size: usize) -> Result<Vec<G1Affine>> {
    if powers.len() < size {
        return Err(SetupError::DomainSize(size));
    }
    let mut coeffs: Vec<G1Projective> = powers[..size].iter().map(|p| p.into_group()).collect();
    ifft_in_exponent(&mut coeffs)?;
    Ok(G1Projective::normalize_batch(&coeffs))
}

pub fn lagrange_coeffs_g2(powers: &[G2Affine], size: usize) -> Result<Vec<G2Affine>> {
    if powers.len() < size {
        return Err(SetupError::DomainSize(size));
    }
    let mut coeffs: Vec<G2Projective> = powers[..size].iter().map(|p| p.into_group()).collect();
    ifft_in_exponent(&mut coeffs)?;
    Ok(G2Projective::normalize_batch(&coeffs))
}

/// In-place radix-2 inverse DFT in the exponent: decimation-in-frequency
/// butterflies over ω⁻¹, a global n⁻¹ scaling, then the bit-reversal
/// permutation that restores natural coefficient order.
fn ifft_in_exponent<G>(points: &mut [G]) -> Result<()>
where
    G: CurveGroup<ScalarField = Fr>,
{
    let n = points.len();
    if n <= 1 {
        return Ok(());
    }
    if !n.is_power_of_two() {
        return Err(SetupError::DomainSize(n));
    }
    let root_inv = Fr::get_root_of_unity(n as u64)
        .and_then(|w| w.inverse())
        .ok_or(SetupError::DomainSize(n))?;

    let mut len = n;
    while len >= 2 {
        let half = len / 2;
        // Twiddles for this stage are ω⁻ᵏ·ⁿ/ˡᵉⁿ, k ∈ [0, len/2).
        let step = root_inv.pow([(n / len) as u64]);
        for block in (0..n).step_by(len) {
            let mut w = Fr::one();
            for j in block..block + half {
                let (u, v) = (points[j], points[j + half]);
                points[j] = u + v;
                points[j + half] = (u - v) * w;
                w *= step;
            }
        }
        len = half;
    }

    let n_inv = Fr::from(n as u64)
        .inverse()
        .ok_or(SetupError::DomainSize(n))?;
    points.par_iter_mut().for_each(|p| *p *= n_inv);

    bit_reverse(points);
    Ok(())
}

/// Swaps each entry with the one at its bit-reversed index. `values.len()`
/// must be a power of two.
pub(crate) fn bit_reverse<T>(values: &mut [T]) {
    let n = values.len();
    if n <= 1 {
        return;
    }
    debug_assert!(n.is_power_of_two());
    let log_n = n.trailing_zeros();
    for k in 0..n {
        let rk = k.reverse_bits() >> (usize::BITS - log_n);
        if k < rk {
            values.swap(k, rk);
        }
    }
}
