//! Canonical byte streams for the ceremony artifacts. Points use the
//! backend's compressed encoding; variable-length sequences carry a `u32`
//! length prefix; phase 1 and phase 2 streams end with their 32-byte
//! transcript hash.

use std::io::{Read, Write};

use ark_bn254::{G1Affine, G2Affine};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::errors::Result;
use crate::phase1::{Phase1, Phase1Parameters, Phase1PublicKeys};
use crate::phase2::{Phase2, Phase2Evaluations, Phase2Parameters};
use crate::utils::PublicKey;

fn write_points<P: CanonicalSerialize, W: Write>(writer: &mut W, points: &[P]) -> Result<()> {
    (points.len() as u32).serialize_compressed(&mut *writer)?;
    for point in points {
        point.serialize_compressed(&mut *writer)?;
    }
    Ok(())
}

fn read_points<P: CanonicalDeserialize, R: Read>(reader: &mut R) -> Result<Vec<P>> {
    let len = u32::deserialize_compressed(&mut *reader)? as usize;
    let mut points = Vec::with_capacity(len);
    for _ in 0..len {
        points.push(P::deserialize_compressed(&mut *reader)?);
    }
    Ok(points)
}

impl PublicKey {
    pub(crate) fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.s_g.serialize_compressed(&mut *writer)?;
        self.sx_g.serialize_compressed(&mut *writer)?;
        self.x_r.serialize_compressed(&mut *writer)?;
        Ok(())
    }

    pub(crate) fn read_from<R: Read>(reader: &mut R) -> Result<PublicKey> {
        Ok(PublicKey {
            s_g: G1Affine::deserialize_compressed(&mut *reader)?,
            sx_g: G1Affine::deserialize_compressed(&mut *reader)?,
            x_r: G2Affine::deserialize_compressed(&mut *reader)?,
        })
    }
}

impl Phase1 {
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.public_keys.tau.write_to(writer)?;
        self.public_keys.alpha.write_to(writer)?;
        self.public_keys.beta.write_to(writer)?;
        write_points(writer, &self.parameters.tau_g1)?;
        write_points(writer, &self.parameters.alpha_tau_g1)?;
        write_points(writer, &self.parameters.beta_tau_g1)?;
        write_points(writer, &self.parameters.tau_g2)?;
        self.parameters.beta_g2.serialize_compressed(&mut *writer)?;
        writer.write_all(&self.hash)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Phase1> {
        let tau = PublicKey::read_from(reader)?;
        let alpha = PublicKey::read_from(reader)?;
        let beta = PublicKey::read_from(reader)?;
        let tau_g1 = read_points(reader)?;
        let alpha_tau_g1 = read_points(reader)?;
        let beta_tau_g1 = read_points(reader)?;
        let tau_g2 = read_points(reader)?;
        let beta_g2 = G2Affine::deserialize_compressed(&mut *reader)?;
        let mut hash = [0u8; 32];
        reader.read_exact(&mut hash)?;
        Ok(Phase1 {
            parameters: Phase1Parameters {
                tau_g1,
                alpha_tau_g1,
                beta_tau_g1,
                tau_g2,
                beta_g2,
            },
            public_keys: Phase1PublicKeys { tau, alpha, beta },
            hash,
        })
    }
}

impl Phase2 {
    /// The bytes covered by the transcript hash:
    /// `public_key ‖ [δ]₁ ‖ L ‖ Z ‖ [δ]₂`.
    pub(crate) fn write_contents<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.public_key.write_to(writer)?;
        self.parameters.delta_g1.serialize_compressed(&mut *writer)?;
        write_points(writer, &self.parameters.l)?;
        write_points(writer, &self.parameters.z)?;
        self.parameters.delta_g2.serialize_compressed(&mut *writer)?;
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.write_contents(writer)?;
        writer.write_all(&self.hash)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Phase2> {
        let public_key = PublicKey::read_from(reader)?;
        let delta_g1 = G1Affine::deserialize_compressed(&mut *reader)?;
        let l = read_points(reader)?;
        let z = read_points(reader)?;
        let delta_g2 = G2Affine::deserialize_compressed(&mut *reader)?;
        let mut hash = [0u8; 32];
        reader.read_exact(&mut hash)?;
        Ok(Phase2 {
            parameters: Phase2Parameters {
                delta_g1,
                delta_g2,
                l,
                z,
            },
            public_key,
            hash,
        })
    }
}

impl Phase2Evaluations {
    /// The stream carries `A ‖ B(G1) ‖ B(G2)`; the verification-key terms
    /// stay with the coordinator and are not part of the exchange format.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_points(writer, &self.a_g1)?;
        write_points(writer, &self.b_g1)?;
        write_points(writer, &self.b_g2)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Phase2Evaluations> {
        let a_g1 = read_points(reader)?;
        let b_g1 = read_points(reader)?;
        let b_g2 = read_points(reader)?;
        Ok(Phase2Evaluations {
            a_g1,
            b_g1,
            b_g2,
            vkk: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ec::{AffineRepr, CurveGroup};
    use ark_std::UniformRand;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn g1(rng: &mut ChaCha20Rng) -> G1Affine {
        (G1Affine::generator() * Fr::rand(rng)).into_affine()
    }

    fn g2(rng: &mut ChaCha20Rng) -> G2Affine {
        (G2Affine::generator() * Fr::rand(rng)).into_affine()
    }

    fn public_key(rng: &mut ChaCha20Rng) -> PublicKey {
        PublicKey {
            s_g: g1(rng),
            sx_g: g1(rng),
            x_r: g2(rng),
        }
    }

    #[test]
    fn test_phase1_roundtrip() {
        let mut rng = ChaCha20Rng::seed_from_u64(31);
        let phase1 = Phase1 {
            parameters: Phase1Parameters {
                tau_g1: (0..7).map(|_| g1(&mut rng)).collect(),
                alpha_tau_g1: (0..4).map(|_| g1(&mut rng)).collect(),
                beta_tau_g1: (0..4).map(|_| g1(&mut rng)).collect(),
                tau_g2: (0..4).map(|_| g2(&mut rng)).collect(),
                beta_g2: g2(&mut rng),
            },
            public_keys: Phase1PublicKeys {
                tau: public_key(&mut rng),
                alpha: public_key(&mut rng),
                beta: public_key(&mut rng),
            },
            hash: [5u8; 32],
        };

        let mut buf = Vec::new();
        phase1.write_to(&mut buf).unwrap();
        let decoded = Phase1::read_from(&mut buf.as_slice()).unwrap();
        assert_eq!(phase1, decoded);
    }

    #[test]
    fn test_phase2_roundtrip() {
        let mut rng = ChaCha20Rng::seed_from_u64(32);
        let phase2 = Phase2 {
            parameters: Phase2Parameters {
                delta_g1: g1(&mut rng),
                delta_g2: g2(&mut rng),
                l: (0..3).map(|_| g1(&mut rng)).collect(),
                z: (0..7).map(|_| g1(&mut rng)).collect(),
            },
            public_key: public_key(&mut rng),
            hash: [9u8; 32],
        };

        let mut buf = Vec::new();
        phase2.write_to(&mut buf).unwrap();
        let decoded = Phase2::read_from(&mut buf.as_slice()).unwrap();
        assert_eq!(phase2, decoded);
    }

    #[test]
    fn test_evaluations_roundtrip_bytes() {
        let mut rng = ChaCha20Rng::seed_from_u64(33);
        let evaluations = Phase2Evaluations {
            a_g1: (0..4).map(|_| g1(&mut rng)).collect(),
            b_g1: (0..4).map(|_| g1(&mut rng)).collect(),
            b_g2: (0..4).map(|_| g2(&mut rng)).collect(),
            vkk: vec![g1(&mut rng)],
        };

        let mut buf = Vec::new();
        evaluations.write_to(&mut buf).unwrap();
        let decoded = Phase2Evaluations::read_from(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded.a_g1, evaluations.a_g1);
        assert_eq!(decoded.b_g1, evaluations.b_g1);
        assert_eq!(decoded.b_g2, evaluations.b_g2);

        let mut reencoded = Vec::new();
        decoded.write_to(&mut reencoded).unwrap();
        assert_eq!(buf, reencoded);
    }

    #[test]
    fn test_garbage_stream_rejected() {
        let bytes = [0xffu8; 64];
        assert!(Phase2::read_from(&mut bytes.as_slice()).is_err());
    }

    #[test]
    fn test_truncated_stream_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(34);
        let phase2 = Phase2 {
            parameters: Phase2Parameters {
                delta_g1: g1(&mut rng),
                delta_g2: g2(&mut rng),
                l: vec![g1(&mut rng)],
                z: vec![g1(&mut rng)],
            },
            public_key: public_key(&mut rng),
            hash: [0u8; 32],
        };
        let mut buf = Vec::new();
        phase2.write_to(&mut buf).unwrap();
        buf.truncate(buf.len() - 16);
        assert!(Phase2::read_from(&mut buf.as_slice()).is_err());
    }
}
