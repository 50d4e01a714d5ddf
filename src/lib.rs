//! Phase 2 (circuit-specific) round of a Groth16 trusted-setup ceremony
//! over BN254: specializes a phase 1 powers-of-τ SRS to an R1CS, applies
//! chained δ contributions, and verifies contribution chains with pairing
//! checks.

pub mod errors;
pub mod lagrange;
pub mod marshal;
pub mod phase1;
pub mod phase2;
pub mod r1cs;
pub mod utils;

pub use errors::{Result, SetupError};
pub use phase1::Phase1;
pub use phase2::{verify_phase2, Phase2, Phase2Evaluations};
pub use r1cs::R1cs;
pub use utils::PublicKey;
