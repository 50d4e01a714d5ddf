use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("number of constraints ({constraints}) is larger than the phase 1 SRS supports ({capacity})")]
    CircuitTooLarge { constraints: usize, capacity: usize },

    #[error("domain size {0} is not a supported power of two")]
    DomainSize(usize),

    #[error("constraint system is malformed: {0}")]
    Constraint(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] ark_serialize::SerializationError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("couldn't verify knowledge of δ")]
    DeltaPok,

    #[error("couldn't verify that [δ]₁ is based on the previous contribution")]
    DeltaG1Update,

    #[error("couldn't verify that [δ]₂ is based on the previous contribution")]
    DeltaG2Update,

    #[error("couldn't verify the update of L using δ⁻¹")]
    LUpdate,

    #[error("couldn't verify the update of Z using δ⁻¹")]
    ZUpdate,

    #[error("couldn't verify the transcript hash of the contribution")]
    HashMismatch,

    #[error("invariant violation: {0}")]
    Invariant(&'static str),
}

pub type Result<T> = std::result::Result<T, SetupError>;
