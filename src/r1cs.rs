use ark_bn254::Fr;
use ark_ff::{One, Zero};

use crate::errors::{Result, SetupError};

/// Coefficient of a linear-combination term. The four hot values bypass the
/// coefficient table (and the scalar multiplication they would otherwise
/// cost); everything else indexes into [`R1cs::coefficients`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coeff {
    Zero,
    One,
    MinusOne,
    Two,
    Generic(usize),
}

/// A single `coefficient · wire` term of a linear combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub coeff: Coeff,
    pub wire: usize,
}

impl Term {
    pub fn new(coeff: Coeff, wire: usize) -> Self {
        Term { coeff, wire }
    }
}

/// One rank-1 constraint `L · R = O`, each side a sparse linear combination
/// over the wires.
#[derive(Debug, Clone, Default)]
pub struct Constraint {
    pub l: Vec<Term>,
    pub r: Vec<Term>,
    pub o: Vec<Term>,
}

/// Rank-1 constraint system consumed read-only by the phase 2 setup.
///
/// Wire ordering: public wires occupy `[0, num_public)`, the private
/// (secret then internal) wires occupy `[num_public, num_wires)`.
#[derive(Debug, Clone, Default)]
pub struct R1cs {
    pub num_public: usize,
    pub num_secret: usize,
    pub num_internal: usize,
    pub constraints: Vec<Constraint>,
    /// Table of non-shortcut coefficient values, indexed by
    /// [`Coeff::Generic`].
    pub coefficients: Vec<Fr>,
}

impl R1cs {
    pub fn new(num_public: usize, num_secret: usize, num_internal: usize) -> Self {
        R1cs {
            num_public,
            num_secret,
            num_internal,
            constraints: Vec::new(),
            coefficients: Vec::new(),
        }
    }

    pub fn num_wires(&self) -> usize {
        self.num_public + self.num_secret + self.num_internal
    }

    pub fn num_private(&self) -> usize {
        self.num_secret + self.num_internal
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Interns a coefficient value, returning the shortcut tag for the four
    /// hot values and a table index otherwise.
    pub fn coeff(&mut self, value: Fr) -> Coeff {
        if value.is_zero() {
            Coeff::Zero
        } else if value.is_one() {
            Coeff::One
        } else if value == -Fr::one() {
            Coeff::MinusOne
        } else if value == Fr::from(2u64) {
            Coeff::Two
        } else if let Some(index) = self.coefficients.iter().position(|c| *c == value) {
            Coeff::Generic(index)
        } else {
            self.coefficients.push(value);
            Coeff::Generic(self.coefficients.len() - 1)
        }
    }

    pub fn add_constraint(&mut self, l: Vec<Term>, r: Vec<Term>, o: Vec<Term>) {
        self.constraints.push(Constraint { l, r, o });
    }

    /// Checks that every term references an existing wire and, for generic
    /// coefficients, an existing table entry.
    pub fn validate(&self) -> Result<()> {
        let num_wires = self.num_wires();
        for (i, constraint) in self.constraints.iter().enumerate() {
            for (side, terms) in [
                ("L", &constraint.l),
                ("R", &constraint.r),
                ("O", &constraint.o),
            ] {
                for term in terms {
                    if term.wire >= num_wires {
                        return Err(SetupError::Constraint(format!(
                            "constraint {i}, side {side}: wire {} out of range (< {num_wires})",
                            term.wire
                        )));
                    }
                    if let Coeff::Generic(index) = term.coeff {
                        if index >= self.coefficients.len() {
                            return Err(SetupError::Constraint(format!(
                                "constraint {i}, side {side}: coefficient index {index} out of range"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Resolves a coefficient tag to its field value.
    pub fn coeff_value(&self, coeff: Coeff) -> Fr {
        match coeff {
            Coeff::Zero => Fr::zero(),
            Coeff::One => Fr::one(),
            Coeff::MinusOne => -Fr::one(),
            Coeff::Two => Fr::from(2u64),
            Coeff::Generic(index) => self.coefficients[index],
        }
    }
}
