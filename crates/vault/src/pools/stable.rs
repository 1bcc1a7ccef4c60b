//! Stable pool: the invariant curve of [`crate::stable_math`] behind the
//! [`BasePool`] interface.

use {
    super::{BasePool, Rounding},
    crate::{
        error::{Error, ValidationError},
        stable_math::{self, AMP_PRECISION},
    },
    number::{Bfp, U256},
};

pub const MIN_AMP: u64 = 1;
pub const MAX_AMP: u64 = 5000;

pub const MIN_TOKENS: usize = 2;
pub const MAX_TOKENS: usize = 5;

/// Unbalanced operations may shrink the invariant to 60%...
pub fn min_invariant_ratio() -> Bfp {
    Bfp::from_wei(U256::from(60) * U256::exp10(16))
}

/// ...or grow it to 500% of its value.
pub fn max_invariant_ratio() -> Bfp {
    Bfp::from_wei(U256::from(500) * U256::exp10(16))
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AmplificationParameter {
    factor: U256,
    precision: U256,
}

impl AmplificationParameter {
    pub fn try_new(factor: U256, precision: U256) -> Result<Self, ValidationError> {
        if precision.is_zero() {
            return Err(ValidationError::ZeroAmplificationPrecision);
        }
        let parameter = Self { factor, precision };
        let out_of_bounds = || ValidationError::AmplificationOutOfBounds(factor / precision);
        let value = parameter
            .with_base(U256::from(AMP_PRECISION))
            .ok_or_else(out_of_bounds)?;
        let bounds = U256::from(MIN_AMP * AMP_PRECISION)..=U256::from(MAX_AMP * AMP_PRECISION);
        if !bounds.contains(&value) {
            return Err(out_of_bounds());
        }
        Ok(parameter)
    }

    /// An integer amplification parameter such as `200`.
    pub fn from_value(value: u64) -> Result<Self, ValidationError> {
        Self::try_new(value.into(), U256::one())
    }

    /// The parameter expressed with `base` as its precision.
    pub fn with_base(&self, base: U256) -> Option<U256> {
        Some(self.factor.checked_mul(base)? / self.precision)
    }

    pub fn factor(&self) -> U256 {
        self.factor
    }

    pub fn precision(&self) -> U256 {
        self.precision
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StablePool {
    /// Amplification parameter including [`AMP_PRECISION`].
    amplification_parameter: U256,
}

impl StablePool {
    pub fn new(amplification_parameter: &AmplificationParameter) -> Result<Self, ValidationError> {
        let amplification_parameter = amplification_parameter
            .with_base(U256::from(AMP_PRECISION))
            .ok_or(ValidationError::AmplificationOutOfBounds(
                amplification_parameter.factor(),
            ))?;
        Ok(Self {
            amplification_parameter,
        })
    }
}

impl BasePool for StablePool {
    fn compute_invariant(&self, balances: &[U256], rounding: Rounding) -> Result<U256, Error> {
        let invariant = stable_math::compute_invariant(self.amplification_parameter, balances)?;
        Ok(match rounding {
            Rounding::Up if !invariant.is_zero() => invariant + 1,
            _ => invariant,
        })
    }

    fn compute_balance(
        &self,
        balances: &[U256],
        token_index: usize,
        invariant_ratio: Bfp,
    ) -> Result<U256, Error> {
        let invariant = Bfp::from_wei(self.compute_invariant(balances, Rounding::Up)?)
            .mul_up(invariant_ratio)?
            .as_uint256();
        stable_math::compute_balance(
            self.amplification_parameter,
            balances,
            invariant,
            token_index,
        )
    }

    fn minimum_invariant_ratio(&self) -> Bfp {
        min_invariant_ratio()
    }

    fn maximum_invariant_ratio(&self) -> Bfp {
        max_invariant_ratio()
    }
}
