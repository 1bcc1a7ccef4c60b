//! Module emulating the operations on fixed points with exactly 18 decimals as
//! used in the Balancer smart contracts.

use {
    super::{error::Error, math::BalU256},
    anyhow::{Context, Result, bail},
    primitive_types::U256,
    std::{
        fmt::{self, Debug, Formatter},
        str::FromStr,
        sync::LazyLock,
    },
};

static ONE_18: LazyLock<U256> = LazyLock::new(|| U256::exp10(18));

/// Balancer fixed point number: an unsigned 256-bit integer interpreted as a
/// value with 18 decimals.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Bfp(U256);

impl Bfp {
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    pub fn one() -> Self {
        Self(*ONE_18)
    }

    pub fn from_wei(num: U256) -> Self {
        Self(num)
    }

    pub fn as_uint256(self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the fixed point representation of `10^exp`.
    ///
    /// # Panics
    ///
    /// Panics if the result does not fit into 256 bits (`exp > 59`).
    pub fn exp10(exp: i32) -> Self {
        match exp {
            i32::MIN..=-19 => Self::zero(),
            -18..=59 => Self(U256::exp10((exp + 18) as usize)),
            60..=i32::MAX => panic!("fixed point exponent {exp} out of range"),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Self) -> Result<Self, Error> {
        Ok(Self(self.0.badd(other.0)?))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, other: Self) -> Result<Self, Error> {
        Ok(Self(self.0.bsub(other.0)?))
    }

    pub fn mul_down(self, other: Self) -> Result<Self, Error> {
        Ok(Self(self.0.bmul(other.0)? / *ONE_18))
    }

    pub fn mul_up(self, other: Self) -> Result<Self, Error> {
        let product = self.0.bmul(other.0)?;
        if product.is_zero() {
            return Ok(Self::zero());
        }
        Ok(Self((product - 1) / *ONE_18 + 1))
    }

    pub fn div_down(self, other: Self) -> Result<Self, Error> {
        if other.is_zero() {
            return Err(Error::ZeroDivision);
        }
        if self.is_zero() {
            return Ok(Self::zero());
        }
        let inflated = self.0.bmul(*ONE_18)?;
        Ok(Self(inflated / other.0))
    }

    pub fn div_up(self, other: Self) -> Result<Self, Error> {
        if other.is_zero() {
            return Err(Error::ZeroDivision);
        }
        if self.is_zero() {
            return Ok(Self::zero());
        }
        let inflated = self.0.bmul(*ONE_18)?;
        Ok(Self((inflated - 1) / other.0 + 1))
    }

    /// `1 - self`, saturating at zero.
    pub fn complement(self) -> Self {
        if self.0 < *ONE_18 {
            Self(*ONE_18 - self.0)
        } else {
            Self::zero()
        }
    }
}

impl FromStr for Bfp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut split_dot = s.splitn(2, '.');
        let units = split_dot
            .next()
            .expect("Splitting a string slice yields at least one element");
        let decimals = split_dot.next().unwrap_or("0");
        if units.is_empty() || decimals.is_empty() || decimals.len() > 18 {
            bail!("Invalid decimal representation");
        }
        let units = U256::from_dec_str(units)?;
        let decimals = U256::from_dec_str(&format!("{decimals:0<18}"))?;
        let value = units
            .checked_mul(*ONE_18)
            .and_then(|units| units.checked_add(decimals))
            .context("Number too large")?;
        Ok(Self(value))
    }
}

impl Debug for Bfp {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(
            formatter,
            "{}.{:0>18}",
            self.0 / *ONE_18,
            (self.0 % *ONE_18).as_u128()
        )
    }
}

impl fmt::Display for Bfp {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        Debug::fmt(self, formatter)
    }
}
