//! Conversion and rounding helpers for `U256`.

use primitive_types::{U256, U512};

pub trait U256Ext: Sized {
    fn ceil_div(&self, other: &Self) -> Self;
    fn checked_ceil_div(&self, other: &Self) -> Option<Self>;

    /// `self * mul / div` computed with a 512-bit intermediate, rounded down.
    fn mul_div_down(&self, mul: Self, div: Self) -> Option<Self>;

    /// `self * mul / div` computed with a 512-bit intermediate, rounded up.
    fn mul_div_up(&self, mul: Self, div: Self) -> Option<Self>;
}

impl U256Ext for U256 {
    fn ceil_div(&self, other: &Self) -> Self {
        self.checked_ceil_div(other)
            .expect("ceiling division arithmetic error")
    }

    fn checked_ceil_div(&self, other: &Self) -> Option<Self> {
        self.checked_add(other.checked_sub(1.into())?)?
            .checked_div(*other)
    }

    fn mul_div_down(&self, mul: Self, div: Self) -> Option<Self> {
        if div.is_zero() {
            return None;
        }
        let quotient = self.full_mul(mul) / U512::from(div);
        U256::try_from(quotient).ok()
    }

    fn mul_div_up(&self, mul: Self, div: Self) -> Option<Self> {
        if div.is_zero() {
            return None;
        }
        let (quotient, remainder) = self.full_mul(mul).div_mod(U512::from(div));
        let quotient = U256::try_from(quotient).ok()?;
        if remainder.is_zero() {
            Some(quotient)
        } else {
            quotient.checked_add(U256::one())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_div() {
        assert_eq!(U256::from(10).ceil_div(&3.into()), 4.into());
        assert_eq!(U256::from(9).ceil_div(&3.into()), 3.into());
        assert_eq!(U256::from(1).checked_ceil_div(&0.into()), None);
    }

    #[test]
    fn mul_div_rounding() {
        let value = U256::from(10);
        assert_eq!(value.mul_div_down(1.into(), 3.into()), Some(3.into()));
        assert_eq!(value.mul_div_up(1.into(), 3.into()), Some(4.into()));
        assert_eq!(value.mul_div_up(3.into(), 3.into()), Some(10.into()));
        assert_eq!(value.mul_div_down(1.into(), 0.into()), None);
    }

    #[test]
    fn mul_div_does_not_overflow_intermediate() {
        let large = U256::MAX / 2;
        assert_eq!(large.mul_div_down(4.into(), 4.into()), Some(large));
        assert_eq!(large.mul_div_down(4.into(), 1.into()), None);
    }
}
