//! Token configuration shared by all pools and the conversion between raw
//! token amounts and the 18 decimal "live" amounts the pool math works on.

use {
    crate::error::ValidationError,
    number::{BalU256, Bfp, U256},
    primitive_types::H160,
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    /// Token whose value is 1:1 with its amount after decimal scaling.
    #[default]
    Standard,
    /// Token whose amounts are multiplied by the rate of an external provider.
    WithRate,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenConfig {
    pub token: H160,
    pub token_type: TokenType,
    pub rate_provider: Option<H160>,
    pub pays_yield_fees: bool,
    /// Chain the token originates from, informational only.
    pub chain_id: Option<u64>,
    pub decimals: u8,
}

impl TokenConfig {
    /// Checks the decimals and that a rate provider is present exactly when
    /// the token type needs one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        scaling_exponent_from_decimals(self.decimals).ok_or(
            ValidationError::UnsupportedDecimals {
                token: self.token,
                decimals: self.decimals,
            },
        )?;
        match (self.token_type, self.rate_provider) {
            (TokenType::Standard, None) | (TokenType::WithRate, Some(_)) => Ok(()),
            _ => Err(ValidationError::InvalidRateProvider(self.token)),
        }
    }
}

/// Converts a token decimal count to its corresponding scaling factor.
pub fn scaling_factor_from_decimals(decimals: u8) -> Result<Bfp, ValidationError> {
    let exponent = scaling_exponent_from_decimals(decimals).ok_or(
        ValidationError::UnsupportedDecimals {
            token: H160::zero(),
            decimals,
        },
    )?;
    Ok(Bfp::exp10(i32::from(exponent)))
}

/// Converts a token decimal count to its corresponding scaling exponent.
fn scaling_exponent_from_decimals(decimals: u8) -> Option<u8> {
    18u8.checked_sub(decimals)
}

/// Scaling factor and rate of one token at the time of an operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TokenScaling {
    pub scaling_factor: Bfp,
    pub rate: Bfp,
}

impl TokenScaling {
    pub fn new(decimals: u8, rate: Bfp) -> Result<Self, ValidationError> {
        Ok(Self {
            scaling_factor: scaling_factor_from_decimals(decimals)?,
            rate,
        })
    }

    /// `raw · 10^(18 - decimals) · rate`, the amount the pool math sees.
    pub fn to_scaled18_round_down(&self, raw: U256) -> Result<U256, number::Error> {
        Ok(self.upscaled(raw)?.mul_down(self.rate)?.as_uint256())
    }

    pub fn to_scaled18_round_up(&self, raw: U256) -> Result<U256, number::Error> {
        Ok(self.upscaled(raw)?.mul_up(self.rate)?.as_uint256())
    }

    /// Inverse of the scaling, for amounts the pool pays out.
    pub fn to_raw_round_down(&self, scaled18: U256) -> Result<U256, number::Error> {
        Ok(Bfp::from_wei(scaled18)
            .div_down(self.scaling_factor.mul_down(self.rate)?)?
            .as_uint256())
    }

    /// Inverse of the scaling, for amounts the pool receives.
    pub fn to_raw_round_up(&self, scaled18: U256) -> Result<U256, number::Error> {
        Ok(Bfp::from_wei(scaled18)
            .div_up(self.scaling_factor.mul_down(self.rate)?)?
            .as_uint256())
    }

    fn upscaled(&self, raw: U256) -> Result<Bfp, number::Error> {
        Ok(Bfp::from_wei(raw.bmul(self.scaling_factor.as_uint256())? / Bfp::one().as_uint256()))
    }
}
