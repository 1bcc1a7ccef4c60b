//! Fixed point and 256-bit integer helpers shared by the vault crates.

/// Parses a decimal literal into a [`Bfp`].
///
/// Panics on malformed input, so only use it with constant literals.
#[macro_export]
macro_rules! bfp {
    ($value:expr) => {
        $value
            .parse::<$crate::Bfp>()
            .expect("invalid fixed point literal")
    };
}

pub mod conversions;
pub mod error;
pub mod fixed_point;
pub mod math;
pub mod serialization;

pub use {
    conversions::U256Ext,
    error::Error,
    fixed_point::Bfp,
    math::BalU256,
    primitive_types::U256,
};
