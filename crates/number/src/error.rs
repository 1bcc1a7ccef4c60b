//! Arithmetic errors raised by the checked fixed point operations.

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("addition overflow")]
    AddOverflow,
    #[error("subtraction overflow")]
    SubOverflow,
    #[error("multiplication overflow")]
    MulOverflow,
    #[error("division by zero")]
    ZeroDivision,
    #[error("division overflow")]
    DivInternal,
}
