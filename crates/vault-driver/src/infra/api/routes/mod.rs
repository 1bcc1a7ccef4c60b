mod healthz;
mod liquidity;
mod pools;

pub(super) use {healthz::healthz, liquidity::liquidity, pools::pools};
