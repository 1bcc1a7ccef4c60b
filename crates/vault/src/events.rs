//! Events published after every committed state change.

use {
    crate::{
        ledger::{Delta, TokenDelta},
        liquidity::OperationKind,
    },
    number::{Bfp, U256},
    primitive_types::H160,
    tokio::sync::mpsc,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VaultEvent {
    PoolRegistered {
        pool: H160,
        tokens: Vec<H160>,
        swap_fee: Bfp,
        pool_creator: H160,
    },
    PoolInitialized {
        pool: H160,
        recipient: H160,
        bpt_amount_out: U256,
    },
    LiquidityAdded(LiquidityEvent),
    LiquidityRemoved(LiquidityEvent),
    TokenAdded {
        pool: H160,
        token: H160,
        index: usize,
        initial_balance: U256,
    },
    PoolPausedStateChanged {
        pool: H160,
        paused: bool,
    },
    SwapFeePercentageChanged {
        pool: H160,
        swap_fee: Bfp,
    },
}

impl VaultEvent {
    pub fn pool(&self) -> H160 {
        match self {
            Self::PoolRegistered { pool, .. }
            | Self::PoolInitialized { pool, .. }
            | Self::TokenAdded { pool, .. }
            | Self::PoolPausedStateChanged { pool, .. }
            | Self::SwapFeePercentageChanged { pool, .. } => *pool,
            Self::LiquidityAdded(event) | Self::LiquidityRemoved(event) => event.pool,
        }
    }
}

/// Settled liquidity operation in raw token units.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LiquidityEvent {
    pub kind: OperationKind,
    pub pool: H160,
    pub recipient: H160,
    pub token_deltas: Vec<TokenDelta>,
    pub share_delta: Delta,
    pub swap_fee_amounts: Vec<U256>,
    pub user_data: Vec<u8>,
}

/// Consumer of vault events. Publishing happens while the pool is locked,
/// so implementations must not block.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait EventSink: Send + Sync {
    fn publish(&self, event: VaultEvent);
}

/// Writes every event to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, event: VaultEvent) {
        tracing::info!(pool = ?event.pool(), ?event, "vault event");
    }
}

/// Forwards events to an unbounded channel.
#[derive(Clone, Debug)]
pub struct ChannelEventSink(mpsc::UnboundedSender<VaultEvent>);

impl ChannelEventSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<VaultEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self(sender), receiver)
    }
}

impl EventSink for ChannelEventSink {
    fn publish(&self, event: VaultEvent) {
        if let Err(err) = self.0.send(event) {
            tracing::warn!(event = ?err.0, "event receiver dropped");
        }
    }
}
