use {tokio::sync::mpsc, vault::VaultEvent};

/// Logs every vault event until all senders are dropped.
pub fn spawn_logger(mut events: mpsc::UnboundedReceiver<VaultEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            log(&event);
        }
        tracing::debug!("vault event stream closed");
    })
}

fn log(event: &VaultEvent) {
    let pool = event.pool();
    match event {
        VaultEvent::PoolRegistered {
            tokens,
            swap_fee,
            pool_creator,
            ..
        } => tracing::info!(?pool, ?tokens, %swap_fee, ?pool_creator, "pool registered"),
        VaultEvent::PoolInitialized {
            recipient,
            bpt_amount_out,
            ..
        } => tracing::info!(?pool, ?recipient, %bpt_amount_out, "pool initialized"),
        VaultEvent::LiquidityAdded(liquidity) => tracing::info!(
            ?pool,
            kind = %liquidity.kind,
            recipient = ?liquidity.recipient,
            deltas = ?liquidity.token_deltas,
            shares = ?liquidity.share_delta,
            "liquidity added"
        ),
        VaultEvent::LiquidityRemoved(liquidity) => tracing::info!(
            ?pool,
            kind = %liquidity.kind,
            recipient = ?liquidity.recipient,
            deltas = ?liquidity.token_deltas,
            shares = ?liquidity.share_delta,
            "liquidity removed"
        ),
        VaultEvent::TokenAdded {
            token,
            index,
            initial_balance,
            ..
        } => tracing::info!(?pool, ?token, index, %initial_balance, "token added"),
        VaultEvent::PoolPausedStateChanged { paused, .. } => {
            tracing::info!(?pool, paused, "pool paused state changed")
        }
        VaultEvent::SwapFeePercentageChanged { swap_fee, .. } => {
            tracing::info!(?pool, %swap_fee, "swap fee changed")
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, primitive_types::H160, vault::EventSink};

    #[tokio::test]
    async fn logger_stops_when_senders_are_dropped() {
        observe::tracing::initialize_reentrant("vault_driver=debug");
        let (sink, events) = vault::ChannelEventSink::new();
        let logger = spawn_logger(events);

        sink.publish(VaultEvent::PoolPausedStateChanged {
            pool: H160([1; 20]),
            paused: true,
        });
        drop(sink);

        tokio::time::timeout(std::time::Duration::from_secs(5), logger)
            .await
            .expect("logger did not stop")
            .unwrap();
    }
}
