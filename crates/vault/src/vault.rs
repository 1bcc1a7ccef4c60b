//! The vault: registry of pools and entry point of every operation.
//!
//! Pools live in a [`DashMap`] of `Arc<Mutex<_>>` records. An operation
//! clones the record's `Arc`, releases the map shard and holds the pool mutex
//! from snapshot to ledger update, so operations on one pool are serialised
//! while different pools proceed in parallel.

use {
    crate::{
        config::Config,
        error::{Error, LifecycleError},
        events::{EventSink, LiquidityEvent, VaultEvent},
        ledger::Ledger,
        lifecycle,
        liquidity::{
            AddLiquidityParams,
            AddLiquidityResult,
            InitializeParams,
            OperationKind,
            RemoveLiquidityParams,
            RemoveLiquidityResult,
            Settlement,
            engine::{self, PoolContext},
        },
        pools::{BasePool, Pool, PoolRegistration, RegistrationState, Rounding, TokenConfig},
        rates::RateProviding,
    },
    dashmap::{DashMap, mapref::entry::Entry},
    number::{Bfp, U256},
    primitive_types::H160,
    std::sync::{Arc, Mutex, MutexGuard, PoisonError},
};

#[derive(Debug)]
struct PoolRecord {
    pool: Pool,
    ledger: Ledger,
}

/// Point in time view of a pool.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolSnapshot {
    pub pool: Pool,
    /// Raw token balances.
    pub balances: Vec<U256>,
    /// Balances scaled to 18 decimals with rates applied.
    pub live_balances: Vec<U256>,
    pub total_supply: U256,
    /// Invariant of the live balances, rounded down.
    pub invariant: U256,
}

pub struct Vault {
    config: Config,
    pools: DashMap<H160, Arc<Mutex<PoolRecord>>>,
    rates: Arc<dyn RateProviding>,
    events: Arc<dyn EventSink>,
}

fn lock(record: &Mutex<PoolRecord>) -> MutexGuard<'_, PoolRecord> {
    // A panic while holding the lock cannot leave a half applied ledger
    // update behind, so the record is still consistent.
    record.lock().unwrap_or_else(PoisonError::into_inner)
}

fn apply(record: &mut PoolRecord, settlement: &Settlement) -> Result<(), Error> {
    record
        .ledger
        .apply_delta(&settlement.token_deltas, settlement.share_delta)
        .map_err(|err| {
            tracing::error!(pool = ?record.pool.id, ?err, "ledger rejected settlement");
            Error::from(err)
        })
}

impl Vault {
    pub fn new(config: Config, rates: Arc<dyn RateProviding>, events: Arc<dyn EventSink>) -> Self {
        Self {
            config,
            pools: DashMap::new(),
            rates,
            events,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn record(&self, pool: H160) -> Result<Arc<Mutex<PoolRecord>>, Error> {
        self.pools
            .get(&pool)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LifecycleError::NotRegistered(pool).into())
    }

    /// Copies pool and ledger so read-only work runs without the lock.
    fn copy(&self, pool: H160) -> Result<(Pool, Ledger), Error> {
        let record = self.record(pool)?;
        let record = lock(&record);
        Ok((record.pool.clone(), record.ledger.clone()))
    }

    pub fn registration_state(&self, pool: H160) -> RegistrationState {
        self.pools
            .get(&pool)
            .map(|entry| lock(entry.value()).pool.state)
            .unwrap_or_default()
    }

    pub fn pools(&self) -> Vec<H160> {
        self.pools.iter().map(|entry| *entry.key()).collect()
    }

    pub fn register_pool(&self, registration: PoolRegistration) -> Result<(), Error> {
        lifecycle::validate_registration(&self.config, &registration, self.rates.as_ref())?;

        let id = registration.pool;
        match self.pools.entry(id) {
            Entry::Occupied(_) => Err(LifecycleError::AlreadyRegistered(id).into()),
            Entry::Vacant(entry) => {
                let pool = Pool::registered(registration);
                let event = VaultEvent::PoolRegistered {
                    pool: id,
                    tokens: pool.token_addresses(),
                    swap_fee: pool.swap_fee,
                    pool_creator: pool.role_accounts.pool_creator,
                };
                let ledger = Ledger::new(pool.tokens.len());
                // Keep the shard locked until the event is out so it
                // precedes any event of a following operation.
                let _guard = entry.insert(Arc::new(Mutex::new(PoolRecord { pool, ledger })));
                tracing::info!(pool = ?id, "registered pool");
                self.events.publish(event);
                Ok(())
            }
        }
    }

    /// Seeds a registered pool and returns the shares minted to the
    /// recipient.
    pub fn initialize_pool(&self, params: InitializeParams) -> Result<U256, Error> {
        let record = self.record(params.pool)?;
        let mut record = lock(&record);

        let (bpt_amount_out, settlement) = {
            let ctx = PoolContext::new(&record.pool, &record.ledger, self.rates.as_ref())?;
            lifecycle::initialize(
                &self.config,
                &ctx,
                &params.exact_amounts_in,
                params.min_bpt_amount_out,
            )?
        };
        apply(&mut record, &settlement)?;
        record.pool.state = RegistrationState::Initialized;

        tracing::info!(
            pool = ?params.pool,
            total_supply = %record.ledger.total_supply(),
            "initialized pool"
        );
        self.events.publish(VaultEvent::LiquidityAdded(LiquidityEvent {
            kind: OperationKind::Initialize,
            pool: params.pool,
            recipient: params.recipient,
            token_deltas: settlement.token_deltas,
            share_delta: settlement.share_delta,
            swap_fee_amounts: vec![U256::zero(); record.pool.tokens.len()],
            user_data: params.user_data,
        }));
        self.events.publish(VaultEvent::PoolInitialized {
            pool: params.pool,
            recipient: params.recipient,
            bpt_amount_out,
        });
        Ok(bpt_amount_out)
    }

    pub fn add_liquidity(&self, params: AddLiquidityParams) -> Result<AddLiquidityResult, Error> {
        let record = self.record(params.pool)?;
        let mut record = lock(&record);
        lifecycle::ensure_initialized(&record.pool)?;
        lifecycle::ensure_unpaused(&record.pool)?;

        let (result, settlement) = {
            let ctx = PoolContext::new(&record.pool, &record.ledger, self.rates.as_ref())?;
            engine::add_liquidity(&self.config, &ctx, &params.kind)?
        };
        apply(&mut record, &settlement)?;

        let kind = params.kind.operation();
        tracing::debug!(pool = ?params.pool, %kind, bpt_amount_out = %result.bpt_amount_out, "added liquidity");
        self.events.publish(VaultEvent::LiquidityAdded(LiquidityEvent {
            kind,
            pool: params.pool,
            recipient: params.recipient,
            token_deltas: settlement.token_deltas,
            share_delta: settlement.share_delta,
            swap_fee_amounts: result.swap_fee_amounts.clone(),
            user_data: params.user_data,
        }));
        Ok(result)
    }

    pub fn remove_liquidity(
        &self,
        params: RemoveLiquidityParams,
    ) -> Result<RemoveLiquidityResult, Error> {
        let record = self.record(params.pool)?;
        let mut record = lock(&record);
        lifecycle::ensure_initialized(&record.pool)?;
        lifecycle::ensure_unpaused(&record.pool)?;

        let (result, settlement) = {
            let ctx = PoolContext::new(&record.pool, &record.ledger, self.rates.as_ref())?;
            engine::remove_liquidity(&self.config, &ctx, &params.kind)?
        };
        apply(&mut record, &settlement)?;

        let kind = params.kind.operation();
        tracing::debug!(pool = ?params.pool, %kind, bpt_amount_in = %result.bpt_amount_in, "removed liquidity");
        self.events.publish(VaultEvent::LiquidityRemoved(LiquidityEvent {
            kind,
            pool: params.pool,
            recipient: params.recipient,
            token_deltas: settlement.token_deltas,
            share_delta: settlement.share_delta,
            swap_fee_amounts: result.swap_fee_amounts.clone(),
            user_data: params.user_data,
        }));
        Ok(result)
    }

    /// Result `add_liquidity` would return right now, without settling.
    pub fn query_add_liquidity(
        &self,
        params: &AddLiquidityParams,
    ) -> Result<AddLiquidityResult, Error> {
        let (pool, ledger) = self.copy(params.pool)?;
        lifecycle::ensure_initialized(&pool)?;
        lifecycle::ensure_unpaused(&pool)?;
        let ctx = PoolContext::new(&pool, &ledger, self.rates.as_ref())?;
        let (result, _) = engine::add_liquidity(&self.config, &ctx, &params.kind)?;
        Ok(result)
    }

    /// Result `remove_liquidity` would return right now, without settling.
    pub fn query_remove_liquidity(
        &self,
        params: &RemoveLiquidityParams,
    ) -> Result<RemoveLiquidityResult, Error> {
        let (pool, ledger) = self.copy(params.pool)?;
        lifecycle::ensure_initialized(&pool)?;
        lifecycle::ensure_unpaused(&pool)?;
        let ctx = PoolContext::new(&pool, &ledger, self.rates.as_ref())?;
        let (result, _) = engine::remove_liquidity(&self.config, &ctx, &params.kind)?;
        Ok(result)
    }

    /// Appends a token seeded with `initial_balance`. No shares are minted,
    /// so the seed accrues to the existing share holders. A seed the
    /// invariant cannot be solved for is rejected.
    pub fn add_token_to_pool(
        &self,
        pool: H160,
        token: TokenConfig,
        initial_balance: U256,
    ) -> Result<(), Error> {
        let record = self.record(pool)?;
        let mut record = lock(&record);
        lifecycle::validate_token_addition(
            &self.config,
            &record.pool,
            &record.ledger,
            &token,
            initial_balance,
            self.rates.as_ref(),
        )?;

        let address = token.token;
        record.ledger.push_token(initial_balance);
        record.pool.tokens.push(token);
        let index = record.pool.tokens.len() - 1;

        tracing::info!(?pool, token = ?address, index, "added token to pool");
        self.events.publish(VaultEvent::TokenAdded {
            pool,
            token: address,
            index,
            initial_balance,
        });
        Ok(())
    }

    pub fn set_pool_paused(&self, pool: H160, caller: H160, paused: bool) -> Result<(), Error> {
        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default();
        let record = self.record(pool)?;
        let mut record = lock(&record);
        lifecycle::ensure_can_set_paused(&record.pool, caller, paused, now)?;
        record.pool.paused = paused;

        tracing::info!(?pool, paused, "pool paused state changed");
        self.events
            .publish(VaultEvent::PoolPausedStateChanged { pool, paused });
        Ok(())
    }

    pub fn set_static_swap_fee(&self, pool: H160, caller: H160, swap_fee: Bfp) -> Result<(), Error> {
        let record = self.record(pool)?;
        let mut record = lock(&record);
        lifecycle::ensure_can_set_swap_fee(&self.config, &record.pool, caller, swap_fee)?;
        record.pool.swap_fee = swap_fee;

        tracing::info!(?pool, %swap_fee, "swap fee changed");
        self.events
            .publish(VaultEvent::SwapFeePercentageChanged { pool, swap_fee });
        Ok(())
    }

    pub fn pool_state(&self, pool: H160) -> Result<PoolSnapshot, Error> {
        let (pool, ledger) = self.copy(pool)?;
        let ctx = PoolContext::new(&pool, &ledger, self.rates.as_ref())?;
        let invariant = if ledger.total_supply().is_zero() {
            U256::zero()
        } else {
            ctx.curve.compute_invariant(&ctx.live_balances, Rounding::Down)?
        };
        let live_balances = ctx.live_balances;
        Ok(PoolSnapshot {
            balances: ledger.balances().to_vec(),
            live_balances,
            total_supply: ledger.total_supply(),
            invariant,
            pool,
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            events::MockEventSink,
            pools::{AmplificationParameter, LiquidityManagement, RoleAccounts, TokenType},
            rates::StaticRateProviders,
        },
        number::bfp,
    };

    fn registration() -> PoolRegistration {
        PoolRegistration {
            pool: H160([0xaa; 20]),
            tokens: [1, 2]
                .into_iter()
                .map(|byte| TokenConfig {
                    token: H160([byte; 20]),
                    token_type: TokenType::Standard,
                    rate_provider: None,
                    pays_yield_fees: false,
                    chain_id: None,
                    decimals: 18,
                })
                .collect(),
            swap_fee: bfp!("0.001"),
            amplification_parameter: AmplificationParameter::from_value(100).unwrap(),
            pause_window_end_time: u64::MAX,
            protocol_fee_exempt: true,
            role_accounts: RoleAccounts {
                pause_manager: H160([0x01; 20]),
                swap_fee_manager: H160([0x02; 20]),
                pool_creator: H160([0x03; 20]),
            },
            hooks: None,
            liquidity_management: LiquidityManagement::default(),
        }
    }

    #[test]
    fn publishes_registration_once() {
        let mut events = MockEventSink::new();
        events
            .expect_publish()
            .withf(|event| matches!(event, VaultEvent::PoolRegistered { .. }))
            .times(1)
            .return_const(());
        let vault = Vault::new(
            Config::default(),
            Arc::new(StaticRateProviders::default()),
            Arc::new(events),
        );

        vault.register_pool(registration()).unwrap();
        assert!(matches!(
            vault.register_pool(registration()),
            Err(Error::Lifecycle(LifecycleError::AlreadyRegistered(_)))
        ));
        assert_eq!(
            vault.registration_state(H160([0xaa; 20])),
            RegistrationState::Registered
        );
        assert_eq!(
            vault.registration_state(H160([0xbb; 20])),
            RegistrationState::Unregistered
        );
    }

    #[test]
    fn failed_operations_publish_nothing() {
        let mut events = MockEventSink::new();
        events
            .expect_publish()
            .withf(|event| matches!(event, VaultEvent::PoolRegistered { .. }))
            .times(1)
            .return_const(());
        let vault = Vault::new(
            Config::default(),
            Arc::new(StaticRateProviders::default()),
            Arc::new(events),
        );
        vault.register_pool(registration()).unwrap();

        let pool = H160([0xaa; 20]);
        assert!(matches!(
            vault.set_pool_paused(pool, H160([0x02; 20]), true),
            Err(Error::Lifecycle(LifecycleError::SenderNotAllowed { .. }))
        ));
        assert!(matches!(
            vault.add_token_to_pool(pool, registration().tokens[0].clone(), U256::one()),
            Err(Error::Lifecycle(LifecycleError::PoolNotInitialized(_)))
        ));
        assert!(matches!(
            vault.pool_state(H160([0xbb; 20])),
            Err(Error::Lifecycle(LifecycleError::NotRegistered(_)))
        ));

        let state = vault.pool_state(pool).unwrap();
        assert_eq!(state.total_supply, U256::zero());
        assert_eq!(state.invariant, U256::zero());
        assert_eq!(state.balances, vec![U256::zero(); 2]);
    }
}
