use {
    crate::infra::dto::TokenConfig,
    number::{U256, serialization::HexOrDecimalU256},
    primitive_types::H160,
    serde::{Deserialize, Serialize},
    serde_with::serde_as,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pools {
    pub pools: Vec<H160>,
}

#[serde_as]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolState {
    pub pool: H160,
    pub state: String,
    pub tokens: Vec<TokenConfig>,
    #[serde_as(as = "HexOrDecimalU256")]
    pub swap_fee: U256,
    pub amplification_parameter: AmplificationParameter,
    pub paused: bool,
    pub pause_window_end_time: u64,
    /// Raw token balances.
    #[serde_as(as = "Vec<HexOrDecimalU256>")]
    pub balances: Vec<U256>,
    /// Balances scaled to 18 decimals with rates applied.
    #[serde_as(as = "Vec<HexOrDecimalU256>")]
    pub live_balances: Vec<U256>,
    #[serde_as(as = "HexOrDecimalU256")]
    pub total_supply: U256,
    #[serde_as(as = "HexOrDecimalU256")]
    pub invariant: U256,
}

#[serde_as]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmplificationParameter {
    #[serde_as(as = "HexOrDecimalU256")]
    pub factor: U256,
    #[serde_as(as = "HexOrDecimalU256")]
    pub precision: U256,
}

impl From<vault::PoolSnapshot> for PoolState {
    fn from(snapshot: vault::PoolSnapshot) -> Self {
        let pool = snapshot.pool;
        Self {
            pool: pool.id,
            state: pool.state.to_string(),
            tokens: pool.tokens.iter().map(Into::into).collect(),
            swap_fee: pool.swap_fee.as_uint256(),
            amplification_parameter: AmplificationParameter {
                factor: pool.amplification_parameter.factor(),
                precision: pool.amplification_parameter.precision(),
            },
            paused: pool.paused,
            pause_window_end_time: pool.pause_window_end_time,
            balances: snapshot.balances,
            live_balances: snapshot.live_balances,
            total_supply: snapshot.total_supply,
            invariant: snapshot.invariant,
        }
    }
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddToken {
    pub token: TokenConfig,
    #[serde_as(as = "HexOrDecimalU256")]
    pub initial_balance: U256,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetPaused {
    pub caller: H160,
    pub paused: bool,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetSwapFee {
    pub caller: H160,
    /// 18 decimal fixed point fraction.
    #[serde_as(as = "HexOrDecimalU256")]
    pub swap_fee: U256,
}
