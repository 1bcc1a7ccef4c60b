use {
    crate::infra::dto,
    anyhow::Context,
    number::{Bfp, U256, serialization::HexOrDecimalU256},
    primitive_types::H160,
    serde::Deserialize,
    serde_with::{DisplayFromStr, serde_as},
    std::{net::SocketAddr, path::Path},
};

/// Load the driver configuration from a TOML file.
pub async fn load(path: &Path) -> anyhow::Result<super::Config> {
    let data = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("I/O error while reading {path:?}"))?;
    parse(&data).with_context(|| format!("invalid configuration in {path:?}"))
}

fn parse(data: &str) -> anyhow::Result<super::Config> {
    let config: Config = toml::de::from_str(data).context("TOML syntax error")?;

    let defaults = vault::Config::default();
    let vault = vault::Config {
        min_swap_fee: config
            .vault
            .min_swap_fee
            .map(Bfp::from_wei)
            .unwrap_or(defaults.min_swap_fee),
        max_swap_fee: config
            .vault
            .max_swap_fee
            .map(Bfp::from_wei)
            .unwrap_or(defaults.max_swap_fee),
        minimum_trade_amount: config
            .vault
            .minimum_trade_amount
            .unwrap_or(defaults.minimum_trade_amount),
    };
    anyhow::ensure!(
        vault.min_swap_fee <= vault.max_swap_fee,
        "minimum swap fee {} exceeds maximum {}",
        vault.min_swap_fee,
        vault.max_swap_fee,
    );

    let pools = config
        .pools
        .into_iter()
        .map(|pool| {
            let address = pool.pool;
            pool.into_domain()
                .with_context(|| format!("invalid pool {address:?}"))
        })
        .collect::<anyhow::Result<_>>()?;

    Ok(super::Config {
        addr: config.bind_addr,
        vault,
        rate_providers: config
            .rate_providers
            .into_iter()
            .map(|provider| (provider.address, provider.rate))
            .collect(),
        pools,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct Config {
    #[serde(default = "default_bind_addr")]
    bind_addr: SocketAddr,

    /// Limits applied to every pool.
    #[serde(default)]
    vault: VaultConfig,

    #[serde(default)]
    rate_providers: Vec<RateProvider>,

    /// Pools registered at start-up, in the same shape as the registration
    /// request of the API.
    #[serde(default)]
    pools: Vec<dto::PoolRegistration>,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 11088))
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct VaultConfig {
    #[serde_as(as = "Option<HexOrDecimalU256>")]
    min_swap_fee: Option<U256>,
    #[serde_as(as = "Option<HexOrDecimalU256>")]
    max_swap_fee: Option<U256>,
    #[serde_as(as = "Option<HexOrDecimalU256>")]
    minimum_trade_amount: Option<U256>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RateProvider {
    address: H160,
    /// Decimal rate such as `"1.05"`.
    #[serde_as(as = "DisplayFromStr")]
    rate: Bfp,
}
