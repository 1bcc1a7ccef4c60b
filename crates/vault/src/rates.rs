//! Rates of tokens whose value drifts against their amount, such as
//! interest bearing wrappers.

use {dashmap::DashMap, number::Bfp, primitive_types::H160};

/// Source of token rates, keyed by the rate provider address configured for
/// the token.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait RateProviding: Send + Sync {
    /// Current rate with 18 decimals, `None` if the provider is unknown.
    fn rate(&self, provider: H160) -> Option<Bfp>;
}

/// Rates set explicitly, e.g. from configuration or by an operator.
#[derive(Debug, Default)]
pub struct StaticRateProviders(DashMap<H160, Bfp>);

impl StaticRateProviders {
    pub fn new(rates: impl IntoIterator<Item = (H160, Bfp)>) -> Self {
        Self(rates.into_iter().collect())
    }

    pub fn set_rate(&self, provider: H160, rate: Bfp) {
        tracing::debug!(?provider, %rate, "updating rate");
        self.0.insert(provider, rate);
    }
}

impl RateProviding for StaticRateProviders {
    fn rate(&self, provider: H160) -> Option<Bfp> {
        self.0.get(&provider).map(|rate| *rate)
    }
}
