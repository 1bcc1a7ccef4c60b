use {number::Bfp, primitive_types::H160, std::net::SocketAddr};

pub mod file;

/// Driver configuration resolved from the configuration file.
#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub vault: vault::Config,
    /// Initial rates keyed by rate provider address.
    pub rate_providers: Vec<(H160, Bfp)>,
    /// Pools registered before the API starts serving.
    pub pools: Vec<vault::PoolRegistration>,
}
