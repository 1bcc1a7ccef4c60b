use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
pub struct Args {
    /// Path to the TOML configuration file listing the vault limits, rate
    /// providers and pools registered at start-up.
    #[clap(long, env)]
    pub config: PathBuf,

    /// The log filter.
    #[clap(long, env, default_value = "warn,vault=debug,vault_driver=debug")]
    pub log: String,

    /// Emit logs as JSON lines.
    #[clap(long, env)]
    pub use_json_logs: bool,
}

#[cfg(test)]
mod tests {
    use {super::*, clap::Parser};

    #[test]
    fn parses_arguments_with_defaults() {
        let args = Args::parse_from(["vault-driver", "--config", "/etc/vault.toml"]);
        assert_eq!(args.config, PathBuf::from("/etc/vault.toml"));
        assert_eq!(args.log, "warn,vault=debug,vault_driver=debug");
        assert!(!args.use_json_logs);

        let args = Args::parse_from([
            "vault-driver",
            "--config",
            "vault.toml",
            "--log",
            "info",
            "--use-json-logs",
        ]);
        assert_eq!(args.log, "info");
        assert!(args.use_json_logs);
    }
}
