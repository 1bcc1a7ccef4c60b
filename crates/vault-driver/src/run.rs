use {
    crate::infra::{self, Api, cli},
    anyhow::Context,
    clap::Parser,
    std::{future::Future, sync::Arc},
};

/// Parse command line arguments, set up logging and run the driver until it
/// is asked to shut down.
pub async fn start(args: impl IntoIterator<Item = String>) {
    let args = cli::Args::parse_from(args);
    observe::tracing::initialize(&args.log, args.use_json_logs);
    tracing::info!("running vault driver with {args:#?}");

    if let Err(err) = run(args, shutdown_signal()).await {
        tracing::error!(?err, "vault driver failed");
        std::process::exit(1);
    }
}

/// Run the driver with parsed arguments until `shutdown` resolves.
pub async fn run(
    args: cli::Args,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let config = infra::config::file::load(&args.config).await?;

    let (sink, events) = vault::ChannelEventSink::new();
    let event_logger = infra::events::spawn_logger(events);
    let rates = Arc::new(vault::StaticRateProviders::new(config.rate_providers));
    let vault = Arc::new(vault::Vault::new(config.vault, rates, Arc::new(sink)));

    for registration in config.pools {
        let pool = registration.pool;
        vault
            .register_pool(registration)
            .with_context(|| format!("failed to register configured pool {pool:?}"))?;
    }

    Api {
        addr: config.addr,
        vault,
    }
    .serve(shutdown)
    .await
    .context("vault API server failed")?;

    // Dropping the vault with the server closes the event stream.
    event_logger.await.context("event logger panicked")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(?err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
