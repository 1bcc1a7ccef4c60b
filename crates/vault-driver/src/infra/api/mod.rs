use {
    std::{future::Future, net::SocketAddr, sync::Arc},
    vault::Vault,
};

pub mod error;
mod routes;

const REQUEST_BODY_LIMIT: usize = 1024 * 1024;

pub struct Api {
    pub addr: SocketAddr,
    pub vault: Arc<Vault>,
}

impl Api {
    /// Serve the vault API until `shutdown` resolves.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), hyper::Error> {
        let server = axum::Server::bind(&self.addr).serve(router(self.vault).into_make_service());
        tracing::info!(addr = %server.local_addr(), "serving vault api");
        server.with_graceful_shutdown(shutdown).await
    }
}

/// The complete router with all vault routes installed.
pub fn router(vault: Arc<Vault>) -> axum::Router {
    let state = State(Arc::new(Inner { vault }));
    let router = axum::Router::new();
    let router = routes::healthz(router);
    let router = routes::pools(router);
    let router = routes::liquidity(router);
    router
        .layer(axum::extract::DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Clone)]
struct State(Arc<Inner>);

impl State {
    fn vault(&self) -> &Vault {
        &self.0.vault
    }
}

struct Inner {
    vault: Arc<Vault>,
}
