use {
    crate::infra::{
        api::{
            State,
            error::{self, VaultError},
        },
        dto::PoolRegistration,
    },
    axum::extract::Path,
    hyper::StatusCode,
    number::Bfp,
    primitive_types::H160,
    tracing::Instrument,
};

mod dto;

pub use dto::*;

type Response<T> = Result<T, (StatusCode, axum::Json<error::Error>)>;

/// Register the pool management routes with the router.
pub(in crate::infra::api) fn pools(router: axum::Router<State>) -> axum::Router<State> {
    router
        .route("/api/v1/pools", axum::routing::get(list).post(register))
        .route("/api/v1/pools/:pool", axum::routing::get(pool_state))
        .route("/api/v1/pools/:pool/tokens", axum::routing::post(add_token))
        .route("/api/v1/pools/:pool/paused", axum::routing::post(set_paused))
        .route(
            "/api/v1/pools/:pool/swap-fee",
            axum::routing::post(set_swap_fee),
        )
}

async fn list(state: axum::extract::State<State>) -> axum::Json<Pools> {
    axum::Json(Pools {
        pools: state.vault().pools(),
    })
}

async fn register(
    state: axum::extract::State<State>,
    req: axum::Json<PoolRegistration>,
) -> Response<(StatusCode, axum::Json<PoolState>)> {
    let pool = req.pool;
    let handle_request = async {
        let registration = req.0.into_domain()?;
        state.vault().register_pool(registration)?;
        let snapshot = state.vault().pool_state(pool)?;
        Ok::<_, VaultError>((StatusCode::CREATED, axum::Json(PoolState::from(snapshot))))
    };

    handle_request
        .instrument(tracing::info_span!("/api/v1/pools", ?pool))
        .await
        .map_err(Into::into)
}

async fn pool_state(
    state: axum::extract::State<State>,
    Path(pool): Path<H160>,
) -> Response<axum::Json<PoolState>> {
    let snapshot = state.vault().pool_state(pool).map_err(VaultError)?;
    Ok(axum::Json(PoolState::from(snapshot)))
}

async fn add_token(
    state: axum::extract::State<State>,
    Path(pool): Path<H160>,
    req: axum::Json<AddToken>,
) -> Response<axum::Json<PoolState>> {
    let handle_request = async {
        let AddToken {
            token,
            initial_balance,
        } = req.0;
        state
            .vault()
            .add_token_to_pool(pool, token.into(), initial_balance)?;
        let snapshot = state.vault().pool_state(pool)?;
        Ok::<_, VaultError>(axum::Json(PoolState::from(snapshot)))
    };

    handle_request
        .instrument(tracing::info_span!("/api/v1/pools/tokens", ?pool))
        .await
        .map_err(Into::into)
}

async fn set_paused(
    state: axum::extract::State<State>,
    Path(pool): Path<H160>,
    req: axum::Json<SetPaused>,
) -> Response<StatusCode> {
    let SetPaused { caller, paused } = req.0;
    state
        .vault()
        .set_pool_paused(pool, caller, paused)
        .map_err(VaultError)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_swap_fee(
    state: axum::extract::State<State>,
    Path(pool): Path<H160>,
    req: axum::Json<SetSwapFee>,
) -> Response<StatusCode> {
    let SetSwapFee { caller, swap_fee } = req.0;
    state
        .vault()
        .set_static_swap_fee(pool, caller, Bfp::from_wei(swap_fee))
        .map_err(VaultError)?;
    Ok(StatusCode::NO_CONTENT)
}
