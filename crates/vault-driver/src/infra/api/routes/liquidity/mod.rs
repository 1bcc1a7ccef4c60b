use {
    crate::infra::api::{
        State,
        error::{self, VaultError},
    },
    axum::extract::Path,
    hyper::StatusCode,
    primitive_types::H160,
    tracing::Instrument,
};

mod dto;

pub use dto::*;

type Response<T> = Result<T, (StatusCode, axum::Json<error::Error>)>;

/// Register the liquidity routes with the router. The query routes solve the
/// same operations against a copy of the pool without settling them.
pub(in crate::infra::api) fn liquidity(router: axum::Router<State>) -> axum::Router<State> {
    router
        .route(
            "/api/v1/pools/:pool/initialize",
            axum::routing::post(initialize),
        )
        .route(
            "/api/v1/pools/:pool/add-liquidity",
            axum::routing::post(add_liquidity),
        )
        .route(
            "/api/v1/pools/:pool/remove-liquidity",
            axum::routing::post(remove_liquidity),
        )
        .route(
            "/api/v1/pools/:pool/query/add-liquidity",
            axum::routing::post(query_add_liquidity),
        )
        .route(
            "/api/v1/pools/:pool/query/remove-liquidity",
            axum::routing::post(query_remove_liquidity),
        )
}

async fn initialize(
    state: axum::extract::State<State>,
    Path(pool): Path<H160>,
    req: axum::Json<Initialize>,
) -> Response<axum::Json<Initialized>> {
    let params = req.0.into_domain(pool);
    let handle_request = async {
        let bpt_amount_out = state.vault().initialize_pool(params)?;
        Ok::<_, VaultError>(axum::Json(Initialized { bpt_amount_out }))
    };

    handle_request
        .instrument(tracing::info_span!("/api/v1/pools/initialize", ?pool))
        .await
        .map_err(Into::into)
}

async fn add_liquidity(
    state: axum::extract::State<State>,
    Path(pool): Path<H160>,
    req: axum::Json<AddLiquidity>,
) -> Response<axum::Json<AddLiquidityResult>> {
    let params = req.0.into_domain(pool);
    let kind = params.kind.operation();
    let handle_request = async {
        let result = state.vault().add_liquidity(params)?;
        Ok::<_, VaultError>(axum::Json(AddLiquidityResult::from(result)))
    };

    handle_request
        .instrument(tracing::info_span!(
            "/api/v1/pools/add-liquidity",
            ?pool,
            %kind
        ))
        .await
        .map_err(Into::into)
}

async fn remove_liquidity(
    state: axum::extract::State<State>,
    Path(pool): Path<H160>,
    req: axum::Json<RemoveLiquidity>,
) -> Response<axum::Json<RemoveLiquidityResult>> {
    let params = req.0.into_domain(pool);
    let kind = params.kind.operation();
    let handle_request = async {
        let result = state.vault().remove_liquidity(params)?;
        Ok::<_, VaultError>(axum::Json(RemoveLiquidityResult::from(result)))
    };

    handle_request
        .instrument(tracing::info_span!(
            "/api/v1/pools/remove-liquidity",
            ?pool,
            %kind
        ))
        .await
        .map_err(Into::into)
}

async fn query_add_liquidity(
    state: axum::extract::State<State>,
    Path(pool): Path<H160>,
    req: axum::Json<AddLiquidity>,
) -> Response<axum::Json<AddLiquidityResult>> {
    let params = req.0.into_domain(pool);
    let result = state
        .vault()
        .query_add_liquidity(&params)
        .map_err(VaultError)?;
    Ok(axum::Json(AddLiquidityResult::from(result)))
}

async fn query_remove_liquidity(
    state: axum::extract::State<State>,
    Path(pool): Path<H160>,
    req: axum::Json<RemoveLiquidity>,
) -> Response<axum::Json<RemoveLiquidityResult>> {
    let params = req.0.into_domain(pool);
    let result = state
        .vault()
        .query_remove_liquidity(&params)
        .map_err(VaultError)?;
    Ok(axum::Json(RemoveLiquidityResult::from(result)))
}
