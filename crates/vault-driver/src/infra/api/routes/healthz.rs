use crate::infra::api::State;

pub(in crate::infra::api) fn healthz(router: axum::Router<State>) -> axum::Router<State> {
    router.route("/healthz", axum::routing::get(route))
}

async fn route() -> hyper::StatusCode {
    hyper::StatusCode::OK
}
