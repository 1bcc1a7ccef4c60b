use {
    hyper::{Body, Method, Request, StatusCode, header::CONTENT_TYPE},
    serde_json::{Value, json},
    std::sync::Arc,
    tower::ServiceExt,
    vault::{Config, StaticRateProviders, TracingEventSink, Vault},
};

const POOL: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const RECIPIENT: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
const PAUSE_MANAGER: &str = "0x0101010101010101010101010101010101010101";

fn router() -> axum::Router {
    observe::tracing::initialize_reentrant("vault=debug,vault_driver=debug");
    let vault = Vault::new(
        Config::default(),
        Arc::new(StaticRateProviders::default()),
        Arc::new(TracingEventSink),
    );
    vault_driver::infra::api::router(Arc::new(vault))
}

async fn call(app: &axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(body) => Body::from(body.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn registration() -> Value {
    json!({
        "pool": POOL,
        "tokens": [
            { "address": "0x1111111111111111111111111111111111111111", "decimals": 18 },
            { "address": "0x2222222222222222222222222222222222222222", "decimals": 18 },
            { "address": "0x3333333333333333333333333333333333333333", "decimals": 18 },
        ],
        "swapFee": "1000000000000",
        "amplificationParameter": 200,
        "pauseWindowEndTime": u64::MAX,
        "roleAccounts": { "pauseManager": PAUSE_MANAGER },
    })
}

/// Registers and initializes the pool at [100, 100, 100].
async fn seeded() -> axum::Router {
    let app = router();
    let (status, _) = call(&app, Method::POST, "/api/v1/pools", Some(registration())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/v1/pools/{POOL}/initialize"),
        Some(json!({
            "recipient": RECIPIENT,
            "exactAmountsIn": ["100000000000000000000", "100000000000000000000", "100000000000000000000"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    app
}

#[tokio::test]
async fn healthz() {
    let app = router();
    let (status, _) = call(&app, Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn registers_and_initializes_pool() {
    let app = router();

    let (status, body) = call(&app, Method::POST, "/api/v1/pools", Some(registration())).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["state"], "REGISTERED");
    assert_eq!(body["swapFee"], "1000000000000");
    assert_eq!(body["amplificationParameter"]["factor"], "200");
    assert_eq!(body["totalSupply"], "0");

    let (status, body) = call(&app, Method::POST, "/api/v1/pools", Some(registration())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "lifecycle");

    let (status, body) = call(&app, Method::GET, "/api/v1/pools", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pools"], json!([POOL]));

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/v1/pools/{POOL}/initialize"),
        Some(json!({
            "recipient": RECIPIENT,
            "exactAmountsIn": ["100000000000000000000", "100000000000000000000", "100000000000000000000"],
            "minBptAmountOut": "1",
            "userData": "0xcafe",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["bptAmountOut"], "299999999999999000000");

    let (status, body) = call(&app, Method::GET, &format!("/api/v1/pools/{POOL}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "INITIALIZED");
    assert_eq!(body["totalSupply"], "300000000000000000000");
    assert_eq!(body["invariant"], "300000000000000000000");
    assert_eq!(body["balances"], json!(["100000000000000000000", "100000000000000000000", "100000000000000000000"]));

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/v1/pools/{POOL}/initialize"),
        Some(json!({
            "recipient": RECIPIENT,
            "exactAmountsIn": ["100000000000000000000", "100000000000000000000", "100000000000000000000"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "lifecycle");
}

#[tokio::test]
async fn rejects_invalid_registrations() {
    let app = router();

    let mut registration = registration();
    registration["swapFee"] = json!("200000000000000000");
    let (status, body) = call(&app, Method::POST, "/api/v1/pools", Some(registration)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
    assert_eq!(body["retryable"], false);

    let (status, _) = call(&app, Method::GET, "/api/v1/pools", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/pools",
        Some(json!({ "pool": POOL })),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn unknown_pool_is_not_found() {
    let app = router();
    let (status, body) = call(&app, Method::GET, &format!("/api/v1/pools/{POOL}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "lifecycle");
}

#[tokio::test]
async fn query_matches_settled_operation() {
    let app = seeded().await;
    let request = json!({
        "recipient": RECIPIENT,
        "kind": "proportional",
        "maxAmountsIn": ["11000000000000000000", "11000000000000000000", "11000000000000000000"],
        "exactBptAmountOut": "30000000000000000000",
    });

    let (status, quoted) = call(
        &app,
        Method::POST,
        &format!("/api/v1/pools/{POOL}/query/add-liquidity"),
        Some(request.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{quoted}");
    assert_eq!(quoted["amountsIn"], json!(["10000000000000000000", "10000000000000000000", "10000000000000000000"]));
    assert_eq!(quoted["bptAmountOut"], "30000000000000000000");

    let (_, state) = call(&app, Method::GET, &format!("/api/v1/pools/{POOL}"), None).await;
    assert_eq!(state["totalSupply"], "300000000000000000000");

    let (status, settled) = call(
        &app,
        Method::POST,
        &format!("/api/v1/pools/{POOL}/add-liquidity"),
        Some(request),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settled, quoted);

    let (_, state) = call(&app, Method::GET, &format!("/api/v1/pools/{POOL}"), None).await;
    assert_eq!(state["totalSupply"], "330000000000000000000");
    assert_eq!(state["balances"], json!(["110000000000000000000", "110000000000000000000", "110000000000000000000"]));
}

#[tokio::test]
async fn slippage_is_precondition_failed() {
    let app = seeded().await;

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/v1/pools/{POOL}/remove-liquidity"),
        Some(json!({
            "recipient": RECIPIENT,
            "kind": "proportional",
            "exactBptAmountIn": "30000000000000000000",
            "minAmountsOut": ["10000000000000000001", "0", "0"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["kind"], "slippage");
    assert_eq!(body["retryable"], true);

    let (_, state) = call(&app, Method::GET, &format!("/api/v1/pools/{POOL}"), None).await;
    assert_eq!(state["totalSupply"], "300000000000000000000");

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/v1/pools/{POOL}/remove-liquidity"),
        Some(json!({
            "recipient": RECIPIENT,
            "kind": "proportional",
            "exactBptAmountIn": "30000000000000000000",
            "minAmountsOut": ["10000000000000000000", "10000000000000000000", "10000000000000000000"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["amountsOut"], json!(["10000000000000000000", "10000000000000000000", "10000000000000000000"]));
}

#[tokio::test]
async fn paused_pool_rejects_liquidity() {
    let app = seeded().await;
    let paused = |caller: &str, paused: bool| json!({ "caller": caller, "paused": paused });

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/v1/pools/{POOL}/paused"),
        Some(paused(RECIPIENT, true)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/v1/pools/{POOL}/paused"),
        Some(paused(PAUSE_MANAGER, true)),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/v1/pools/{POOL}/add-liquidity"),
        Some(json!({
            "recipient": RECIPIENT,
            "kind": "unbalanced",
            "exactAmountsIn": ["1000000000000000000", "0", "0"],
            "minBptAmountOut": "0",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "lifecycle");

    let (_, state) = call(&app, Method::GET, &format!("/api/v1/pools/{POOL}"), None).await;
    assert_eq!(state["paused"], true);
}
