use super::*;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use tokio::{net::TcpListener, sync::Mutex};

const REDEEM_PATH: &str = "/wp-json/delportal/v1/Navidad_Pavos_Canje";

#[derive(Clone)]
struct RedeemServerState {
    received: Arc<Mutex<Vec<serde_json::Value>>>,
}

async fn handle_redeem(
    State(state): State<RedeemServerState>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    state.received.lock().await.push(body.clone());
    let code = body["codigo_barras"].as_str().unwrap_or_default().to_string();
    match code.as_str() {
        "ABC123" => (
            StatusCode::OK,
            serde_json::json!({ "success": true, "message": "Turkey redeemed" }).to_string(),
        ),
        "DUPLICATE1" => (
            StatusCode::OK,
            serde_json::json!({ "success": false, "message": "Code already redeemed" })
                .to_string(),
        ),
        "GARBLED" => (StatusCode::OK, "<html>maintenance</html>".to_string()),
        "SLOW" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            (
                StatusCode::OK,
                serde_json::json!({ "success": true }).to_string(),
            )
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
    }
}

async fn spawn_redeem_server() -> anyhow::Result<(Url, RedeemServerState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = RedeemServerState {
        received: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route(REDEEM_PATH, post(handle_redeem))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((Url::parse(&format!("http://{addr}{REDEEM_PATH}"))?, state))
}

fn gateway(endpoint: Url, timeout: Duration) -> ReqwestGateway {
    ReqwestGateway::new(endpoint, timeout).expect("gateway")
}

fn request(code: &str) -> RedeemRequest {
    RedeemRequest::new(code).expect("request")
}

#[tokio::test]
async fn posts_barcode_under_wire_field_name() {
    let (endpoint, state) = spawn_redeem_server().await.expect("server");
    let gateway = gateway(endpoint.clone(), Duration::from_secs(5));
    assert_eq!(gateway.endpoint(), &endpoint);

    let response = gateway.redeem(&request("ABC123")).await.expect("response");

    assert!(response.success);
    assert_eq!(response.message(), Some("Turkey redeemed"));
    assert_eq!(
        state.received.lock().await.as_slice(),
        &[serde_json::json!({ "codigo_barras": "ABC123" })]
    );
}

#[tokio::test]
async fn business_rejection_is_a_response_not_an_error() {
    let (endpoint, _state) = spawn_redeem_server().await.expect("server");
    let gateway = gateway(endpoint, Duration::from_secs(5));

    let response = gateway
        .redeem(&request("DUPLICATE1"))
        .await
        .expect("response");

    assert!(!response.success);
    assert_eq!(response.message(), Some("Code already redeemed"));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let (endpoint, _state) = spawn_redeem_server().await.expect("server");
    let gateway = gateway(endpoint, Duration::from_secs(5));

    let err = gateway
        .redeem(&request("UNKNOWN"))
        .await
        .expect_err("status error");

    assert_eq!(err, GatewayError::Status(500));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let (endpoint, _state) = spawn_redeem_server().await.expect("server");
    let gateway = gateway(endpoint, Duration::from_secs(5));

    let err = gateway
        .redeem(&request("GARBLED"))
        .await
        .expect_err("malformed");

    assert!(matches!(err, GatewayError::MalformedBody(_)));
}

#[tokio::test]
async fn slow_server_hits_request_timeout() {
    let (endpoint, _state) = spawn_redeem_server().await.expect("server");
    let gateway = gateway(endpoint, Duration::from_millis(200));

    let err = gateway.redeem(&request("SLOW")).await.expect_err("timeout");

    assert_eq!(err, GatewayError::Timeout);
}

#[tokio::test]
async fn closed_port_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let endpoint = Url::parse(&format!("http://{addr}{REDEEM_PATH}")).expect("url");
    let err = gateway(endpoint, Duration::from_secs(5))
        .redeem(&request("ABC123"))
        .await
        .expect_err("transport error");

    assert!(matches!(err, GatewayError::Transport(_)));
}
