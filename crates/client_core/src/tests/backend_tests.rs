use super::*;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ServerState {
    calls: Arc<Mutex<Vec<BackendCall>>>,
}

fn agent_json() -> Value {
    json!({
        "id": "AID1",
        "name": "Meena",
        "mobile": "9876543210",
        "email": "meena@example.com",
        "passwordHash": "5e884898",
        "status": {"approved": null}
    })
}

async fn handle_call(State(state): State<ServerState>, Json(call): Json<BackendCall>) -> Response {
    state.calls.lock().await.push(call.clone());
    let body = match call {
        BackendCall::AgentLogin { otp, .. } if otp == "123456" => {
            json!({"__kind__": "ok", "ok": agent_json()})
        }
        BackendCall::AgentLogin { .. } => json!({"__kind__": "err", "err": "Invalid OTP"}),
        BackendCall::ListAllAgents => json!([agent_json()]),
        BackendCall::GetApplicationByAckNumber { .. } => Value::Null,
        BackendCall::SubmitFarmerApplication { .. } => json!("20240001234567"),
        BackendCall::VerifyManagerOtp { .. } => json!({"__kind__": "ok", "ok": "mgr-token"}),
        BackendCall::ListAllApplications => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiError::new(ErrorCode::Unauthorized, "session expired")),
            )
                .into_response();
        }
        BackendCall::RequestManagerOtp { .. } => {
            return (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response();
        }
        _ => Value::Null,
    };
    Json(body).into_response()
}

async fn spawn_backend_server() -> Result<(String, ServerState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::default();
    let app = Router::new()
        .route("/api/call", post(handle_call))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/api"), state))
}

#[test]
fn endpoint_keeps_base_path() {
    let backend = HttpBackend::new("http://127.0.0.1:9000/api").expect("backend");
    assert_eq!(backend.endpoint().as_str(), "http://127.0.0.1:9000/api/call");

    let backend = HttpBackend::new("http://127.0.0.1:9000").expect("backend");
    assert_eq!(backend.endpoint().as_str(), "http://127.0.0.1:9000/call");
}

#[test]
fn rejects_unparsable_base_url() {
    assert!(matches!(
        HttpBackend::new("not a url"),
        Err(ClientError::InvalidUrl(_))
    ));
}

#[tokio::test]
async fn agent_login_decodes_ok_outcome() {
    let (url, _state) = spawn_backend_server().await.expect("spawn server");
    let backend = HttpBackend::new(&url).expect("backend");

    let agent = backend
        .agent_login(&AgentId::new("AID1"), "123456")
        .await
        .expect("login");
    assert_eq!(agent.id, AgentId::new("AID1"));
    assert_eq!(agent.name, "Meena");
}

#[tokio::test]
async fn agent_login_surfaces_rejection_reason() {
    let (url, _state) = spawn_backend_server().await.expect("spawn server");
    let backend = HttpBackend::new(&url).expect("backend");

    let err = backend
        .agent_login(&AgentId::new("AID1"), "000000")
        .await
        .expect_err("must be rejected");
    assert!(matches!(&err, ClientError::Rejected(reason) if reason == "Invalid OTP"));
    assert_eq!(err.to_string(), "Invalid OTP");
}

#[tokio::test]
async fn reads_lists_and_absent_records() {
    let (url, _state) = spawn_backend_server().await.expect("spawn server");
    let backend = HttpBackend::new(&url).expect("backend");

    let agents = backend.list_all_agents().await.expect("agents");
    assert_eq!(agents.len(), 1);

    let missing = backend
        .get_application_by_ack_number(&AckNumber::new("nope"))
        .await
        .expect("lookup");
    assert_eq!(missing, None);
}

#[tokio::test]
async fn status_updates_use_backend_encodings() {
    let (url, state) = spawn_backend_server().await.expect("spawn server");
    let backend = HttpBackend::new(&url).expect("backend");

    backend
        .update_agent_status(&AgentId::new("AID1"), Status::Approved)
        .await
        .expect("update agent");
    backend
        .update_application_status(&AckNumber::new("ACK001"), Status::Rejected)
        .await
        .expect("update application");

    let calls = state.calls.lock().await;
    assert_eq!(
        calls[0],
        BackendCall::UpdateAgentStatus {
            agent_id: AgentId::new("AID1"),
            status: json!({"approved": null}),
        }
    );
    assert_eq!(
        calls[1],
        BackendCall::UpdateApplicationStatus {
            ack_number: AckNumber::new("ACK001"),
            status: json!("rejected"),
        }
    );
}

#[tokio::test]
async fn submit_returns_acknowledgment_number() {
    let (url, _state) = spawn_backend_server().await.expect("spawn server");
    let backend = HttpBackend::new(&url).expect("backend");

    let ack = backend
        .submit_farmer_application(&AgentId::new("AID1"), &FarmerApplicationForm::default())
        .await
        .expect("submit");
    assert_eq!(ack, AckNumber::new("20240001234567"));

    let token = backend
        .verify_manager_otp("ops@example.com", "654321")
        .await
        .expect("verify");
    assert_eq!(token, "mgr-token");
}

#[tokio::test]
async fn error_status_maps_to_api_error() {
    let (url, _state) = spawn_backend_server().await.expect("spawn server");
    let backend = HttpBackend::new(&url).expect("backend");

    let err = backend
        .list_all_applications()
        .await
        .expect_err("must fail");
    assert!(err.is_unauthorized(), "unexpected error: {err}");

    let err = backend
        .request_manager_otp("ops@example.com")
        .await
        .expect_err("must fail");
    match err {
        ClientError::Api(api) => {
            assert!(matches!(api.code, ErrorCode::Internal));
            assert!(api.message.contains("requestManagerOtp"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
