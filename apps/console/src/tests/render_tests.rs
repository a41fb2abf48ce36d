use super::*;

use client_core::{views::ListView, Route};
use serde_json::json;
use shared::{
    domain::{AckNumber, Agent, AgentId, FarmerApplication},
    error::{ApiError, ErrorCode},
};

fn agent(id: &str, name: &str, status: serde_json::Value) -> Agent {
    Agent {
        id: AgentId::new(id),
        name: name.into(),
        mobile: "9000000000".into(),
        email: format!("{id}@example.com"),
        password_hash: String::new(),
        status,
    }
}

fn application(ack: &str) -> FarmerApplication {
    FarmerApplication {
        acknowledgment_number: AckNumber::new(ack),
        agent_id: AgentId::new("AID1"),
        farmer_name: "Sita Devi".into(),
        mobile: "9000000001".into(),
        address: "Village Road".into(),
        aadhaar_number: "123412341234".into(),
        pan_number: "ABCDE1234F".into(),
        other_details: String::new(),
        document_references: Vec::new(),
        submitted_at: 1_709_649_000_000_000_000,
        status: json!("approved"),
    }
}

fn agent_page(rows: Vec<Agent>) -> Page {
    Page {
        route: Route::AgentApproval,
        screen: Screen::AgentApproval(ListView {
            rows: rows.into_iter().map(AgentRow::from).collect(),
            status: QueryStatus::Success,
            error: None,
        }),
    }
}

#[test]
fn agent_list_shows_badges_and_the_busy_row() {
    let page = agent_page(vec![
        agent("AID1", "Ravi", json!({"approved": null})),
        agent("AID2", "Meena", json!({"__kind__": "suspended"})),
    ]);
    let marker = ProcessingMarker::new();
    let _busy = marker.begin("AID2");

    let out = render_page(&page, &marker);
    assert!(out.starts_with("== /manager/agent-approval =="));
    let ravi = out.lines().find(|l| l.contains("Ravi")).expect("ravi row");
    assert!(ravi.contains("[Approved]") && !ravi.contains("processing"));
    let meena = out.lines().find(|l| l.contains("Meena")).expect("meena row");
    assert!(meena.contains("[Pending] (processing)"));
}

#[test]
fn search_renders_only_matching_rows() {
    let page = agent_page(vec![
        agent("AID1", "Ravi", json!("pending")),
        agent("AID2", "Meena", json!("pending")),
    ]);
    let out = render_search(&page, &ProcessingMarker::new(), "meena").expect("list page");
    assert!(out.contains("Meena"));
    assert!(!out.contains("Ravi"));

    let none = render_search(&page, &ProcessingMarker::new(), "zzz").expect("list page");
    assert_eq!(none, "No agents.\n");

    let login = Page {
        route: Route::AgentLogin,
        screen: Screen::AgentLogin,
    };
    assert!(render_search(&login, &ProcessingMarker::new(), "x").is_none());
}

#[test]
fn failed_list_reports_the_error() {
    let page = Page {
        route: Route::FarmerApproval,
        screen: Screen::FarmerApproval(ListView {
            rows: Vec::new(),
            status: QueryStatus::Error,
            error: Some("backend down".into()),
        }),
    };
    let out = render_page(&page, &ProcessingMarker::new());
    assert!(out.contains("Failed to load: backend down"));
}

#[test]
fn lookup_shows_found_missing_and_failed() {
    let found = StatusLookup {
        ack_number: AckNumber::new("20240001234567"),
        status: QueryStatus::Success,
        application: Some(ApplicationRow::from(application("20240001234567"))),
        error: None,
    };
    let out = render_lookup(&found);
    assert!(out.contains("Submitted:      05 Mar 2024, 14:30"));
    assert!(out.contains("Status:         Approved"));

    let missing = StatusLookup {
        application: None,
        ..found.clone()
    };
    assert_eq!(
        render_lookup(&missing),
        "No application found for 20240001234567\n"
    );

    let failed = StatusLookup {
        status: QueryStatus::Error,
        error: Some("timeout".into()),
        ..missing
    };
    assert_eq!(render_lookup(&failed), "Lookup failed: timeout\n");
}

#[test]
fn failures_are_described_for_people() {
    assert_eq!(
        describe_failure(&ClientError::Rejected("Invalid OTP".into())),
        "Invalid OTP"
    );
    assert_eq!(
        describe_failure(&ClientError::Api(ApiError::new(
            ErrorCode::Unauthorized,
            "token expired"
        ))),
        "Session rejected by the backend; sign in again."
    );
    assert!(describe_failure(&ClientError::NotConnected).contains("Not connected"));
}
