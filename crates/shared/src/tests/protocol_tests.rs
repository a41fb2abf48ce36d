use super::*;
use crate::domain::Agent;
use serde_json::json;

#[test]
fn backend_call_uses_method_and_args_envelope() {
    let call = BackendCall::AgentLogin {
        agent_id: AgentId::new("AID1"),
        otp: "123456".into(),
    };
    let value = serde_json::to_value(&call).expect("serialize");
    assert_eq!(
        value,
        json!({"method": "agentLogin", "args": {"agentId": "AID1", "otp": "123456"}})
    );
    assert_eq!(call.method_name(), "agentLogin");
}

#[test]
fn unit_calls_serialize_without_args() {
    let value = serde_json::to_value(BackendCall::ListAllAgents).expect("serialize");
    assert_eq!(value, json!({"method": "listAllAgents"}));
}

#[test]
fn submit_nests_form_fields_under_form() {
    let call = BackendCall::SubmitFarmerApplication {
        agent_id: AgentId::new("AID1"),
        form: FarmerApplicationForm {
            farmer_name: "Ravi".into(),
            mobile: "9000000000".into(),
            address: "Village Road".into(),
            aadhaar_number: "123412341234".into(),
            pan_number: "ABCDE1234F".into(),
            other_details: String::new(),
            document_references: Vec::new(),
        },
    };
    let value = serde_json::to_value(&call).expect("serialize");
    assert_eq!(value["args"]["agentId"], "AID1");
    assert_eq!(value["args"]["form"]["farmerName"], "Ravi");
    assert_eq!(value["args"]["form"]["panNumber"], "ABCDE1234F");
}

#[test]
fn outcome_decodes_ok_and_err_variants() {
    let ok: BackendOutcome<String> =
        serde_json::from_value(json!({"__kind__": "ok", "ok": "token-1"})).expect("ok");
    assert_eq!(ok.into_result(), Ok("token-1".to_string()));

    let err: BackendOutcome<Agent> =
        serde_json::from_value(json!({"__kind__": "err", "err": "Agent not approved"}))
            .expect("err");
    assert_eq!(err.into_result().expect_err("must be err"), "Agent not approved");
}
