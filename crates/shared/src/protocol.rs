use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{AckNumber, AgentId, FarmerApplicationForm};

/// One backend operation and its arguments, posted as the body of a `/call`
/// request. The response body is the operation's JSON result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args", rename_all = "camelCase")]
pub enum BackendCall {
    #[serde(rename_all = "camelCase")]
    AgentLogin { agent_id: AgentId, otp: String },
    #[serde(rename_all = "camelCase")]
    AgentLoginWithPhone { phone: String, password_hash: String },
    #[serde(rename_all = "camelCase")]
    RegisterAgent {
        agent_id: AgentId,
        name: String,
        mobile: String,
        email: String,
        password_hash: String,
    },
    #[serde(rename_all = "camelCase")]
    CreateAgentByManager {
        name: String,
        mobile: String,
        email: String,
        password_hash: Option<String>,
    },
    ListAllAgents,
    #[serde(rename_all = "camelCase")]
    UpdateAgentStatus { agent_id: AgentId, status: Value },
    ListAllApplications,
    #[serde(rename_all = "camelCase")]
    GetApplicationByAckNumber { ack_number: AckNumber },
    #[serde(rename_all = "camelCase")]
    SubmitFarmerApplication {
        agent_id: AgentId,
        form: FarmerApplicationForm,
    },
    #[serde(rename_all = "camelCase")]
    UpdateApplicationStatus { ack_number: AckNumber, status: Value },
    RequestManagerOtp { email: String },
    VerifyManagerOtp { email: String, otp: String },
}

impl BackendCall {
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::AgentLogin { .. } => "agentLogin",
            Self::AgentLoginWithPhone { .. } => "agentLoginWithPhone",
            Self::RegisterAgent { .. } => "registerAgent",
            Self::CreateAgentByManager { .. } => "createAgentByManager",
            Self::ListAllAgents => "listAllAgents",
            Self::UpdateAgentStatus { .. } => "updateAgentStatus",
            Self::ListAllApplications => "listAllApplications",
            Self::GetApplicationByAckNumber { .. } => "getApplicationByAckNumber",
            Self::SubmitFarmerApplication { .. } => "submitFarmerApplication",
            Self::UpdateApplicationStatus { .. } => "updateApplicationStatus",
            Self::RequestManagerOtp { .. } => "requestManagerOtp",
            Self::VerifyManagerOtp { .. } => "verifyManagerOtp",
        }
    }
}

/// Result shape for operations the backend may explicitly refuse, e.g.
/// `{"__kind__":"err","err":"Invalid OTP"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__kind__", rename_all = "lowercase")]
pub enum BackendOutcome<T> {
    Ok { ok: T },
    Err { err: String },
}

impl<T> BackendOutcome<T> {
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Ok { ok } => Ok(ok),
            Self::Err { err } => Err(err),
        }
    }
}

impl<T> From<Result<T, String>> for BackendOutcome<T> {
    fn from(value: Result<T, String>) -> Self {
        match value {
            Ok(ok) => Self::Ok { ok },
            Err(err) => Self::Err { err },
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
