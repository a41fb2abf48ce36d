//! Backend operations and their JSON-over-HTTP transport.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{AckNumber, Agent, AgentId, FarmerApplication, FarmerApplicationForm},
    error::{ApiError, ErrorCode},
    protocol::{BackendCall, BackendOutcome},
};
use tracing::debug;
use url::Url;

use crate::{
    error::ClientError,
    status::{encode_plain, encode_variant, Status},
};

/// Operations the client consumes from the remote backend. Explicit
/// refusals (bad OTP, unknown phone number) come back as
/// [`ClientError::Rejected`].
#[async_trait]
pub trait Backend: Send + Sync {
    async fn agent_login(&self, agent_id: &AgentId, otp: &str) -> Result<Agent, ClientError>;
    async fn agent_login_with_phone(
        &self,
        phone: &str,
        password_hash: &str,
    ) -> Result<Agent, ClientError>;
    async fn register_agent(
        &self,
        agent_id: &AgentId,
        name: &str,
        mobile: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<(), ClientError>;
    async fn create_agent_by_manager(
        &self,
        name: &str,
        mobile: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> Result<Agent, ClientError>;
    async fn list_all_agents(&self) -> Result<Vec<Agent>, ClientError>;
    async fn update_agent_status(
        &self,
        agent_id: &AgentId,
        status: Status,
    ) -> Result<(), ClientError>;
    async fn list_all_applications(&self) -> Result<Vec<FarmerApplication>, ClientError>;
    async fn get_application_by_ack_number(
        &self,
        ack_number: &AckNumber,
    ) -> Result<Option<FarmerApplication>, ClientError>;
    async fn submit_farmer_application(
        &self,
        agent_id: &AgentId,
        form: &FarmerApplicationForm,
    ) -> Result<AckNumber, ClientError>;
    async fn update_application_status(
        &self,
        ack_number: &AckNumber,
        status: Status,
    ) -> Result<(), ClientError>;
    async fn request_manager_otp(&self, email: &str) -> Result<(), ClientError>;
    async fn verify_manager_otp(&self, email: &str, otp: &str) -> Result<String, ClientError>;
}

/// JSON-over-HTTP transport: every operation is a `POST {base}/call` whose body
/// is a [`BackendCall`].
pub struct HttpBackend {
    http: Client,
    endpoint: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join("call")?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn call<T: DeserializeOwned>(&self, call: BackendCall) -> Result<T, ClientError> {
        let method = call.method_name();
        debug!(method, "backend call");
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&call)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let api_error = serde_json::from_str::<ApiError>(&body).unwrap_or_else(|_| {
                ApiError::new(
                    ErrorCode::from_http_status(status.as_u16()),
                    format!("{method} failed with {status}"),
                )
            });
            return Err(api_error.into());
        }

        Ok(response.json::<T>().await?)
    }

    async fn call_outcome<T: DeserializeOwned>(&self, call: BackendCall) -> Result<T, ClientError> {
        let outcome: BackendOutcome<T> = self.call(call).await?;
        outcome.into_result().map_err(ClientError::Rejected)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn agent_login(&self, agent_id: &AgentId, otp: &str) -> Result<Agent, ClientError> {
        self.call_outcome(BackendCall::AgentLogin {
            agent_id: agent_id.clone(),
            otp: otp.to_string(),
        })
        .await
    }

    async fn agent_login_with_phone(
        &self,
        phone: &str,
        password_hash: &str,
    ) -> Result<Agent, ClientError> {
        self.call_outcome(BackendCall::AgentLoginWithPhone {
            phone: phone.to_string(),
            password_hash: password_hash.to_string(),
        })
        .await
    }

    async fn register_agent(
        &self,
        agent_id: &AgentId,
        name: &str,
        mobile: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<(), ClientError> {
        self.call(BackendCall::RegisterAgent {
            agent_id: agent_id.clone(),
            name: name.to_string(),
            mobile: mobile.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        })
        .await
    }

    async fn create_agent_by_manager(
        &self,
        name: &str,
        mobile: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> Result<Agent, ClientError> {
        self.call(BackendCall::CreateAgentByManager {
            name: name.to_string(),
            mobile: mobile.to_string(),
            email: email.to_string(),
            password_hash: password_hash.map(str::to_string),
        })
        .await
    }

    async fn list_all_agents(&self) -> Result<Vec<Agent>, ClientError> {
        self.call(BackendCall::ListAllAgents).await
    }

    async fn update_agent_status(
        &self,
        agent_id: &AgentId,
        status: Status,
    ) -> Result<(), ClientError> {
        self.call(BackendCall::UpdateAgentStatus {
            agent_id: agent_id.clone(),
            status: encode_variant(status),
        })
        .await
    }

    async fn list_all_applications(&self) -> Result<Vec<FarmerApplication>, ClientError> {
        self.call(BackendCall::ListAllApplications).await
    }

    async fn get_application_by_ack_number(
        &self,
        ack_number: &AckNumber,
    ) -> Result<Option<FarmerApplication>, ClientError> {
        self.call(BackendCall::GetApplicationByAckNumber {
            ack_number: ack_number.clone(),
        })
        .await
    }

    async fn submit_farmer_application(
        &self,
        agent_id: &AgentId,
        form: &FarmerApplicationForm,
    ) -> Result<AckNumber, ClientError> {
        self.call(BackendCall::SubmitFarmerApplication {
            agent_id: agent_id.clone(),
            form: form.clone(),
        })
        .await
    }

    async fn update_application_status(
        &self,
        ack_number: &AckNumber,
        status: Status,
    ) -> Result<(), ClientError> {
        self.call(BackendCall::UpdateApplicationStatus {
            ack_number: ack_number.clone(),
            status: encode_plain(status),
        })
        .await
    }

    async fn request_manager_otp(&self, email: &str) -> Result<(), ClientError> {
        self.call(BackendCall::RequestManagerOtp {
            email: email.to_string(),
        })
        .await
    }

    async fn verify_manager_otp(&self, email: &str, otp: &str) -> Result<String, ClientError> {
        self.call_outcome(BackendCall::VerifyManagerOtp {
            email: email.to_string(),
            otp: otp.to_string(),
        })
        .await
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
