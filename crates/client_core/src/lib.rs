//! Client core for the farmer eKYC console: per-tab sessions, route guards,
//! the backend transport and the query cache behind them.

use std::sync::Arc;

use shared::domain::{
    AckNumber, Agent, AgentId, AgentSession, FarmerApplicationForm, ManagerSession,
};
use tracing::{debug, info};

pub mod auth;
pub mod backend;
pub mod cache;
pub mod error;
pub mod format;
pub mod guard;
pub mod session;
pub mod status;
pub mod views;

pub use backend::{Backend, HttpBackend};
pub use cache::{CacheOptions, Mutation, QueryClient, QueryKey, QueryResult, QueryStatus};
pub use error::{ClientError, RouteError};
pub use guard::{evaluate, Access, GuardClass, Navigation, Route};
pub use session::{MemoryTabStorage, SessionSnapshot, SessionStore, TabStorage};
pub use status::Status;
pub use views::{ProcessingMarker, Screen};

use auth::{generate_agent_id, hash_password, require_fields, SignupForm};
use views::{build_screen, lookup_status, StatusLookup};

const MAX_REDIRECTS: usize = 4;

/// A route that passed its guard together with the view built for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub route: Route,
    pub screen: Screen,
}

/// One client "tab": its session slots, its query cache and the navigation
/// that ties them together.
pub struct KycClient {
    sessions: SessionStore,
    queries: QueryClient,
}

impl KycClient {
    pub fn new(storage: Arc<dyn TabStorage>, options: CacheOptions) -> Self {
        Self {
            sessions: SessionStore::new(storage),
            queries: QueryClient::new(options),
        }
    }

    pub fn in_memory(options: CacheOptions) -> Self {
        Self::new(Arc::new(MemoryTabStorage::new()), options)
    }

    pub async fn connect(&self, backend: Arc<dyn Backend>) {
        self.queries.connect(backend).await;
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    /// Resolves `path` through the guard, following redirects, and only then
    /// builds the view. Nothing protected is loaded for a caller who fails
    /// the check.
    pub async fn navigate(&self, path: &str) -> Result<Page, RouteError> {
        let mut route = Route::parse(path)?;
        for _ in 0..=MAX_REDIRECTS {
            match evaluate(&route, &self.sessions.snapshot()) {
                Navigation::Redirect(target) => {
                    info!(from = %route, to = %target, "navigation redirected");
                    route = target;
                }
                Navigation::Allow(access) => {
                    let screen = build_screen(&route, access, &self.queries)
                        .await
                        .ok_or_else(|| RouteError::AccessMismatch(route.path()))?;
                    debug!(route = %route, "navigation allowed");
                    return Ok(Page { route, screen });
                }
            }
        }
        Err(RouteError::RedirectLoop(path.to_string()))
    }

    pub async fn agent_login(&self, agent_id: &str, otp: &str) -> Result<AgentSession, ClientError> {
        require_fields(&[("Agent ID", agent_id), ("OTP", otp)])?;
        let agent_id = AgentId::new(agent_id.trim());
        let otp = otp.trim();
        let agent = self
            .queries
            .mutate(Mutation::AgentLogin, |backend| async move {
                backend.agent_login(&agent_id, otp).await
            })
            .await?;
        Ok(self.start_agent_session(&agent))
    }

    pub async fn agent_login_with_phone(
        &self,
        phone: &str,
        password: &str,
    ) -> Result<AgentSession, ClientError> {
        require_fields(&[("Mobile number", phone), ("Password", password)])?;
        let phone = phone.trim();
        let password_hash = hash_password(password);
        let agent = self
            .queries
            .mutate(Mutation::AgentLoginWithPhone, |backend| async move {
                backend.agent_login_with_phone(phone, &password_hash).await
            })
            .await?;
        Ok(self.start_agent_session(&agent))
    }

    fn start_agent_session(&self, agent: &Agent) -> AgentSession {
        let session = AgentSession::from(agent);
        self.sessions.save_agent_session(&session);
        info!(agent_id = %session.agent_id, "agent signed in");
        session
    }

    /// Registers a new agent and returns the generated id the agent will sign
    /// in with.
    pub async fn register_agent(&self, form: &SignupForm) -> Result<AgentId, ClientError> {
        form.validate()?;
        let agent_id = generate_agent_id();
        let password_hash = hash_password(&form.password);
        let id = agent_id.clone();
        self.queries
            .mutate(Mutation::RegisterAgent, |backend| async move {
                backend
                    .register_agent(
                        &id,
                        form.name.trim(),
                        form.mobile.trim(),
                        form.email.trim(),
                        &password_hash,
                    )
                    .await
            })
            .await?;
        info!(agent_id = %agent_id, "agent registered");
        Ok(agent_id)
    }

    pub async fn create_agent_by_manager(
        &self,
        name: &str,
        mobile: &str,
        email: &str,
        password: Option<&str>,
    ) -> Result<Agent, ClientError> {
        require_fields(&[("Full name", name), ("Mobile number", mobile), ("Email", email)])?;
        let password_hash = password.filter(|p| !p.is_empty()).map(hash_password);
        self.queries
            .mutate(Mutation::CreateAgentByManager, |backend| async move {
                backend
                    .create_agent_by_manager(
                        name.trim(),
                        mobile.trim(),
                        email.trim(),
                        password_hash.as_deref(),
                    )
                    .await
            })
            .await
    }

    pub async fn update_agent_status(
        &self,
        agent_id: &AgentId,
        status: Status,
    ) -> Result<(), ClientError> {
        ensure_known(status)?;
        self.queries
            .mutate(Mutation::UpdateAgentStatus, |backend| async move {
                backend.update_agent_status(agent_id, status).await
            })
            .await
    }

    pub async fn submit_farmer_application(
        &self,
        form: &FarmerApplicationForm,
    ) -> Result<AckNumber, ClientError> {
        let session = self
            .sessions
            .agent_session()
            .ok_or_else(|| ClientError::validation("Session expired. Please login again."))?;
        require_fields(&[
            ("Farmer name", form.farmer_name.as_str()),
            ("Mobile number", form.mobile.as_str()),
            ("Address", form.address.as_str()),
            ("Aadhaar number", form.aadhaar_number.as_str()),
            ("PAN number", form.pan_number.as_str()),
        ])?;
        let agent_id = session.agent_id;
        let ack_number = self
            .queries
            .mutate(Mutation::SubmitFarmerApplication, |backend| async move {
                backend.submit_farmer_application(&agent_id, form).await
            })
            .await?;
        info!(ack_number = %ack_number, "farmer application submitted");
        Ok(ack_number)
    }

    pub async fn update_application_status(
        &self,
        ack_number: &AckNumber,
        status: Status,
    ) -> Result<(), ClientError> {
        ensure_known(status)?;
        self.queries
            .mutate(Mutation::UpdateApplicationStatus, |backend| async move {
                backend.update_application_status(ack_number, status).await
            })
            .await
    }

    pub async fn check_status(&self, ack_number: &str) -> StatusLookup {
        lookup_status(&self.queries, &AckNumber::new(ack_number)).await
    }

    pub async fn request_manager_otp(&self, email: &str) -> Result<(), ClientError> {
        require_fields(&[("Email", email)])?;
        let email = email.trim();
        self.queries
            .mutate(Mutation::RequestManagerOtp, |backend| async move {
                backend.request_manager_otp(email).await
            })
            .await
    }

    pub async fn verify_manager_otp(
        &self,
        email: &str,
        otp: &str,
    ) -> Result<ManagerSession, ClientError> {
        require_fields(&[("Email", email), ("OTP", otp)])?;
        let email = email.trim();
        let otp = otp.trim();
        let token = self
            .queries
            .mutate(Mutation::VerifyManagerOtp, |backend| async move {
                backend.verify_manager_otp(email, otp).await
            })
            .await?;
        let session = ManagerSession {
            token,
            email: email.to_string(),
        };
        self.sessions.save_manager_session(&session);
        info!(email = %session.email, "manager signed in");
        Ok(session)
    }

    /// Ends both sessions; the next navigation lands on the agent login.
    pub fn logout(&self) {
        self.sessions.clear_all();
        info!("signed out");
    }
}

fn ensure_known(status: Status) -> Result<(), ClientError> {
    if status.is_known() {
        Ok(())
    } else {
        Err(ClientError::validation("status must be pending, approved or rejected"))
    }
}

#[cfg(test)]
#[path = "tests/fake_backend.rs"]
pub(crate) mod fake_backend;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
