//! View models built after a route has passed its guard.

use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard},
};

use shared::domain::{AckNumber, Agent, AgentId, AgentSession, FarmerApplication};

use crate::{
    cache::{QueryClient, QueryResult, QueryStatus},
    format::format_date,
    guard::{Access, Route},
    status::{decode, decode_for_display, Status},
};

#[derive(Debug, Clone, PartialEq)]
pub struct AgentRow {
    pub agent: Agent,
    /// Exactly what the backend sent, `Unknown` included.
    pub status: Status,
    pub badge: Status,
}

impl From<Agent> for AgentRow {
    fn from(agent: Agent) -> Self {
        Self {
            status: decode(&agent.status),
            badge: decode_for_display(&agent.status),
            agent,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationRow {
    pub application: FarmerApplication,
    pub status: Status,
    pub badge: Status,
    pub submitted_on: String,
}

impl From<FarmerApplication> for ApplicationRow {
    fn from(application: FarmerApplication) -> Self {
        Self {
            status: decode(&application.status),
            badge: decode_for_display(&application.status),
            submitted_on: format_date(application.submitted_at),
            application,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListView<R> {
    pub rows: Vec<R>,
    pub status: QueryStatus,
    pub error: Option<String>,
}

impl<R> ListView<R> {
    fn from_query<T: Into<R>>(result: QueryResult<Vec<T>>) -> Self {
        Self {
            status: result.status,
            error: result.error,
            rows: result
                .data
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

impl ListView<AgentRow> {
    /// Case-insensitive on name and id, plain substring on mobile.
    pub fn search(&self, term: &str) -> Vec<&AgentRow> {
        let needle = term.to_lowercase();
        self.rows
            .iter()
            .filter(|row| {
                row.agent.name.to_lowercase().contains(&needle)
                    || row.agent.id.as_str().to_lowercase().contains(&needle)
                    || row.agent.mobile.contains(term)
            })
            .collect()
    }
}

impl ListView<ApplicationRow> {
    /// Case-insensitive on farmer name and agent id, plain substring on ack.
    pub fn search(&self, term: &str) -> Vec<&ApplicationRow> {
        let needle = term.to_lowercase();
        self.rows
            .iter()
            .filter(|row| {
                let app = &row.application;
                app.farmer_name.to_lowercase().contains(&needle)
                    || app.acknowledgment_number.as_str().contains(term)
                    || app.agent_id.as_str().to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerDashboard {
    pub total_agents: usize,
    pub pending_agents: usize,
    pub total_applications: usize,
    pub pending_applications: usize,
    pub agents_status: QueryStatus,
    pub applications_status: QueryStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusLookup {
    pub ack_number: AckNumber,
    pub status: QueryStatus,
    pub application: Option<ApplicationRow>,
    pub error: Option<String>,
}

impl StatusLookup {
    pub fn not_found(&self) -> bool {
        self.status == QueryStatus::Success && self.application.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    AgentSignup,
    AgentLogin,
    ManagerLogin,
    AgentDashboard(AgentSession),
    SubmitEkyc { agent_id: AgentId },
    CheckStatus,
    Acknowledgment { ack_number: AckNumber },
    ManagerDashboard(ManagerDashboard),
    AgentApproval(ListView<AgentRow>),
    FarmerApproval(ListView<ApplicationRow>),
    CreateAgent,
}

/// Builds the view for a route the guard has let through. `None` when the
/// access kind does not fit the route.
pub async fn build_screen(route: &Route, access: Access, queries: &QueryClient) -> Option<Screen> {
    let screen = match (route, access) {
        (Route::AgentSignup, _) => Screen::AgentSignup,
        (Route::AgentLogin, _) => Screen::AgentLogin,
        (Route::ManagerLogin, _) => Screen::ManagerLogin,
        (Route::AgentDashboard, Access::Agent(session)) => Screen::AgentDashboard(session),
        (Route::SubmitEkyc, Access::Agent(session)) => Screen::SubmitEkyc {
            agent_id: session.agent_id,
        },
        (Route::CheckStatus, Access::Agent(_)) => Screen::CheckStatus,
        (Route::Acknowledgment(ack_number), Access::Agent(_)) => Screen::Acknowledgment {
            ack_number: ack_number.clone(),
        },
        (Route::ManagerDashboard, Access::Manager(_)) => {
            Screen::ManagerDashboard(manager_dashboard(queries).await)
        }
        (Route::AgentApproval, Access::Manager(_)) => {
            Screen::AgentApproval(ListView::from_query(queries.list_all_agents().await))
        }
        (Route::FarmerApproval, Access::Manager(_)) => {
            Screen::FarmerApproval(ListView::from_query(queries.list_all_applications().await))
        }
        (Route::CreateAgent, Access::Manager(_)) => Screen::CreateAgent,
        _ => return None,
    };
    Some(screen)
}

/// Loads both lists concurrently; each only touches its own cache entry.
pub async fn manager_dashboard(queries: &QueryClient) -> ManagerDashboard {
    let (agents, applications) =
        futures::join!(queries.list_all_agents(), queries.list_all_applications());

    let agents_status = agents.status;
    let applications_status = applications.status;
    let agents = agents.into_data();
    let applications = applications.into_data();

    ManagerDashboard {
        total_agents: agents.len(),
        pending_agents: agents
            .iter()
            .filter(|a| decode(&a.status) == Status::Pending)
            .count(),
        total_applications: applications.len(),
        pending_applications: applications
            .iter()
            .filter(|a| decode(&a.status) == Status::Pending)
            .count(),
        agents_status,
        applications_status,
    }
}

pub async fn lookup_status(queries: &QueryClient, ack_number: &AckNumber) -> StatusLookup {
    let ack_number = AckNumber::new(ack_number.as_str().trim());
    let result = queries.application_by_ack(&ack_number).await;
    StatusLookup {
        ack_number,
        status: result.status,
        error: result.error,
        application: result.data.flatten().map(ApplicationRow::from),
    }
}

/// The one record in a list whose action is in flight. Only that record's
/// controls are disabled; the rest of the list stays interactive.
#[derive(Debug, Clone, Default)]
pub struct ProcessingMarker {
    current: Arc<Mutex<Option<String>>>,
}

pub struct ProcessingGuard {
    marker: ProcessingMarker,
    record_id: String,
}

impl ProcessingMarker {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn current(&self) -> Option<String> {
        self.slot().clone()
    }

    pub fn is_disabled(&self, record_id: &str) -> bool {
        self.slot().as_deref() == Some(record_id)
    }

    pub fn begin(&self, record_id: impl Into<String>) -> ProcessingGuard {
        let record_id = record_id.into();
        *self.slot() = Some(record_id.clone());
        ProcessingGuard {
            marker: self.clone(),
            record_id,
        }
    }

    /// Marks `record_id` for as long as `action` runs, whatever its outcome.
    pub async fn run<T, Fut>(&self, record_id: &str, action: Fut) -> T
    where
        Fut: Future<Output = T>,
    {
        let _guard = self.begin(record_id);
        action.await
    }
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        let mut slot = self.marker.slot();
        if slot.as_deref() == Some(self.record_id.as_str()) {
            *slot = None;
        }
    }
}

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod tests;
