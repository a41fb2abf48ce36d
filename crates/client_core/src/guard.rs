//! Route table and the authorization check that runs before any view is built.

use shared::domain::{AckNumber, AgentSession, ManagerSession};

use crate::{error::RouteError, session::SessionSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Index,
    AgentSignup,
    AgentLogin,
    ManagerLogin,
    AgentDashboard,
    SubmitEkyc,
    CheckStatus,
    Acknowledgment(AckNumber),
    ManagerDashboard,
    AgentApproval,
    FarmerApproval,
    CreateAgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardClass {
    Unguarded,
    RequiresAgent,
    RequiresManager,
    IndexDispatch,
}

/// What the caller was let in as. Protected views take their session from
/// here, so they cannot be built without a passing guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Public,
    Agent(AgentSession),
    Manager(ManagerSession),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow(Access),
    Redirect(Route),
}

impl Route {
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let path_only = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path_only.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Self::Index,
            ["agent-signup"] => Self::AgentSignup,
            ["agent-login"] => Self::AgentLogin,
            ["manager-login"] => Self::ManagerLogin,
            ["agent", "dashboard"] => Self::AgentDashboard,
            ["agent", "submit-ekyc"] => Self::SubmitEkyc,
            ["agent", "check-status"] => Self::CheckStatus,
            ["agent", "acknowledgment", ack] => Self::Acknowledgment(AckNumber::new(*ack)),
            ["manager", "dashboard"] => Self::ManagerDashboard,
            ["manager", "agent-approval"] => Self::AgentApproval,
            ["manager", "farmer-approval"] => Self::FarmerApproval,
            ["manager", "create-agent"] => Self::CreateAgent,
            _ => return Err(RouteError::NotFound(path.to_string())),
        };
        Ok(route)
    }

    pub fn path(&self) -> String {
        match self {
            Self::Index => "/".into(),
            Self::AgentSignup => "/agent-signup".into(),
            Self::AgentLogin => "/agent-login".into(),
            Self::ManagerLogin => "/manager-login".into(),
            Self::AgentDashboard => "/agent/dashboard".into(),
            Self::SubmitEkyc => "/agent/submit-ekyc".into(),
            Self::CheckStatus => "/agent/check-status".into(),
            Self::Acknowledgment(ack) => format!("/agent/acknowledgment/{ack}"),
            Self::ManagerDashboard => "/manager/dashboard".into(),
            Self::AgentApproval => "/manager/agent-approval".into(),
            Self::FarmerApproval => "/manager/farmer-approval".into(),
            Self::CreateAgent => "/manager/create-agent".into(),
        }
    }

    pub fn guard_class(&self) -> GuardClass {
        match self {
            Self::Index => GuardClass::IndexDispatch,
            Self::AgentSignup | Self::AgentLogin | Self::ManagerLogin => GuardClass::Unguarded,
            Self::AgentDashboard
            | Self::SubmitEkyc
            | Self::CheckStatus
            | Self::Acknowledgment(_) => GuardClass::RequiresAgent,
            Self::ManagerDashboard
            | Self::AgentApproval
            | Self::FarmerApproval
            | Self::CreateAgent => GuardClass::RequiresManager,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Decides whether `route` may be shown for the given sessions. Pure; the
/// caller performs any redirect.
pub fn evaluate(route: &Route, sessions: &SessionSnapshot) -> Navigation {
    match route.guard_class() {
        GuardClass::Unguarded => Navigation::Allow(Access::Public),
        GuardClass::RequiresAgent => match &sessions.agent {
            Some(session) => Navigation::Allow(Access::Agent(session.clone())),
            None => Navigation::Redirect(Route::AgentLogin),
        },
        GuardClass::RequiresManager => match &sessions.manager {
            Some(session) => Navigation::Allow(Access::Manager(session.clone())),
            None => Navigation::Redirect(Route::ManagerLogin),
        },
        // Agent is checked first so the landing page is deterministic when
        // both slots happen to be populated.
        GuardClass::IndexDispatch => {
            if sessions.agent.is_some() {
                Navigation::Redirect(Route::AgentDashboard)
            } else if sessions.manager.is_some() {
                Navigation::Redirect(Route::ManagerDashboard)
            } else {
                Navigation::Redirect(Route::AgentLogin)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/guard_tests.rs"]
mod tests;
