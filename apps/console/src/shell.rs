//! One console "tab": the client, the page on screen and the record whose
//! action is in flight.

use client_core::{ClientError, KycClient, Page, ProcessingMarker, Route};
use shared::domain::{AckNumber, AgentId};
use tracing::warn;

use crate::{
    commands::{ConsoleCommand, RecordKind, HELP},
    render::{describe_failure, render_lookup, render_page, render_search},
};

pub struct Shell {
    client: KycClient,
    page: Option<Page>,
    marker: ProcessingMarker,
}

impl Shell {
    pub fn new(client: KycClient) -> Self {
        Self {
            client,
            page: None,
            marker: ProcessingMarker::new(),
        }
    }

    /// Navigates and renders whatever page the guard settles on.
    pub async fn open(&mut self, path: &str) -> String {
        match self.client.navigate(path).await {
            Ok(page) => {
                let out = render_page(&page, &self.marker);
                self.page = Some(page);
                out
            }
            Err(err) => format!("{err}\n"),
        }
    }

    /// Opens `route` and reports whether the guard let it through. When it
    /// did not, the redirect target is already rendered in the returned text.
    async fn enter(&mut self, route: Route) -> Result<(), String> {
        let out = self.open(&route.path()).await;
        match &self.page {
            Some(page) if page.route == route => Ok(()),
            _ => Err(out),
        }
    }

    async fn refresh(&mut self) -> String {
        let path = self
            .page
            .as_ref()
            .map(|page| page.route.path())
            .unwrap_or_else(|| Route::Index.path());
        self.open(&path).await
    }

    /// Failures stay on the current page; session slots are left as they are.
    fn failure(&self, err: ClientError) -> String {
        if err.is_unauthorized() {
            warn!(error = %err, "backend refused the request as unauthorized");
        }
        format!("{}\n", describe_failure(&err))
    }

    pub async fn execute(&mut self, command: ConsoleCommand) -> String {
        match command {
            ConsoleCommand::Go { path } => self.open(&path).await,
            ConsoleCommand::Refresh => self.refresh().await,
            ConsoleCommand::AgentLogin { agent_id, otp } => {
                match self.client.agent_login(&agent_id, &otp).await {
                    Ok(_) => self.open(&Route::AgentDashboard.path()).await,
                    Err(err) => self.failure(err),
                }
            }
            ConsoleCommand::AgentLoginWithPhone { mobile, password } => {
                match self.client.agent_login_with_phone(&mobile, &password).await {
                    Ok(_) => self.open(&Route::AgentDashboard.path()).await,
                    Err(err) => self.failure(err),
                }
            }
            ConsoleCommand::Signup(form) => match self.client.register_agent(&form).await {
                Ok(agent_id) => {
                    let page = self.open(&Route::AgentLogin.path()).await;
                    format!("Registered. Your agent ID is {agent_id}; sign in with it.\n{page}")
                }
                Err(err) => self.failure(err),
            },
            ConsoleCommand::RequestManagerOtp { email } => {
                match self.client.request_manager_otp(&email).await {
                    Ok(()) => format!("OTP sent to {}\n", email.trim()),
                    Err(err) => self.failure(err),
                }
            }
            ConsoleCommand::VerifyManagerOtp { email, otp } => {
                match self.client.verify_manager_otp(&email, &otp).await {
                    Ok(_) => self.open(&Route::ManagerDashboard.path()).await,
                    Err(err) => self.failure(err),
                }
            }
            ConsoleCommand::Submit(form) => {
                if let Err(page) = self.enter(Route::SubmitEkyc).await {
                    return page;
                }
                match self.client.submit_farmer_application(&form).await {
                    Ok(ack_number) => self.open(&Route::Acknowledgment(ack_number).path()).await,
                    Err(err) => self.failure(err),
                }
            }
            ConsoleCommand::CreateAgent {
                name,
                mobile,
                email,
                password,
            } => {
                if let Err(page) = self.enter(Route::CreateAgent).await {
                    return page;
                }
                match self
                    .client
                    .create_agent_by_manager(&name, &mobile, &email, password.as_deref())
                    .await
                {
                    Ok(agent) => {
                        let page = self.open(&Route::AgentApproval.path()).await;
                        format!("Created agent {} ({}).\n{page}", agent.name, agent.id)
                    }
                    Err(err) => self.failure(err),
                }
            }
            ConsoleCommand::SetStatus { kind, id, status } => {
                let route = match kind {
                    RecordKind::Agent => Route::AgentApproval,
                    RecordKind::Application => Route::FarmerApproval,
                };
                if let Err(page) = self.enter(route).await {
                    return page;
                }
                // The list is rendered once with the record marked busy, then
                // again after the write settles.
                let busy = self.marker.begin(id.as_str());
                let in_flight = self
                    .page
                    .as_ref()
                    .map(|page| render_page(page, &self.marker))
                    .unwrap_or_default();
                let result = match kind {
                    RecordKind::Agent => {
                        self.client
                            .update_agent_status(&AgentId::new(id.as_str()), status)
                            .await
                    }
                    RecordKind::Application => {
                        self.client
                            .update_application_status(&AckNumber::new(id.as_str()), status)
                            .await
                    }
                };
                drop(busy);
                match result {
                    Ok(()) => {
                        let page = self.refresh().await;
                        format!("{in_flight}{id} is now {}.\n{page}", status.badge_label())
                    }
                    Err(err) => format!("{in_flight}{}", self.failure(err)),
                }
            }
            ConsoleCommand::CheckStatus { ack_number } => {
                if let Err(page) = self.enter(Route::CheckStatus).await {
                    return page;
                }
                render_lookup(&self.client.check_status(&ack_number).await)
            }
            ConsoleCommand::Search { term } => self
                .page
                .as_ref()
                .and_then(|page| render_search(page, &self.marker, &term))
                .unwrap_or_else(|| "Nothing to search on this page.\n".to_string()),
            ConsoleCommand::Logout => {
                self.client.logout();
                self.open(&Route::Index.path()).await
            }
            ConsoleCommand::Help => format!("{HELP}\n"),
            ConsoleCommand::Quit => String::new(),
        }
    }
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
