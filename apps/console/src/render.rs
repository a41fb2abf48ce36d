//! Plain-text rendering of pages and lookups for the console.

use std::fmt::Write;

use client_core::{
    format::format_date_time,
    views::{AgentRow, ApplicationRow, ListView, ManagerDashboard, StatusLookup},
    ClientError, Page, ProcessingMarker, QueryStatus, Screen,
};

pub fn render_page(page: &Page, marker: &ProcessingMarker) -> String {
    let mut out = format!("== {} ==\n", page.route);
    match &page.screen {
        Screen::AgentSignup => out.push_str("Agent signup. Use `signup`.\n"),
        Screen::AgentLogin => {
            out.push_str("Agent login. Use `login` or `login-phone`.\n");
        }
        Screen::ManagerLogin => {
            out.push_str("Manager login. Use `request-otp` then `verify-otp`.\n");
        }
        Screen::AgentDashboard(session) => {
            let _ = writeln!(out, "Welcome, {} ({})", session.agent_name, session.agent_id);
            let _ = writeln!(out, "{} | {}", session.mobile, session.email);
        }
        Screen::SubmitEkyc { agent_id } => {
            let _ = writeln!(out, "New farmer application for agent {agent_id}. Use `submit`.");
        }
        Screen::CheckStatus => out.push_str("Check application status. Use `status`.\n"),
        Screen::Acknowledgment { ack_number } => {
            let _ = writeln!(out, "Application submitted.\nAcknowledgment number: {ack_number}");
        }
        Screen::ManagerDashboard(dashboard) => render_dashboard(&mut out, dashboard),
        Screen::AgentApproval(list) => render_agents(&mut out, list, marker, None),
        Screen::FarmerApproval(list) => render_applications(&mut out, list, marker, None),
        Screen::CreateAgent => out.push_str("Create an agent. Use `create-agent`.\n"),
    }
    out
}

/// Renders only the rows of a list screen that match `term`. `None` when the
/// page shows no list.
pub fn render_search(page: &Page, marker: &ProcessingMarker, term: &str) -> Option<String> {
    let mut out = String::new();
    match &page.screen {
        Screen::AgentApproval(list) => render_agents(&mut out, list, marker, Some(term)),
        Screen::FarmerApproval(list) => render_applications(&mut out, list, marker, Some(term)),
        _ => return None,
    }
    Some(out)
}

fn render_dashboard(out: &mut String, dashboard: &ManagerDashboard) {
    let _ = writeln!(
        out,
        "Agents:       {} total, {} pending{}",
        dashboard.total_agents,
        dashboard.pending_agents,
        load_note(dashboard.agents_status)
    );
    let _ = writeln!(
        out,
        "Applications: {} total, {} pending{}",
        dashboard.total_applications,
        dashboard.pending_applications,
        load_note(dashboard.applications_status)
    );
}

fn load_note(status: QueryStatus) -> &'static str {
    match status {
        QueryStatus::Success => "",
        QueryStatus::Error => " (failed to load)",
        QueryStatus::Idle | QueryStatus::Loading => " (not loaded)",
    }
}

fn list_problem(out: &mut String, status: QueryStatus, error: Option<&str>) -> bool {
    match status {
        QueryStatus::Error => {
            let _ = writeln!(out, "Failed to load: {}", error.unwrap_or("unknown error"));
            true
        }
        QueryStatus::Idle | QueryStatus::Loading => {
            out.push_str("Not loaded.\n");
            true
        }
        QueryStatus::Success => false,
    }
}

fn render_agents(
    out: &mut String,
    list: &ListView<AgentRow>,
    marker: &ProcessingMarker,
    term: Option<&str>,
) {
    if list_problem(out, list.status, list.error.as_deref()) {
        return;
    }
    let rows = match term {
        Some(term) => list.search(term),
        None => list.rows.iter().collect(),
    };
    if rows.is_empty() {
        out.push_str("No agents.\n");
    }
    for row in rows {
        let agent = &row.agent;
        let _ = writeln!(
            out,
            "{:<16} {:<24} {:<12} [{}]{}",
            agent.id.as_str(),
            agent.name,
            agent.mobile,
            row.badge.badge_label(),
            busy(marker, agent.id.as_str())
        );
    }
}

fn render_applications(
    out: &mut String,
    list: &ListView<ApplicationRow>,
    marker: &ProcessingMarker,
    term: Option<&str>,
) {
    if list_problem(out, list.status, list.error.as_deref()) {
        return;
    }
    let rows = match term {
        Some(term) => list.search(term),
        None => list.rows.iter().collect(),
    };
    if rows.is_empty() {
        out.push_str("No applications.\n");
    }
    for row in rows {
        let app = &row.application;
        let _ = writeln!(
            out,
            "{:<16} {:<24} {:<16} {} [{}]{}",
            app.acknowledgment_number.as_str(),
            app.farmer_name,
            app.agent_id.as_str(),
            row.submitted_on,
            row.badge.badge_label(),
            busy(marker, app.acknowledgment_number.as_str())
        );
    }
}

fn busy(marker: &ProcessingMarker, record_id: &str) -> &'static str {
    if marker.is_disabled(record_id) {
        " (processing)"
    } else {
        ""
    }
}

pub fn render_lookup(lookup: &StatusLookup) -> String {
    if let Some(error) = &lookup.error {
        return format!("Lookup failed: {error}\n");
    }
    if lookup.status == QueryStatus::Idle {
        return "Enter an acknowledgment number.\n".to_string();
    }
    let Some(row) = &lookup.application else {
        return format!("No application found for {}\n", lookup.ack_number);
    };
    let app = &row.application;
    let mut out = String::new();
    let _ = writeln!(out, "Acknowledgment: {}", app.acknowledgment_number);
    let _ = writeln!(out, "Farmer:         {} ({})", app.farmer_name, app.mobile);
    let _ = writeln!(out, "Agent:          {}", app.agent_id);
    let _ = writeln!(out, "Submitted:      {}", format_date_time(app.submitted_at));
    let _ = writeln!(out, "Status:         {}", row.badge.badge_label());
    out
}

/// Turns a failed action into the line shown to the user.
pub fn describe_failure(err: &ClientError) -> String {
    match err {
        ClientError::NotConnected => "Not connected to the backend.".to_string(),
        ClientError::Transport(_) => {
            "Backend unreachable; check the URL and network, then retry.".to_string()
        }
        _ if err.is_unauthorized() => "Session rejected by the backend; sign in again.".to_string(),
        ClientError::Rejected(message) | ClientError::Validation(message) => message.clone(),
        other => format!("Request failed: {other}"),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
