//! Console input lines parsed into the actions the shell can run.

use anyhow::{anyhow, bail, Result};
use client_core::{auth::SignupForm, Status};
use shared::domain::FarmerApplicationForm;

pub const HELP: &str = "\
commands:
  go <path>                                    open a route, e.g. go /manager/dashboard
  refresh                                      reload the current route
  login <agent-id> <otp>                       agent sign-in with OTP
  login-phone <mobile> <password>              agent sign-in with password
  signup name|mobile|email|password|confirm    register a new agent
  request-otp <email>                          ask for a manager OTP
  verify-otp <email> <otp>                     manager sign-in
  submit farmer|mobile|address|aadhaar|pan[|details[|doc,doc]]
  create-agent name|mobile|email[|password]
  approve agent|app <id>                       set a record to approved
  reject agent|app <id>                        set a record to rejected
  status <ack-number>                          look up an application
  search <term>                                filter the list on screen
  logout
  help
  quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Agent,
    Application,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Go {
        path: String,
    },
    Refresh,
    AgentLogin {
        agent_id: String,
        otp: String,
    },
    AgentLoginWithPhone {
        mobile: String,
        password: String,
    },
    Signup(SignupForm),
    RequestManagerOtp {
        email: String,
    },
    VerifyManagerOtp {
        email: String,
        otp: String,
    },
    Submit(FarmerApplicationForm),
    CreateAgent {
        name: String,
        mobile: String,
        email: String,
        password: Option<String>,
    },
    SetStatus {
        kind: RecordKind,
        id: String,
        status: Status,
    },
    CheckStatus {
        ack_number: String,
    },
    Search {
        term: String,
    },
    Logout,
    Help,
    Quit,
}

impl ConsoleCommand {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "go" | "open" => Self::Go {
                path: single(rest, "go <path>")?,
            },
            "refresh" => Self::Refresh,
            "login" => {
                let [agent_id, otp]: [String; 2] = words(rest, "login <agent-id> <otp>")?;
                Self::AgentLogin { agent_id, otp }
            }
            "login-phone" => {
                let [mobile, password]: [String; 2] = words(rest, "login-phone <mobile> <password>")?;
                Self::AgentLoginWithPhone { mobile, password }
            }
            "signup" => {
                let fields = fields(rest);
                let [name, mobile, email, password, confirm_password]: [String; 5] = fields
                    .try_into()
                    .map_err(|_| anyhow!("usage: signup name|mobile|email|password|confirm"))?;
                Self::Signup(SignupForm {
                    name,
                    mobile,
                    email,
                    password,
                    confirm_password,
                })
            }
            "request-otp" => Self::RequestManagerOtp {
                email: single(rest, "request-otp <email>")?,
            },
            "verify-otp" => {
                let [email, otp]: [String; 2] = words(rest, "verify-otp <email> <otp>")?;
                Self::VerifyManagerOtp { email, otp }
            }
            "submit" => Self::Submit(parse_application(rest)?),
            "create-agent" => {
                let mut fields = fields(rest).into_iter();
                let (Some(name), Some(mobile), Some(email)) =
                    (fields.next(), fields.next(), fields.next())
                else {
                    bail!("usage: create-agent name|mobile|email[|password]");
                };
                let password = fields.next().filter(|p| !p.is_empty());
                Self::CreateAgent {
                    name,
                    mobile,
                    email,
                    password,
                }
            }
            "approve" => parse_status_change(rest, "approve", Status::Approved)?,
            "reject" => parse_status_change(rest, "reject", Status::Rejected)?,
            "status" => Self::CheckStatus {
                ack_number: single(rest, "status <ack-number>")?,
            },
            "search" => Self::Search {
                term: rest.to_string(),
            },
            "logout" => Self::Logout,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command `{other}`, try `help`"),
        };
        Ok(Some(command))
    }
}

fn single(rest: &str, usage: &str) -> Result<String> {
    let [value]: [String; 1] = words(rest, usage)?;
    Ok(value)
}

fn words<const N: usize>(rest: &str, usage: &str) -> Result<[String; N]> {
    let parts: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
    parts.try_into().map_err(|_| anyhow!("usage: {usage}"))
}

fn fields(rest: &str) -> Vec<String> {
    if rest.is_empty() {
        return Vec::new();
    }
    rest.split('|').map(|f| f.trim().to_string()).collect()
}

fn parse_application(rest: &str) -> Result<FarmerApplicationForm> {
    let mut fields = fields(rest).into_iter();
    let (Some(farmer_name), Some(mobile), Some(address), Some(aadhaar_number), Some(pan_number)) = (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) else {
        bail!("usage: submit farmer|mobile|address|aadhaar|pan[|details[|doc,doc]]");
    };
    let other_details = fields.next().unwrap_or_default();
    let document_references = fields
        .next()
        .map(|docs| {
            docs.split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Ok(FarmerApplicationForm {
        farmer_name,
        mobile,
        address,
        aadhaar_number,
        pan_number,
        other_details,
        document_references,
    })
}

fn parse_status_change(rest: &str, verb: &str, status: Status) -> Result<ConsoleCommand> {
    let [kind, id]: [String; 2] = words(rest, &format!("{verb} agent|app <id>"))?;
    let kind = match kind.to_ascii_lowercase().as_str() {
        "agent" => RecordKind::Agent,
        "app" | "application" => RecordKind::Application,
        other => bail!("cannot {verb} `{other}`, expected agent or app"),
    };
    Ok(ConsoleCommand::SetStatus { kind, id, status })
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
