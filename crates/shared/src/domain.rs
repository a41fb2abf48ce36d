use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! string_id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id_newtype!(AgentId);
string_id_newtype!(AckNumber);

/// Agent record as returned by the backend. `status` is kept in its raw wire
/// shape and decoded on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub mobile: String,
    pub email: String,
    #[serde(default)]
    pub password_hash: String,
    #[serde(default)]
    pub status: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerApplication {
    pub acknowledgment_number: AckNumber,
    pub agent_id: AgentId,
    pub farmer_name: String,
    pub mobile: String,
    pub address: String,
    pub aadhaar_number: String,
    pub pan_number: String,
    #[serde(default)]
    pub other_details: String,
    #[serde(default)]
    pub document_references: Vec<String>,
    /// Nanoseconds since the unix epoch.
    #[serde(default)]
    pub submitted_at: i64,
    #[serde(default)]
    pub status: Value,
}

/// Fields an agent fills in when submitting a farmer application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerApplicationForm {
    pub farmer_name: String,
    pub mobile: String,
    pub address: String,
    pub aadhaar_number: String,
    pub pan_number: String,
    #[serde(default)]
    pub other_details: String,
    #[serde(default)]
    pub document_references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSession {
    pub agent_id: AgentId,
    pub agent_name: String,
    pub mobile: String,
    pub email: String,
}

impl From<&Agent> for AgentSession {
    fn from(agent: &Agent) -> Self {
        Self {
            agent_id: agent.id.clone(),
            agent_name: agent.name.clone(),
            mobile: agent.mobile.clone(),
            email: agent.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerSession {
    pub token: String,
    pub email: String,
}
