use chrono::Utc;
use rand::Rng;
use shared::domain::AgentId;

use crate::error::ClientError;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const AGENT_ID_PREFIX: &str = "AID";
const AGENT_ID_RANDOM_LEN: usize = 4;
pub const MIN_PASSWORD_LEN: usize = 6;

/// 32-bit rolling hash over UTF-16 code units, rendered as lowercase hex.
/// Existing backend records store passwords in this form, so it has to stay
/// bit-for-bit stable.
pub fn hash_password(password: &str) -> String {
    let hash = password
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(i32::from(unit))
        });
    format!("{:x}", i64::from(hash).abs())
}

/// `AID` + base36 millisecond timestamp + four random base36 characters.
pub fn generate_agent_id() -> AgentId {
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..AGENT_ID_RANDOM_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    AgentId::new(format!("{AGENT_ID_PREFIX}{}{suffix}", to_base36(millis)))
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Fails with the label of the first blank field.
pub fn require_fields(fields: &[(&str, &str)]) -> Result<(), ClientError> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((label, _)) => Err(ClientError::validation(format!("{label} is required"))),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), ClientError> {
        require_fields(&[
            ("Full name", self.name.as_str()),
            ("Mobile number", self.mobile.as_str()),
            ("Email", self.email.as_str()),
            ("Password", self.password.as_str()),
        ])?;
        if self.password != self.confirm_password {
            return Err(ClientError::validation("Passwords do not match"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
