//! Read cache keyed by `(operation, params)` with static invalidation rules
//! for mutations.

use std::{
    collections::HashMap,
    future::Future,
    sync::Arc,
    time::{Duration, Instant},
};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::domain::{AckNumber, Agent, FarmerApplication};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::{backend::Backend, error::ClientError};

pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(30);
pub const DEFAULT_QUERY_RETRIES: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// How long a successful read is served without going back to the backend.
    pub stale_time: Duration,
    /// Extra attempts for a failing read before it reports `Error`.
    pub retries: u32,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            stale_time: DEFAULT_STALE_TIME,
            retries: DEFAULT_QUERY_RETRIES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadOperation {
    ListAllAgents,
    ListAllApplications,
    ApplicationByAck,
}

impl ReadOperation {
    pub fn name(self) -> &'static str {
        match self {
            Self::ListAllAgents => "listAllAgents",
            Self::ListAllApplications => "listAllApplications",
            Self::ApplicationByAck => "applicationByAck",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub operation: ReadOperation,
    pub params: Vec<String>,
}

impl QueryKey {
    pub fn agents() -> Self {
        Self {
            operation: ReadOperation::ListAllAgents,
            params: Vec::new(),
        }
    }

    pub fn applications() -> Self {
        Self {
            operation: ReadOperation::ListAllApplications,
            params: Vec::new(),
        }
    }

    pub fn application_by_ack(ack_number: &AckNumber) -> Self {
        Self {
            operation: ReadOperation::ApplicationByAck,
            params: vec![ack_number.as_str().trim().to_string()],
        }
    }

    /// A read is only issued once every parameter is filled in.
    pub fn has_required_params(&self) -> bool {
        self.params.iter().all(|p| !p.trim().is_empty())
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.operation.name(), self.params.join(","))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    AgentLogin,
    AgentLoginWithPhone,
    RegisterAgent,
    CreateAgentByManager,
    UpdateAgentStatus,
    SubmitFarmerApplication,
    UpdateApplicationStatus,
    RequestManagerOtp,
    VerifyManagerOtp,
}

impl Mutation {
    /// Reads whose cached results are stale once this mutation succeeds.
    pub fn invalidates(self) -> &'static [ReadOperation] {
        match self {
            Self::RegisterAgent | Self::CreateAgentByManager | Self::UpdateAgentStatus => {
                &[ReadOperation::ListAllAgents]
            }
            Self::SubmitFarmerApplication => &[ReadOperation::ListAllApplications],
            Self::UpdateApplicationStatus => &[
                ReadOperation::ListAllApplications,
                ReadOperation::ApplicationByAck,
            ],
            Self::AgentLogin
            | Self::AgentLoginWithPhone
            | Self::RequestManagerOtp
            | Self::VerifyManagerOtp => &[],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::AgentLogin => "agentLogin",
            Self::AgentLoginWithPhone => "agentLoginWithPhone",
            Self::RegisterAgent => "registerAgent",
            Self::CreateAgentByManager => "createAgentByManager",
            Self::UpdateAgentStatus => "updateAgentStatus",
            Self::SubmitFarmerApplication => "submitFarmerApplication",
            Self::UpdateApplicationStatus => "updateApplicationStatus",
            Self::RequestManagerOtp => "requestManagerOtp",
            Self::VerifyManagerOtp => "verifyManagerOtp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> QueryResult<T> {
    fn success(data: T) -> Self {
        Self {
            status: QueryStatus::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn into_data(self) -> T
    where
        T: Default,
    {
        self.data.unwrap_or_default()
    }
}

impl<T: Default> QueryResult<T> {
    fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: Some(T::default()),
            error: None,
        }
    }
}

#[derive(Debug, Default)]
struct CacheEntry {
    data: Option<Value>,
    updated_at: Option<Instant>,
    stale: bool,
    /// Reads of this key currently running.
    in_flight: u32,
    error: Option<String>,
    /// Bumped on every invalidation so a read that started earlier cannot
    /// mark its result fresh.
    generation: u64,
}

impl CacheEntry {
    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.stale
            && self.data.is_some()
            && self
                .updated_at
                .is_some_and(|updated_at| updated_at.elapsed() < stale_time)
    }

    fn status(&self) -> QueryStatus {
        if self.in_flight > 0 {
            QueryStatus::Loading
        } else if self.error.is_some() {
            QueryStatus::Error
        } else if self.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Idle
        }
    }
}

/// Runs backend reads through the cache and backend writes through the
/// invalidation table. Holds the backend connection; without one every read
/// stays idle and every write fails with [`ClientError::NotConnected`].
pub struct QueryClient {
    backend: RwLock<Option<Arc<dyn Backend>>>,
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
    options: CacheOptions,
}

impl QueryClient {
    pub fn new(options: CacheOptions) -> Self {
        Self {
            backend: RwLock::new(None),
            entries: Mutex::new(HashMap::new()),
            options,
        }
    }

    pub fn options(&self) -> CacheOptions {
        self.options
    }

    pub async fn connect(&self, backend: Arc<dyn Backend>) {
        *self.backend.write().await = Some(backend);
        info!("backend connection ready");
    }

    pub async fn disconnect(&self) {
        *self.backend.write().await = None;
    }

    pub async fn is_connected(&self) -> bool {
        self.backend.read().await.is_some()
    }

    async fn backend(&self) -> Option<Arc<dyn Backend>> {
        self.backend.read().await.clone()
    }

    pub async fn list_all_agents(&self) -> QueryResult<Vec<Agent>> {
        self.query(QueryKey::agents(), |backend| async move {
            backend.list_all_agents().await
        })
        .await
    }

    pub async fn list_all_applications(&self) -> QueryResult<Vec<FarmerApplication>> {
        self.query(QueryKey::applications(), |backend| async move {
            backend.list_all_applications().await
        })
        .await
    }

    pub async fn application_by_ack(
        &self,
        ack_number: &AckNumber,
    ) -> QueryResult<Option<FarmerApplication>> {
        let ack_number = AckNumber::new(ack_number.as_str().trim());
        self.query(QueryKey::application_by_ack(&ack_number), move |backend| {
            let ack_number = ack_number.clone();
            async move { backend.get_application_by_ack_number(&ack_number).await }
        })
        .await
    }

    /// Serves `key` from cache while fresh, otherwise fetches it. Failures
    /// keep whatever was cached before and report `Error`.
    pub async fn query<T, F, Fut>(&self, key: QueryKey, fetch: F) -> QueryResult<T>
    where
        T: Serialize + DeserializeOwned + Default,
        F: Fn(Arc<dyn Backend>) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let backend = match self.backend().await {
            Some(backend) if key.has_required_params() => backend,
            _ => return QueryResult::idle(),
        };

        let generation = {
            let mut entries = self.entries.lock().await;
            let entry = entries.entry(key.clone()).or_default();
            if entry.is_fresh(self.options.stale_time) {
                if let Some(data) = entry
                    .data
                    .as_ref()
                    .and_then(|raw| serde_json::from_value::<T>(raw.clone()).ok())
                {
                    debug!(%key, "query served from cache");
                    return QueryResult::success(data);
                }
            }
            entry.in_flight += 1;
            entry.generation
        };

        let mut attempt = 0;
        let outcome = loop {
            match fetch(backend.clone()).await {
                Ok(data) => break Ok(data),
                Err(err) if attempt < self.options.retries => {
                    attempt += 1;
                    debug!(%key, attempt, error = %err, "retrying query");
                }
                Err(err) => break Err(err),
            }
        };

        let mut entries = self.entries.lock().await;
        let entry = entries.entry(key.clone()).or_default();
        entry.in_flight = entry.in_flight.saturating_sub(1);
        match outcome {
            Ok(data) => {
                match serde_json::to_value(&data) {
                    Ok(raw) => {
                        entry.data = Some(raw);
                        entry.updated_at = Some(Instant::now());
                        entry.error = None;
                        entry.stale = entry.generation != generation;
                    }
                    Err(err) => warn!(%key, error = %err, "query result not cacheable"),
                }
                debug!(%key, "query fetched");
                QueryResult::success(data)
            }
            Err(err) => {
                let message = err.to_string();
                warn!(%key, error = %message, "query failed");
                entry.error = Some(message.clone());
                entry.stale = true;
                let cached = entry
                    .data
                    .as_ref()
                    .and_then(|raw| serde_json::from_value::<T>(raw.clone()).ok());
                QueryResult {
                    status: QueryStatus::Error,
                    data: cached,
                    error: Some(message),
                }
            }
        }
    }

    /// Runs a write and, only when it succeeds, marks its dependent reads stale.
    pub async fn mutate<T, F, Fut>(&self, mutation: Mutation, run: F) -> Result<T, ClientError>
    where
        F: FnOnce(Arc<dyn Backend>) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let backend = self.backend().await.ok_or(ClientError::NotConnected)?;
        match run(backend).await {
            Ok(value) => {
                self.invalidate(mutation.invalidates()).await;
                info!(mutation = mutation.name(), "mutation succeeded");
                Ok(value)
            }
            Err(err) => {
                warn!(mutation = mutation.name(), error = %err, "mutation failed");
                Err(err)
            }
        }
    }

    pub async fn invalidate(&self, operations: &[ReadOperation]) {
        if operations.is_empty() {
            return;
        }
        let mut entries = self.entries.lock().await;
        for (key, entry) in entries.iter_mut() {
            if operations.contains(&key.operation) {
                entry.stale = true;
                entry.generation += 1;
                debug!(%key, "query invalidated");
            }
        }
    }

    /// Current state of `key` without issuing a read.
    pub async fn peek(&self, key: &QueryKey) -> QueryStatus {
        self.entries
            .lock()
            .await
            .get(key)
            .map_or(QueryStatus::Idle, CacheEntry::status)
    }

    pub async fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries
            .lock()
            .await
            .get(key)
            .map_or(true, |entry| !entry.is_fresh(self.options.stale_time))
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(CacheOptions::default())
    }
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
