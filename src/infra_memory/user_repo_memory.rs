use crate::domain_model::*;
use crate::domain_port::*;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Same wording the Postgres driver uses for an empty `fetch_one`.
pub const NO_ROWS: &str = "no rows returned by a query that expected to return at least one row";

/// In-memory `UserRepo` behind the `fake` backend.
///
/// Counts lookups and can be told to fail or stall, so HTTP tests can see
/// exactly what reached the store.
#[derive(Default)]
pub struct MemoryUserRepo {
    records: RwLock<HashMap<String, UserRecord>>,
    lookups: AtomicUsize,
    query_failure: RwLock<Option<String>>,
    unreachable: AtomicBool,
    delay: RwLock<Option<Duration>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let repo = Self::new();
        for record in records {
            repo.insert(record);
        }
        repo
    }

    pub fn insert(&self, record: UserRecord) {
        if let Ok(mut records) = self.records.write() {
            records.insert(record.username.clone(), record);
        }
    }

    /// Number of `find_by_username` calls seen so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn fail_queries_with(&self, message: impl Into<String>) {
        if let Ok(mut failure) = self.query_failure.write() {
            *failure = Some(message.into());
        }
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        if let Ok(mut d) = self.delay.write() {
            *d = Some(delay);
        }
    }

    fn current_delay(&self) -> Option<Duration> {
        self.delay.read().ok().and_then(|d| *d)
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryUserRepo {
    async fn find_by_username(&self, username: &str) -> Result<UserRecord, UserRepoError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.current_delay() {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.query_failure.read().ok().and_then(|f| f.clone()) {
            return Err(UserRepoError::Query(message));
        }

        let records = self
            .records
            .read()
            .map_err(|e| UserRepoError::Query(e.to_string()))?;
        records
            .get(username)
            .cloned()
            .ok_or_else(|| UserRepoError::Query(NO_ROWS.to_string()))
    }

    async fn ping(&self) -> Result<(), UserRepoError> {
        if let Some(delay) = self.current_delay() {
            tokio::time::sleep(delay).await;
        }

        if self.unreachable.load(Ordering::SeqCst) {
            return Err(UserRepoError::Connectivity("connection refused".to_string()));
        }
        Ok(())
    }
}
