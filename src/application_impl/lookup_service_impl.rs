use crate::application_port::{HealthError, LookupError, LookupService};
use crate::domain_model::UserRecord;
use crate::domain_port::UserRepo;
use std::sync::Arc;
use std::time::Duration;

pub struct RealLookupService {
    user_repo: Arc<dyn UserRepo>,
    query_timeout: Option<Duration>,
}

impl RealLookupService {
    pub fn new(user_repo: Arc<dyn UserRepo>) -> RealLookupService {
        RealLookupService {
            user_repo,
            query_timeout: None,
        }
    }

    /// Bounds every store call. Without it a query runs until the driver gives up.
    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> RealLookupService {
        self.query_timeout = timeout;
        self
    }
}

#[async_trait::async_trait]
impl LookupService for RealLookupService {
    async fn get_user_by_username(
        &self,
        username: Option<&str>,
    ) -> Result<UserRecord, LookupError> {
        let username = match username {
            Some(u) if !u.is_empty() => u,
            _ => return Err(LookupError::UsernameRequired),
        };

        let lookup = self.user_repo.find_by_username(username);
        let record = match self.query_timeout {
            Some(limit) => tokio::time::timeout(limit, lookup)
                .await
                .map_err(|_| LookupError::Timeout(limit))??,
            None => lookup.await?,
        };

        Ok(record)
    }

    async fn check_health(&self) -> Result<(), HealthError> {
        let ping = self.user_repo.ping();
        match self.query_timeout {
            Some(limit) => tokio::time::timeout(limit, ping)
                .await
                .map_err(|_| HealthError::Timeout(limit))??,
            None => ping.await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::{MemoryUserRepo, NO_ROWS};

    fn service_with(repo: Arc<MemoryUserRepo>) -> RealLookupService {
        RealLookupService::new(repo)
    }

    #[tokio::test]
    async fn missing_or_empty_username_never_reaches_store() {
        let repo = Arc::new(MemoryUserRepo::with_records([UserRecord::new("42", "alice")]));
        let service = service_with(repo.clone());

        for username in [None, Some("")] {
            let err = service.get_user_by_username(username).await.unwrap_err();
            assert!(matches!(err, LookupError::UsernameRequired));
        }
        assert_eq!(repo.lookups(), 0);
    }

    #[tokio::test]
    async fn returns_stored_record() {
        let repo = Arc::new(MemoryUserRepo::with_records([UserRecord::new("42", "alice")]));
        let service = service_with(repo.clone());

        let record = service.get_user_by_username(Some("alice")).await.unwrap();

        assert_eq!(record, UserRecord::new("42", "alice"));
        assert_eq!(repo.lookups(), 1);
    }

    #[tokio::test]
    async fn unknown_user_is_a_query_error() {
        let service = service_with(Arc::new(MemoryUserRepo::new()));

        let err = service.get_user_by_username(Some("bob")).await.unwrap_err();

        assert!(matches!(err, LookupError::Query(ref m) if m == NO_ROWS));
    }

    #[tokio::test]
    async fn whitespace_username_is_looked_up_verbatim() {
        let repo = Arc::new(MemoryUserRepo::new());
        let service = service_with(repo.clone());

        let err = service.get_user_by_username(Some(" ")).await.unwrap_err();

        assert!(matches!(err, LookupError::Query(_)));
        assert_eq!(repo.lookups(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_store_hits_the_deadline() {
        let repo = Arc::new(MemoryUserRepo::with_records([UserRecord::new("42", "alice")]));
        repo.set_delay(Duration::from_secs(30));
        let service =
            service_with(repo).with_query_timeout(Some(Duration::from_secs(2)));

        let err = service.get_user_by_username(Some("alice")).await.unwrap_err();
        assert!(matches!(err, LookupError::Timeout(d) if d == Duration::from_secs(2)));

        let err = service.check_health().await.unwrap_err();
        assert!(matches!(err, HealthError::Timeout(_)));
    }

    #[tokio::test]
    async fn health_reports_unreachable_store() {
        let repo = Arc::new(MemoryUserRepo::new());
        let service = service_with(repo.clone());
        assert!(service.check_health().await.is_ok());

        repo.set_unreachable(true);
        let err = service.check_health().await.unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }
}
