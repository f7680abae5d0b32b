use crate::domain_model::UserRecord;
use crate::domain_port::UserRepoError;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Username is required")]
    UsernameRequired,
    #[error("{0}")]
    Query(String),
    #[error("query timed out after {0:?}")]
    Timeout(Duration),
}

impl From<UserRepoError> for LookupError {
    fn from(err: UserRepoError) -> Self {
        match err {
            UserRepoError::Query(e) => LookupError::Query(e),
            UserRepoError::Connectivity(e) => LookupError::Query(e),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("{0}")]
    Unreachable(String),
    #[error("ping timed out after {0:?}")]
    Timeout(Duration),
}

impl From<UserRepoError> for HealthError {
    fn from(err: UserRepoError) -> Self {
        match err {
            UserRepoError::Query(e) => HealthError::Unreachable(e),
            UserRepoError::Connectivity(e) => HealthError::Unreachable(e),
        }
    }
}

#[async_trait::async_trait]
pub trait LookupService: Send + Sync {
    /// `None` and `Some("")` are both a missing username.
    async fn get_user_by_username(&self, username: Option<&str>) -> Result<UserRecord, LookupError>;

    async fn check_health(&self) -> Result<(), HealthError>;
}
