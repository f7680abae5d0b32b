use crate::domain_model::UserRecord;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UserRepoError {
    /// The point lookup failed. A missing row lands here too.
    #[error("{0}")]
    Query(String),
    #[error("{0}")]
    Connectivity(String),
}

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// Fetches exactly one row by exact username match.
    async fn find_by_username(&self, username: &str) -> Result<UserRecord, UserRepoError>;

    async fn ping(&self) -> Result<(), UserRepoError>;
}
