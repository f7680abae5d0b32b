use crate::application_port::*;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

/// Turns rejections into plain-text replies.
pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let (status, message) = if let Some(err) = err.find::<ApiError>() {
        (err.status(), err.to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method Not Allowed".to_string(),
        )
    } else if let Some(e) = err.find::<reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else {
        warn!("unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled error: {:?}", err),
        )
    };

    Ok(warp::reply::with_status(message, status))
}

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Username is required")]
    UsernameRequired,
    #[error("Database query error: {0}")]
    Query(String),
    #[error("Database connection failed: {0}")]
    Connectivity(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UsernameRequired => StatusCode::BAD_REQUEST,
            ApiError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Connectivity(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl reject::Reject for ApiError {}

impl From<LookupError> for ApiError {
    fn from(error: LookupError) -> Self {
        match error {
            LookupError::UsernameRequired => ApiError::UsernameRequired,
            e @ (LookupError::Query(_) | LookupError::Timeout(_)) => ApiError::Query(e.to_string()),
        }
    }
}

impl From<HealthError> for ApiError {
    fn from(error: HealthError) -> Self {
        ApiError::Connectivity(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn lookup_errors_map_to_status_classes() {
        let missing = ApiError::from(LookupError::UsernameRequired);
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.to_string(), "Username is required");

        let query = ApiError::from(LookupError::Query("no rows".into()));
        assert_eq!(query.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(query.to_string(), "Database query error: no rows");

        let timeout = ApiError::from(LookupError::Timeout(Duration::from_secs(3)));
        assert_eq!(timeout.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            timeout.to_string(),
            "Database query error: query timed out after 3s"
        );
    }

    #[test]
    fn health_errors_are_server_errors() {
        let err = ApiError::from(HealthError::Unreachable("connection refused".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Database connection failed: connection refused"
        );
    }
}
