use super::error::*;
use crate::application_port::LookupService;
use crate::logger::*;
use crate::soap::{self, EnvelopeRenderer};
use std::sync::Arc;
use warp::http::header;
use warp::{self, reject};

pub const HEALTHY: &str = "Service is healthy";

#[derive(Debug, PartialEq, Eq)]
pub struct LookupQuery {
    pub username: Option<String>,
}

impl LookupQuery {
    /// First `username` wins when the parameter repeats.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        LookupQuery {
            username: pairs
                .into_iter()
                .find(|(key, _)| key == "username")
                .map(|(_, value)| value),
        }
    }
}

pub async fn get_user_by_username(
    query: LookupQuery,
    lookup_service: Arc<dyn LookupService>,
    renderer: Arc<EnvelopeRenderer>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = lookup_service
        .get_user_by_username(query.username.as_deref())
        .await
        .map_err(|e| {
            warn!(username = ?query.username, error = %e, "user lookup failed");
            ApiError::from(e)
        })
        .map_err(reject::custom)?;

    debug!(id = %user.id, username = %user.username, "user found");

    Ok(warp::reply::with_header(
        renderer.render_user(&user),
        header::CONTENT_TYPE,
        soap::CONTENT_TYPE,
    ))
}

pub async fn health(
    lookup_service: Arc<dyn LookupService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    lookup_service
        .check_health()
        .await
        .map_err(|e| {
            error!(error = %e, "health check failed");
            ApiError::from(e)
        })
        .map_err(reject::custom)?;

    Ok(HEALTHY)
}
