use super::cors::CorsPolicy;
use super::error::recover_error;
use super::handler::{self, LookupQuery};
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::Method;
use warp::{Filter, Reply};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let user_soap = warp::path!("user" / "soap")
        .and(warp::get())
        .and(warp::query::<Vec<(String, String)>>().map(LookupQuery::from_pairs))
        .and(with(server.lookup_service.clone()))
        .and(with(server.renderer.clone()))
        .and_then(handler::get_user_by_username);

    let health = warp::path!("health")
        .and(warp::get())
        .and(with(server.lookup_service.clone()))
        .and_then(handler::health);

    user_soap.or(health)
}

/// Routes plus error recovery and CORS for the single allowed caller origin.
pub fn service(
    server: Arc<Server>,
    allowed_origin: String,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let cors = CorsPolicy::new(allowed_origin);

    warp::header::optional::<String>("origin")
        .and(preflight().or(routes(server)).recover(recover_error))
        .map(move |origin: Option<String>, reply| cors.decorate(origin, reply))
        .with(warp::trace::request())
}

/// Answers `OPTIONS` on any path. Other methods fall through as not-found so
/// unknown paths keep their 404.
fn preflight() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::method().and_then(|method: Method| async move {
        if method == Method::OPTIONS {
            Ok(CorsPolicy::preflight())
        } else {
            Err(warp::reject::not_found())
        }
    })
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}
