use warp::Reply;
use warp::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue, VARY,
};
use warp::http::StatusCode;
use warp::reply::Response;

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Header-only CORS for one caller origin.
///
/// Requests are never refused here: a foreign origin still gets the normal
/// response, just without `Access-Control-Allow-Origin`, and the browser
/// decides.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origin: String,
}

impl CorsPolicy {
    pub fn new(allowed_origin: impl Into<String>) -> Self {
        CorsPolicy {
            allowed_origin: allowed_origin.into(),
        }
    }

    pub fn preflight() -> Response {
        let mut response = StatusCode::OK.into_response();
        let headers = response.headers_mut();
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        response
    }

    pub fn decorate<R: Reply>(&self, origin: Option<String>, reply: R) -> Response {
        let mut response = reply.into_response();
        let headers = response.headers_mut();
        headers.append(VARY, HeaderValue::from_static("Origin"));

        if origin.as_deref() != Some(self.allowed_origin.as_str()) {
            return response;
        }
        if let Ok(origin) = HeaderValue::from_str(&self.allowed_origin) {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            headers.insert(
                ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
        response
    }
}
