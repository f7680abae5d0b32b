mod cors;
mod error;
mod handler;
mod router;

pub use cors::CorsPolicy;
pub use error::{ApiError, recover_error};
pub use handler::HEALTHY;
pub use router::{routes, service};
