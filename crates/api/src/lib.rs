//! fabula-api – REST-Interface fuer Fabula
//!
//! Oeffentliche Routen (`/`, `/signup`, `/login`) und die hinter dem
//! Zugangs-Gate liegenden Story- und Admin-Routen.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use middleware::Angemeldet;
pub use routes::router;
pub use server::{RestServer, RestServerKonfig};
pub use state::ApiState;
