//! HTTP API for the audiometry backend.
//!
//! Routes are nested under `/api/`. `api_router()` returns a `Router`
//! that can be driven directly in tests; `server` adds CORS and path
//! normalisation and owns the listener.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ApiSession, ServerError};
