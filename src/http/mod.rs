//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, client address)
//!     → handlers.rs (access gate → session store / table source)
//!     → response.rs (JSON bodies, redirects, error status codes)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{ClientAddress, X_REQUEST_ID};
pub use response::AuthResponse;
pub use server::{AppState, HttpServer};
