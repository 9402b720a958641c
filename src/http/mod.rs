//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, request span)
//!     → products.rs (route handlers → ProductModel)
//!     → response.rs (error → status + JSON body)
//!     → Send to client
//! ```

pub mod products;
pub mod request;
pub mod response;
pub mod server;

pub use products::DeleteResponse;
pub use request::X_REQUEST_ID;
pub use response::{ApiError, ErrorBody};
pub use server::{AppState, HttpServer};
