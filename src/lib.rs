//! Product catalogue REST API.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ http (router, handlers) ──▶ products (schema + model) ──▶ store ──▶ MongoDB
//!        ◀────── JSON + status ◀──────────── Product | ProductError ◀──────┘
//!
//!     Cross-cutting: config, observability, lifecycle
//! ```
//!
//! Routes:
//! - `POST /products` create
//! - `GET /products` list
//! - `PUT /products/{id}` update
//! - `DELETE /products/{id}` delete

// Core subsystems
pub mod config;
pub mod http;
pub mod products;
pub mod store;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use products::{Product, ProductModel};
pub use store::{MemoryStore, MongoStore, ProductStore};
