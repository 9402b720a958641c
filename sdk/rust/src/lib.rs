//! Typed async client for the product API.

pub mod client;

pub use client::{ClientError, DeleteResponse, NewProduct, Product, ProductClient, ProductUpdate};
