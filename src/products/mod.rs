//! Product resource: entity types, schema and the validated model.

pub mod model;
pub mod schema;
pub mod types;

pub use model::{ProductError, ProductModel, ProductResult};
pub use schema::{FieldError, FieldErrorKind, ValidationError, PRODUCT_SCHEMA};
pub use types::{NewProduct, Product, ProductPatch};
