//! Declarative product schema and the validation that applies it.
//!
//! Constraints live in [`PRODUCT_SCHEMA`] as data. Validation walks the rules
//! in order, so errors are always reported in schema order:
//!
//! ```text
//! JSON body ─▶ cast (per FieldKind) ─▶ required / min checks ─▶ NewProduct | ProductPatch
//!                      └──────────────── FieldError ─────────────┘
//! ```

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::products::types::{NewProduct, Product, ProductPatch};

/// Storage type of a schema path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
}

impl FieldKind {
    fn name(self) -> &'static str {
        match self {
            FieldKind::String => "String",
            FieldKind::Number => "Number",
        }
    }
}

/// Constraints attached to one path of the schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub path: &'static str,
    pub kind: FieldKind,
    /// Message reported when the value is absent, null or empty.
    pub required: Option<&'static str>,
    /// Inclusive lower bound for numbers.
    pub min: Option<f64>,
}

pub const PRODUCT_SCHEMA: &[FieldRule] = &[
    FieldRule {
        path: "name",
        kind: FieldKind::String,
        required: Some("Product name is required"),
        min: None,
    },
    FieldRule {
        path: "price",
        kind: FieldKind::Number,
        required: Some("Product price is required"),
        min: Some(0.0),
    },
    FieldRule {
        path: "category",
        kind: FieldKind::String,
        required: Some("Product category is required"),
        min: None,
    },
];

/// Paths that can never be written by clients.
const IMMUTABLE_PATHS: &[&str] = &["id", "_id"];

/// A value after casting to its schema kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    Cast,
    Min,
    Immutable,
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{path}: {message}")]
pub struct FieldError {
    pub path: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

/// Every constraint a document violated, in schema order.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{prefix}: {}", join_errors(.errors))]
pub struct ValidationError {
    prefix: &'static str,
    pub errors: Vec<FieldError>,
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    fn on_create(errors: Vec<FieldError>) -> Self {
        Self {
            prefix: "Product validation failed",
            errors,
        }
    }

    fn on_update(errors: Vec<FieldError>) -> Self {
        Self {
            prefix: "Validation failed",
            errors,
        }
    }

    /// Paths that failed, in report order.
    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}

impl FieldRule {
    /// Cast a raw JSON value. `Ok(None)` means the value counts as absent.
    fn cast(&self, value: &Value) -> Result<Option<FieldValue>, FieldError> {
        let cast = match (self.kind, value) {
            (_, Value::Null) => return Ok(None),
            (FieldKind::String, Value::String(s)) => Some(FieldValue::Text(s.clone())),
            (FieldKind::String, Value::Number(n)) => Some(FieldValue::Text(n.to_string())),
            (FieldKind::String, Value::Bool(b)) => Some(FieldValue::Text(b.to_string())),
            (FieldKind::Number, Value::Number(n)) => n.as_f64().map(FieldValue::Number),
            (FieldKind::Number, Value::Bool(b)) => {
                Some(FieldValue::Number(if *b { 1.0 } else { 0.0 }))
            }
            (FieldKind::Number, Value::String(s)) if s.trim().is_empty() => return Ok(None),
            (FieldKind::Number, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(FieldValue::Number),
            _ => None,
        };

        cast.map(Some).ok_or_else(|| FieldError {
            path: self.path.to_string(),
            kind: FieldErrorKind::Cast,
            message: format!(
                "Cast to {} failed for value \"{}\" (type {}) at path \"{}\"",
                self.kind.name(),
                match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
                type_name(value),
                self.path
            ),
        })
    }

    /// Check required and lower-bound constraints on a cast value.
    fn check(&self, value: Option<&FieldValue>) -> Result<(), FieldError> {
        let missing = match value {
            None => true,
            Some(FieldValue::Text(s)) => s.is_empty(),
            Some(FieldValue::Number(_)) => false,
        };
        if missing {
            return match self.required {
                Some(message) => Err(self.error(FieldErrorKind::Required, message.to_string())),
                None => Ok(()),
            };
        }

        if let (Some(min), Some(FieldValue::Number(n))) = (self.min, value) {
            if *n < min {
                return Err(self.error(
                    FieldErrorKind::Min,
                    format!(
                        "Path `{}` ({}) is less than minimum allowed value ({}).",
                        self.path, n, min
                    ),
                ));
            }
        }

        Ok(())
    }

    fn error(&self, kind: FieldErrorKind, message: String) -> FieldError {
        FieldError {
            path: self.path.to_string(),
            kind,
            message,
        }
    }
}

type FieldMap = BTreeMap<&'static str, FieldValue>;

fn take_text(fields: &mut FieldMap, path: &str) -> Option<String> {
    match fields.remove(path) {
        Some(FieldValue::Text(s)) => Some(s),
        _ => None,
    }
}

fn take_number(fields: &mut FieldMap, path: &str) -> Option<f64> {
    match fields.remove(path) {
        Some(FieldValue::Number(n)) => Some(n),
        _ => None,
    }
}

/// Validate a creation body against the full schema.
///
/// Unknown fields are ignored; a non-object body behaves like `{}`.
pub fn validate_new(body: &Value) -> Result<NewProduct, ValidationError> {
    let object = body.as_object();
    let mut fields = FieldMap::new();
    let mut errors = Vec::new();

    for rule in PRODUCT_SCHEMA {
        let cast = match object.and_then(|o| o.get(rule.path)) {
            Some(raw) => rule.cast(raw),
            None => Ok(None),
        };
        let checked = cast.and_then(|value| {
            rule.check(value.as_ref())?;
            Ok(value)
        });
        match checked {
            Ok(Some(value)) => {
                fields.insert(rule.path, value);
            }
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        return Err(ValidationError::on_create(errors));
    }

    match (
        take_text(&mut fields, "name"),
        take_number(&mut fields, "price"),
        take_text(&mut fields, "category"),
    ) {
        (Some(name), Some(price), Some(category)) => Ok(NewProduct {
            name,
            price,
            category,
        }),
        // Unreachable while every schema path is required.
        _ => Err(ValidationError::on_create(Vec::new())),
    }
}

/// Validate an update body.
///
/// Only the paths present in the body are cast and checked. Since the stored
/// document already satisfies the schema, a patch that passes here yields a
/// merged document that satisfies the full schema as well. An explicit `null`
/// or empty string on a required path is therefore rejected.
pub fn validate_patch(body: &Value) -> Result<ProductPatch, ValidationError> {
    let Some(object) = body.as_object() else {
        return Ok(ProductPatch::default());
    };
    let mut fields = FieldMap::new();
    let mut errors = Vec::new();

    for path in IMMUTABLE_PATHS {
        if object.contains_key(*path) {
            errors.push(FieldError {
                path: path.to_string(),
                kind: FieldErrorKind::Immutable,
                message: format!("Path `{}` is immutable and cannot be updated", path),
            });
        }
    }

    for rule in PRODUCT_SCHEMA {
        let Some(raw) = object.get(rule.path) else {
            continue;
        };
        let checked = rule.cast(raw).and_then(|value| {
            rule.check(value.as_ref())?;
            Ok(value)
        });
        match checked {
            Ok(Some(value)) => {
                fields.insert(rule.path, value);
            }
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        return Err(ValidationError::on_update(errors));
    }

    Ok(ProductPatch {
        name: take_text(&mut fields, "name"),
        price: take_number(&mut fields, "price"),
        category: take_text(&mut fields, "category"),
    })
}

/// Re-check a complete document, e.g. after a patch has been merged into it.
pub fn validate_document(product: &Product) -> Result<(), ValidationError> {
    let errors: Vec<_> = PRODUCT_SCHEMA
        .iter()
        .filter_map(|rule| {
            let value = match rule.path {
                "name" => FieldValue::Text(product.name.clone()),
                "price" => FieldValue::Number(product.price),
                "category" => FieldValue::Text(product.category.clone()),
                _ => return None,
            };
            rule.check(Some(&value)).err()
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::on_update(errors))
    }
}
