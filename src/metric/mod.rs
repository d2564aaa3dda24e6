//! Row-to-metric conversion.
//!
//! A result row goes through three steps before it is emitted:
//! - each cell is coerced into a typed [`FieldValue`] ([`value`])
//! - the coerced cells are keyed by column name into a [`FieldSet`] ([`row`])
//! - the configured tag columns are moved into a [`TagSet`] ([`tags`])
//!
//! [`line_protocol`] renders the resulting metrics for InfluxDB.

pub mod line_protocol;
pub mod row;
pub mod tags;
pub mod value;

pub use row::{FieldSet, RawCell, RowError, materialize};
pub use tags::{TagSet, extract_tags, use_field_as_tag};
pub use value::{FieldValue, coerce};

use serde::Serialize;

/// A single metric observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub measurement: String,
    pub tags: TagSet,
    pub fields: FieldSet,
}

impl Metric {
    pub fn new(measurement: impl Into<String>, fields: FieldSet, tags: TagSet) -> Self {
        Self {
            measurement: measurement.into(),
            tags,
            fields,
        }
    }
}
