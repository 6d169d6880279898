//! Sparse fieldsets
//!
//! [`type_has_properties`] validates a `fields` query parameter against a
//! DTO's declared field list; [`shape`] and [`shape_many`] project DTOs onto
//! the requested fields as ordered [`ShapedRecord`]s.

mod fields;
mod shaper;

pub use fields::{resolve_field, type_has_properties, Shape};
pub use shaper::{shape, shape_many, ShapedRecord};
