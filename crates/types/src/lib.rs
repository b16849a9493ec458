//! Core data model for the tally reporting pipeline.
//!
//! A [`ResultSet`] is what a data source hands back for one query: an
//! ordered header plus row-major [`Value`] cells. Everything downstream
//! (shape normalization, rendering, export) reads from it and never
//! mutates it in place.

pub mod color;
pub mod error;
pub mod result_set;
pub mod value;

pub use color::Color;
pub use error::ShapeError;
pub use result_set::{ResultSet, RowRef};
pub use value::Value;
