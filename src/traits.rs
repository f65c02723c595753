//! Trait definitions

mod mapping;
mod metric_field;

pub use mapping::{MapEvaluation, Mapping};
pub use metric_field::MetricField;
