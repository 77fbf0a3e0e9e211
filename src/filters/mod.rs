pub mod columns;
pub mod field_filter;

pub use columns::{Column, select_columns};
pub use field_filter::FieldFilter;
