pub mod catalogue;
pub mod entities;
pub mod errors;
pub mod input_data;

pub use catalogue::{Catalogue, CatalogueOptions, ColumnKind, ColumnSpec, RawRow, Record, Value};
pub use errors::CatalogueError;
pub use input_data::InputData;

/// Task label of guard (supervision) duty, whose weekly count per teacher is
/// balanced by the optimizer
pub const GUARD_TASK: &str = "garda";
