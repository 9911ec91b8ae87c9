pub mod build_indices;
pub mod build_model;
pub mod decode_calendars;
pub mod solve_timetable;

pub use build_indices::{BuildIndices, TimetableIndices};
pub use build_model::{BuildModel, TimetableModel};
pub use decode_calendars::DecodeCalendars;
pub use solve_timetable::{SolveTimetable, TimetableResult};
