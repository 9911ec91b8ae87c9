pub mod calendar;
pub mod calendar_tasks;
pub mod fixed_assignments;
pub mod playtime;
pub mod teacher_tasks;

pub use calendar::{Calendar, CalendarEntry};
pub use calendar_tasks::CalendarTask;
pub use fixed_assignments::FixedAssignment;
pub use playtime::{Playtime, PlaytimeSlot, DEFAULT_PLAYTIME_NAME};
pub use teacher_tasks::TeacherTask;
