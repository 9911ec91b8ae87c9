//! Pre-fixed assignment entity module

use serde::{Deserialize, Serialize};

use crate::domain::catalogue::{take_str, ColumnKind, ColumnSpec, RawRow, Record, Value};
use crate::domain::errors::CatalogueError;

/// An assignment decided before the solve: the teacher performs the task for
/// the calendar at the given day and period, unconditionally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedAssignment {
    pub teacher: String,
    pub calendar: String,
    pub task: String,
    pub day: String,
    pub time: String,
}

impl FixedAssignment {
    pub fn new(
        teacher: impl Into<String>,
        calendar: impl Into<String>,
        task: impl Into<String>,
        day: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            teacher: teacher.into(),
            calendar: calendar.into(),
            task: task.into(),
            day: day.into(),
            time: time.into(),
        }
    }
}

impl Record for FixedAssignment {
    type Key = (String, String, String, String, String);

    fn catalogue_name() -> &'static str {
        "FixedTeacherCalendarTaskDayTimes"
    }

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::key("teacher", ColumnKind::Str),
            ColumnSpec::key("calendar", ColumnKind::Str),
            ColumnSpec::key("task", ColumnKind::Str),
            ColumnSpec::key("day", ColumnKind::Str),
            ColumnSpec::key("time", ColumnKind::Str),
        ]
    }

    fn key(&self) -> Self::Key {
        (
            self.teacher.clone(),
            self.calendar.clone(),
            self.task.clone(),
            self.day.clone(),
            self.time.clone(),
        )
    }

    fn from_cells(cells: &RawRow) -> Result<Self, CatalogueError> {
        let name = Self::catalogue_name();
        Ok(Self {
            teacher: take_str(name, cells, "teacher")?,
            calendar: take_str(name, cells, "calendar")?,
            task: take_str(name, cells, "task")?,
            day: take_str(name, cells, "day")?,
            time: take_str(name, cells, "time")?,
        })
    }

    fn get(&self, column: &str) -> Option<Value> {
        match column {
            "teacher" => Some(Value::Str(self.teacher.clone())),
            "calendar" => Some(Value::Str(self.calendar.clone())),
            "task" => Some(Value::Str(self.task.clone())),
            "day" => Some(Value::Str(self.day.clone())),
            "time" => Some(Value::Str(self.time.clone())),
            _ => None,
        }
    }

    fn set(&mut self, _column: &str, _value: &Value) -> Result<(), CatalogueError> {
        Ok(())
    }
}
