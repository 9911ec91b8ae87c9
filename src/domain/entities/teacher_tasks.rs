//! Teacher eligibility entity module

use serde::{Deserialize, Serialize};

use crate::domain::catalogue::{take_str, ColumnKind, ColumnSpec, RawRow, Record, Value};
use crate::domain::errors::CatalogueError;

/// The statement that a teacher is allowed to perform a task for a calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherTask {
    pub teacher: String,
    pub calendar: String,
    pub task: String,
}

impl TeacherTask {
    pub fn new(
        teacher: impl Into<String>,
        calendar: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            teacher: teacher.into(),
            calendar: calendar.into(),
            task: task.into(),
        }
    }
}

impl Record for TeacherTask {
    type Key = (String, String, String);

    fn catalogue_name() -> &'static str {
        "TeacherCalendarTasks"
    }

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::key("teacher", ColumnKind::Str),
            ColumnSpec::key("calendar", ColumnKind::Str),
            ColumnSpec::key("task", ColumnKind::Str),
        ]
    }

    fn key(&self) -> Self::Key {
        (self.teacher.clone(), self.calendar.clone(), self.task.clone())
    }

    fn from_cells(cells: &RawRow) -> Result<Self, CatalogueError> {
        Ok(Self {
            teacher: take_str(Self::catalogue_name(), cells, "teacher")?,
            calendar: take_str(Self::catalogue_name(), cells, "calendar")?,
            task: take_str(Self::catalogue_name(), cells, "task")?,
        })
    }

    fn get(&self, column: &str) -> Option<Value> {
        match column {
            "teacher" => Some(Value::Str(self.teacher.clone())),
            "calendar" => Some(Value::Str(self.calendar.clone())),
            "task" => Some(Value::Str(self.task.clone())),
            _ => None,
        }
    }

    fn set(&mut self, _column: &str, _value: &Value) -> Result<(), CatalogueError> {
        Ok(())
    }
}
