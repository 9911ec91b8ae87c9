//! Calendar task demand entity module
//!
//! Each row declares that a calendar (a class or a teacher's personal
//! calendar) wants a task scheduled, together with its weekly envelope, an
//! optional daily cap and the number of teachers that must staff each
//! occurrence.

use serde::{Deserialize, Serialize};

use crate::domain::catalogue::{
    take_float, take_str, take_uint, ColumnKind, ColumnSpec, RawRow, Record, Value,
};
use crate::domain::errors::CatalogueError;

/// Weekly demand of one task on one calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarTask {
    pub calendar: String,
    pub task: String,
    /// Minimum weekly occurrences
    pub min_time_periods: u32,
    /// Maximum weekly occurrences; `+∞` when unconstrained
    pub max_time_periods: f64,
    /// Maximum occurrences on a single day; `+∞` when unconstrained
    pub max_time_period_per_day: f64,
    /// Teachers required per occurrence; `0` is reserved for the break task
    pub num_teachers: u32,
}

impl CalendarTask {
    pub fn new(calendar: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            calendar: calendar.into(),
            task: task.into(),
            min_time_periods: 0,
            max_time_periods: f64::INFINITY,
            max_time_period_per_day: f64::INFINITY,
            num_teachers: 1,
        }
    }

    pub fn with_weekly(mut self, min: u32, max: f64) -> Self {
        self.min_time_periods = min;
        self.max_time_periods = max;
        self
    }

    pub fn with_daily_cap(mut self, cap: f64) -> Self {
        self.max_time_period_per_day = cap;
        self
    }

    pub fn with_num_teachers(mut self, num_teachers: u32) -> Self {
        self.num_teachers = num_teachers;
        self
    }
}

impl Record for CalendarTask {
    type Key = (String, String);

    fn catalogue_name() -> &'static str {
        "CalendarTasks"
    }

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::key("calendar", ColumnKind::Str),
            ColumnSpec::key("task", ColumnKind::Str),
            ColumnSpec::optional("min_time_periods", ColumnKind::Int, Value::Int(0)),
            ColumnSpec::optional(
                "max_time_periods",
                ColumnKind::Float,
                Value::Float(f64::INFINITY),
            ),
            ColumnSpec::optional(
                "max_time_period_per_day",
                ColumnKind::Float,
                Value::Float(f64::INFINITY),
            ),
            ColumnSpec::optional("num_teachers", ColumnKind::Int, Value::Int(1)),
        ]
    }

    fn key(&self) -> Self::Key {
        (self.calendar.clone(), self.task.clone())
    }

    fn from_cells(cells: &RawRow) -> Result<Self, CatalogueError> {
        let name = Self::catalogue_name();
        Ok(Self {
            calendar: take_str(name, cells, "calendar")?,
            task: take_str(name, cells, "task")?,
            min_time_periods: take_uint(name, cells, "min_time_periods")?,
            max_time_periods: take_float(name, cells, "max_time_periods")?,
            max_time_period_per_day: take_float(name, cells, "max_time_period_per_day")?,
            num_teachers: take_uint(name, cells, "num_teachers")?,
        })
    }

    fn get(&self, column: &str) -> Option<Value> {
        match column {
            "calendar" => Some(Value::Str(self.calendar.clone())),
            "task" => Some(Value::Str(self.task.clone())),
            "min_time_periods" => Some(Value::Int(self.min_time_periods as i64)),
            "max_time_periods" => Some(Value::Float(self.max_time_periods)),
            "max_time_period_per_day" => Some(Value::Float(self.max_time_period_per_day)),
            "num_teachers" => Some(Value::Int(self.num_teachers as i64)),
            _ => None,
        }
    }

    fn set(&mut self, column: &str, value: &Value) -> Result<(), CatalogueError> {
        let name = Self::catalogue_name();
        match column {
            "min_time_periods" => {
                self.min_time_periods =
                    value
                        .as_int()
                        .and_then(|i| u32::try_from(i).ok())
                        .ok_or_else(|| CatalogueError::BadType {
                            catalogue: name,
                            column: column.to_string(),
                            value: value.to_string(),
                            expected: "int >= 0",
                        })?
            }
            "max_time_periods" => {
                self.max_time_periods = value.as_float().unwrap_or(self.max_time_periods)
            }
            "max_time_period_per_day" => {
                self.max_time_period_per_day =
                    value.as_float().unwrap_or(self.max_time_period_per_day)
            }
            "num_teachers" => {
                self.num_teachers =
                    value
                        .as_int()
                        .and_then(|i| u32::try_from(i).ok())
                        .ok_or_else(|| CatalogueError::BadType {
                            catalogue: name,
                            column: column.to_string(),
                            value: value.to_string(),
                            expected: "int >= 0",
                        })?
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalogue::Catalogue;
    use std::collections::BTreeMap;

    #[test]
    fn test_builder_defaults() {
        let row = CalendarTask::new("1A", "maths");
        assert_eq!(row.min_time_periods, 0);
        assert!(row.max_time_periods.is_infinite());
        assert!(row.max_time_period_per_day.is_infinite());
        assert_eq!(row.num_teachers, 1);
    }

    #[test]
    fn test_from_table_applies_declared_defaults() {
        let columns = vec![
            "calendar".to_string(),
            "task".to_string(),
            "min_time_periods".to_string(),
        ];
        let mut row = BTreeMap::new();
        row.insert("calendar".to_string(), Value::Str("1A".into()));
        row.insert("task".to_string(), Value::Str("maths".into()));
        row.insert("min_time_periods".to_string(), Value::Str("2".into()));

        let catalogue: Catalogue<CalendarTask> =
            Catalogue::from_table(&columns, vec![row]).unwrap();
        let task = &catalogue.rows()[0];

        assert_eq!(task.min_time_periods, 2);
        assert!(task.max_time_periods.is_infinite());
        assert_eq!(task.num_teachers, 1);
    }
}
