//! Output calendar entity module
//!
//! A calendar is a named day×time grid, either a class timetable or a
//! teacher's personal timetable. Cells hold the human-readable task label and
//! default to the empty string.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::catalogue::{
    take_str, Catalogue, ColumnKind, ColumnSpec, RawRow, Record, Value,
};
use crate::domain::errors::CatalogueError;

/// One grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub day: String,
    pub time: String,
    pub task: String,
}

impl Record for CalendarEntry {
    type Key = (String, String);

    fn catalogue_name() -> &'static str {
        "Calendar"
    }

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::key("day", ColumnKind::Str),
            ColumnSpec::key("time", ColumnKind::Str),
            ColumnSpec::optional("task", ColumnKind::Str, Value::Str(String::new())),
        ]
    }

    fn key(&self) -> Self::Key {
        (self.day.clone(), self.time.clone())
    }

    fn from_cells(cells: &RawRow) -> Result<Self, CatalogueError> {
        let name = Self::catalogue_name();
        Ok(Self {
            day: take_str(name, cells, "day")?,
            time: take_str(name, cells, "time")?,
            task: take_str(name, cells, "task")?,
        })
    }

    fn get(&self, column: &str) -> Option<Value> {
        match column {
            "day" => Some(Value::Str(self.day.clone())),
            "time" => Some(Value::Str(self.time.clone())),
            "task" => Some(Value::Str(self.task.clone())),
            _ => None,
        }
    }

    fn set(&mut self, column: &str, value: &Value) -> Result<(), CatalogueError> {
        if column == "task" {
            if let Some(task) = value.as_str() {
                self.task = task.to_string();
            }
        }
        Ok(())
    }
}

/// A named day×time timetable grid
#[derive(Debug, Clone)]
pub struct Calendar {
    pub name: String,
    pub days: Vec<String>,
    pub times: Vec<String>,
    entries: Catalogue<CalendarEntry>,
}

impl Calendar {
    /// Creates a grid with every cell blank
    ///
    /// # Arguments
    ///
    /// * `name` - Calendar name (a class or a teacher)
    /// * `days` - Day labels in display order
    /// * `times` - Period labels in display order
    pub fn new(name: impl Into<String>, days: Vec<String>, times: Vec<String>) -> Self {
        let mut entries = Catalogue::empty();
        for day in &days {
            for time in &times {
                entries.add(CalendarEntry {
                    day: day.clone(),
                    time: time.clone(),
                    task: String::new(),
                });
            }
        }
        Self {
            name: name.into(),
            days,
            times,
            entries,
        }
    }

    pub fn set_task(&mut self, day: &str, time: &str, task: impl Into<String>) {
        self.entries.add(CalendarEntry {
            day: day.to_string(),
            time: time.to_string(),
            task: task.into(),
        });
    }

    pub fn task_at(&self, day: &str, time: &str) -> &str {
        self.entries
            .find(&(day.to_string(), time.to_string()))
            .map(|e| e.task.as_str())
            .unwrap_or("")
    }

    /// Cells in grid order: days outer, times inner
    pub fn iter_grid(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.days.iter().flat_map(move |day| {
            self.times
                .iter()
                .map(move |time| (day.as_str(), time.as_str(), self.task_at(day, time)))
        })
    }

    pub fn entries(&self) -> &Catalogue<CalendarEntry> {
        &self.entries
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time_width = self
            .times
            .iter()
            .map(|t| t.len())
            .max()
            .unwrap_or(0);
        let mut day_widths: Vec<usize> = self.days.iter().map(|d| d.len()).collect();
        for (i, day) in self.days.iter().enumerate() {
            for time in &self.times {
                day_widths[i] = day_widths[i].max(self.task_at(day, time).len());
            }
        }

        writeln!(f, "{}", self.name)?;
        write!(f, "{:<width$}", "", width = time_width)?;
        for (i, day) in self.days.iter().enumerate() {
            write!(f, " | {:<width$}", day, width = day_widths[i])?;
        }
        for time in &self.times {
            writeln!(f)?;
            write!(f, "{:<width$}", time, width = time_width)?;
            for (i, day) in self.days.iter().enumerate() {
                write!(f, " | {:<width$}", self.task_at(day, time), width = day_widths[i])?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cells_default_to_empty() {
        let calendar = Calendar::new("1A", strings(&["Mo", "Tu"]), strings(&["t1"]));
        assert_eq!(calendar.task_at("Mo", "t1"), "");
        assert_eq!(calendar.entries().len(), 2);
    }

    #[test]
    fn test_set_task_overwrites_cell() {
        let mut calendar = Calendar::new("1A", strings(&["Mo"]), strings(&["t1"]));
        calendar.set_task("Mo", "t1", "maths");
        calendar.set_task("Mo", "t1", "music");
        assert_eq!(calendar.task_at("Mo", "t1"), "music");
        assert_eq!(calendar.entries().len(), 1);
    }

    #[test]
    fn test_grid_order_follows_declared_day_and_time_order() {
        let calendar = Calendar::new("1A", strings(&["Tu", "Mo"]), strings(&["t2", "t1"]));
        let cells: Vec<(&str, &str)> = calendar.iter_grid().map(|(d, t, _)| (d, t)).collect();
        assert_eq!(
            cells,
            vec![("Tu", "t2"), ("Tu", "t1"), ("Mo", "t2"), ("Mo", "t1")]
        );
    }
}
