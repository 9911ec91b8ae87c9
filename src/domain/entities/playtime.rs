//! Playtime entity module
//!
//! The playtime catalogue pins the break task to specific
//! (calendar, day, time) triples and carries the label under which the break
//! appears in every decoded grid.

use serde::{Deserialize, Serialize};

use crate::domain::catalogue::{
    take_str, Catalogue, ColumnKind, ColumnSpec, RawRow, Record, Value,
};
use crate::domain::errors::CatalogueError;

/// Label used when no explicit playtime name is configured
pub const DEFAULT_PLAYTIME_NAME: &str = "playtime";

/// One pinned break slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaytimeSlot {
    pub calendar: String,
    pub day: String,
    pub time: String,
}

impl Record for PlaytimeSlot {
    type Key = (String, String, String);

    fn catalogue_name() -> &'static str {
        "Playtime"
    }

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::key("calendar", ColumnKind::Str),
            ColumnSpec::key("day", ColumnKind::Str),
            ColumnSpec::key("time", ColumnKind::Str),
        ]
    }

    fn key(&self) -> Self::Key {
        (self.calendar.clone(), self.day.clone(), self.time.clone())
    }

    fn from_cells(cells: &RawRow) -> Result<Self, CatalogueError> {
        Ok(Self {
            calendar: take_str(Self::catalogue_name(), cells, "calendar")?,
            day: take_str(Self::catalogue_name(), cells, "day")?,
            time: take_str(Self::catalogue_name(), cells, "time")?,
        })
    }

    fn get(&self, column: &str) -> Option<Value> {
        match column {
            "calendar" => Some(Value::Str(self.calendar.clone())),
            "day" => Some(Value::Str(self.day.clone())),
            "time" => Some(Value::Str(self.time.clone())),
            _ => None,
        }
    }

    fn set(&mut self, _column: &str, _value: &Value) -> Result<(), CatalogueError> {
        Ok(())
    }
}

/// Break-period calendar: the pinned slots plus the break label
#[derive(Debug, Clone)]
pub struct Playtime {
    pub name: String,
    pub slots: Catalogue<PlaytimeSlot>,
}

impl Playtime {
    pub fn new(name: impl Into<String>, slots: Catalogue<PlaytimeSlot>) -> Self {
        Self {
            name: name.into(),
            slots,
        }
    }

    /// A playtime with the default label and no pinned slots
    pub fn unnamed() -> Self {
        Self::new(DEFAULT_PLAYTIME_NAME, Catalogue::empty())
    }

    /// Checks whether the break is pinned for a calendar at a slot
    ///
    /// # Arguments
    ///
    /// * `calendar` - Class or teacher calendar name
    /// * `day` - Day label
    /// * `time` - Period label
    ///
    /// # Returns
    ///
    /// `true` if the break-period calendar pins this slot, `false` otherwise
    pub fn contains(&self, calendar: &str, day: &str, time: &str) -> bool {
        self.slots.contains_key(&(
            calendar.to_string(),
            day.to_string(),
            time.to_string(),
        ))
    }
}

impl Default for Playtime {
    fn default() -> Self {
        Self::unnamed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(calendar: &str, day: &str, time: &str) -> PlaytimeSlot {
        PlaytimeSlot {
            calendar: calendar.to_string(),
            day: day.to_string(),
            time: time.to_string(),
        }
    }

    #[test]
    fn test_contains_pinned_slot() {
        let playtime = Playtime::new(
            "recreo",
            Catalogue::new(vec![slot("1A", "Mo", "t1")]).unwrap(),
        );
        assert!(playtime.contains("1A", "Mo", "t1"));
        assert!(!playtime.contains("1A", "Mo", "t2"));
    }

    #[test]
    fn test_default_label() {
        assert_eq!(Playtime::default().name, DEFAULT_PLAYTIME_NAME);
    }
}
