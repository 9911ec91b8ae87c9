//! Input set loader
//!
//! Reads one timetabling problem from a directory: a JSON structure file
//! with the ordered class, day and period lists plus the playtime label, and
//! one CSV file per catalogue. CSV cells arrive as text and flow through the
//! catalogue layer's declared-type coercion, so numeric columns may be
//! written as plain text and blank cells fall back to their defaults.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::catalogue::{Catalogue, RawRow, Record, Value};
use crate::domain::entities::{
    CalendarTask, FixedAssignment, Playtime, PlaytimeSlot, TeacherTask, DEFAULT_PLAYTIME_NAME,
};
use crate::domain::InputData;

pub const STRUCTURE_FILE: &str = "timetable.json";
pub const CALENDAR_TASKS_FILE: &str = "calendar_tasks.csv";
pub const TEACHER_TASKS_FILE: &str = "teacher_tasks.csv";
pub const PLAYTIME_FILE: &str = "playtime.csv";
pub const FIXED_ASSIGNMENTS_FILE: &str = "fixed_assignments.csv";

/// Shape of the JSON structure file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableStructure {
    pub classes: Vec<String>,
    pub days: Vec<String>,
    pub times: Vec<String>,
    #[serde(default = "default_playtime_name")]
    pub playtime_name: String,
}

fn default_playtime_name() -> String {
    DEFAULT_PLAYTIME_NAME.to_string()
}

/// Loads an [`InputData`] from a directory of flat files
pub struct InputLoader;

impl InputLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load_dir<P: AsRef<Path>>(&self, dir: P) -> Result<InputData> {
        let dir = dir.as_ref();
        let structure = self.load_structure(&dir.join(STRUCTURE_FILE))?;

        let calendar_tasks: Catalogue<CalendarTask> =
            self.load_catalogue(&dir.join(CALENDAR_TASKS_FILE), true)?;
        let teacher_tasks: Catalogue<TeacherTask> =
            self.load_catalogue(&dir.join(TEACHER_TASKS_FILE), true)?;
        let playtime_slots: Catalogue<PlaytimeSlot> =
            self.load_catalogue(&dir.join(PLAYTIME_FILE), false)?;
        let fixed_assignments: Catalogue<FixedAssignment> =
            self.load_catalogue(&dir.join(FIXED_ASSIGNMENTS_FILE), false)?;

        info!(
            "loaded {} calendar tasks, {} eligibilities, {} playtime slots, {} fixed assignments",
            calendar_tasks.len(),
            teacher_tasks.len(),
            playtime_slots.len(),
            fixed_assignments.len()
        );

        Ok(InputData {
            classes: structure.classes,
            days: structure.days,
            times: structure.times,
            playtime: Playtime::new(structure.playtime_name, playtime_slots),
            teacher_tasks,
            calendar_tasks,
            fixed_assignments,
        })
    }

    fn load_structure(&self, path: &Path) -> Result<TimetableStructure> {
        let file = File::open(path)
            .with_context(|| format!("failed to open structure file {}", path.display()))?;
        serde_json::from_reader(file)
            .with_context(|| format!("invalid structure file {}", path.display()))
    }

    /// Loads one catalogue CSV; a missing optional file yields an empty
    /// catalogue
    fn load_catalogue<R: Record>(&self, path: &Path, required: bool) -> Result<Catalogue<R>> {
        if !path.exists() {
            if required {
                anyhow::bail!(
                    "missing catalogue file {} for {}",
                    path.display(),
                    R::catalogue_name()
                );
            }
            return Ok(Catalogue::empty());
        }

        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let columns: Vec<String> = reader
            .headers()
            .with_context(|| format!("missing header row in {}", path.display()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.with_context(|| format!("malformed row in {}", path.display()))?;
            let mut row = RawRow::new();
            for (column, cell) in columns.iter().zip(record.iter()) {
                let cell = cell.trim();
                // blank cells are nulls and fall back to column defaults
                if !cell.is_empty() {
                    row.insert(column.clone(), Value::Str(cell.to_string()));
                }
            }
            rows.push(row);
        }

        Catalogue::from_table(&columns, rows)
            .with_context(|| format!("invalid catalogue {}", path.display()))
    }
}

impl Default for InputLoader {
    fn default() -> Self {
        Self::new()
    }
}
