//! Index builder
//!
//! Materializes the two cross-product universes the optimization model is
//! declared over: `A`, the teacher assignment space (one element per eligible
//! (teacher, calendar, task) triple and slot), and `B`, the calendar
//! occupation space (one element per declared (calendar, task) pair and
//! slot). Both are enumerated deterministically: catalogue key order first,
//! then the positional order of days and times. Constraint emission and
//! decoding rely on that order.

use std::collections::HashMap;
use std::hash::Hash;

use crate::domain::InputData;

/// (teacher, calendar, task, day, time)
pub type TeacherSlotKey = (String, String, String, String, String);

/// (calendar, task, day, time)
pub type ClassSlotKey = (String, String, String, String);

/// An ordered set with O(1) key → position lookup
#[derive(Debug, Clone)]
pub struct IndexedSet<K: Eq + Hash + Clone> {
    entries: Vec<K>,
    positions: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> IndexedSet<K> {
    fn from_entries(entries: Vec<K>) -> Self {
        let positions = entries
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect();
        Self { entries, positions }
    }

    pub fn entries(&self) -> &[K] {
        &self.entries
    }

    pub fn position(&self, key: &K) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The two index universes of one problem instance
#[derive(Debug, Clone)]
pub struct TimetableIndices {
    /// Teacher assignment universe `A`
    pub a: IndexedSet<TeacherSlotKey>,
    /// Calendar occupation universe `B`
    pub b: IndexedSet<ClassSlotKey>,
}

pub struct BuildIndices;

impl BuildIndices {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, data: &InputData) -> TimetableIndices {
        let mut a = Vec::with_capacity(
            data.teacher_tasks.len() * data.days.len() * data.times.len(),
        );
        for row in data.teacher_tasks.iter() {
            for day in &data.days {
                for time in &data.times {
                    a.push((
                        row.teacher.clone(),
                        row.calendar.clone(),
                        row.task.clone(),
                        day.clone(),
                        time.clone(),
                    ));
                }
            }
        }

        let mut b = Vec::with_capacity(
            data.calendar_tasks.len() * data.days.len() * data.times.len(),
        );
        for row in data.calendar_tasks.iter() {
            for day in &data.days {
                for time in &data.times {
                    b.push((
                        row.calendar.clone(),
                        row.task.clone(),
                        day.clone(),
                        time.clone(),
                    ));
                }
            }
        }

        TimetableIndices {
            a: IndexedSet::from_entries(a),
            b: IndexedSet::from_entries(b),
        }
    }
}

impl Default for BuildIndices {
    fn default() -> Self {
        Self::new()
    }
}
