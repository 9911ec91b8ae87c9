//! Solution decoder
//!
//! Turns the primal values of a solved model into per-class and per-teacher
//! calendars. Decoding is deterministic: identical primal vectors produce
//! identical calendars, because universes, classes, teachers, days and times
//! are all enumerated in their fixed orders.

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::entities::Calendar;
use crate::domain::InputData;
use crate::infrastructure::solver::SolvedModel;

/// A binary read back from the solver counts as set above this level
const ASSIGNED: f64 = 0.5;

/// Violation of the decoder's internal invariants; fatal
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("class calendar '{class}' slot ({day}, {time}) holds {count} tasks, expected exactly one")]
    SlotCoverage {
        class: String,
        day: String,
        time: String,
        count: usize,
    },
}

pub struct DecodeCalendars;

impl DecodeCalendars {
    pub fn new() -> Self {
        Self
    }

    /// Produces class calendars in class order followed by teacher calendars
    /// in teacher order
    pub fn execute(
        &self,
        data: &InputData,
        solved: &SolvedModel,
    ) -> Result<Vec<Calendar>, DecodeError> {
        let mut calendars = self.class_calendars(data, solved)?;
        calendars.extend(self.teacher_calendars(data, solved));
        Ok(calendars)
    }

    fn class_calendars(
        &self,
        data: &InputData,
        solved: &SolvedModel,
    ) -> Result<Vec<Calendar>, DecodeError> {
        // Teachers actually assigned per occupied slot, in universe order
        let mut assigned: HashMap<(&str, &str, &str, &str), Vec<&str>> = HashMap::new();
        for (i, (teacher, calendar, task, day, time)) in
            solved.indices.a.entries().iter().enumerate()
        {
            if solved.x[i] > ASSIGNED {
                assigned
                    .entry((calendar.as_str(), task.as_str(), day.as_str(), time.as_str()))
                    .or_default()
                    .push(teacher.as_str());
            }
        }

        let mut calendars = Vec::with_capacity(data.classes.len());
        for class in &data.classes {
            let mut calendar = Calendar::new(class, data.days.clone(), data.times.clone());
            let mut coverage: HashMap<(&str, &str), usize> = HashMap::new();

            for day in &data.days {
                for time in &data.times {
                    if data.playtime.contains(class, day, time) {
                        calendar.set_task(day, time, data.playtime.name.clone());
                    }
                }
            }

            for (j, (calendar_name, task, day, time)) in
                solved.indices.b.entries().iter().enumerate()
            {
                if calendar_name != class || solved.y[j] <= ASSIGNED {
                    continue;
                }
                *coverage.entry((day.as_str(), time.as_str())).or_default() += 1;

                if *task == data.playtime.name {
                    calendar.set_task(day, time, data.playtime.name.clone());
                    continue;
                }
                let teachers = assigned
                    .get(&(
                        calendar_name.as_str(),
                        task.as_str(),
                        day.as_str(),
                        time.as_str(),
                    ))
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                if !teachers.is_empty() {
                    calendar.set_task(day, time, format!("{} ({})", task, teachers.join(", ")));
                }
            }

            for day in &data.days {
                for time in &data.times {
                    let count = coverage
                        .get(&(day.as_str(), time.as_str()))
                        .copied()
                        .unwrap_or(0);
                    if count != 1 {
                        return Err(DecodeError::SlotCoverage {
                            class: class.clone(),
                            day: day.clone(),
                            time: time.clone(),
                            count,
                        });
                    }
                }
            }

            calendars.push(calendar);
        }
        Ok(calendars)
    }

    fn teacher_calendars(&self, data: &InputData, solved: &SolvedModel) -> Vec<Calendar> {
        let teachers = data.teachers();
        let mut by_name: HashMap<&str, usize> = HashMap::new();
        let mut calendars: Vec<Calendar> = teachers
            .iter()
            .enumerate()
            .map(|(i, teacher)| {
                by_name.insert(teacher.as_str(), i);
                let mut calendar =
                    Calendar::new(teacher, data.days.clone(), data.times.clone());
                for day in &data.days {
                    for time in &data.times {
                        if data.playtime.contains(teacher, day, time) {
                            calendar.set_task(day, time, data.playtime.name.clone());
                        }
                    }
                }
                calendar
            })
            .collect();

        for (i, (teacher, calendar_name, task, day, time)) in
            solved.indices.a.entries().iter().enumerate()
        {
            if solved.x[i] <= ASSIGNED {
                continue;
            }
            let Some(&slot) = by_name.get(teacher.as_str()) else {
                continue;
            };
            // personal-calendar work and the break keep their bare label
            let label = if *task == data.playtime.name || calendar_name == teacher {
                task.clone()
            } else {
                format!("{} ({})", task, calendar_name)
            };
            calendars[slot].set_task(day, time, label);
        }

        calendars
    }
}

impl Default for DecodeCalendars {
    fn default() -> Self {
        Self::new()
    }
}
