//! Input aggregate module
//!
//! [`InputData`] bundles the six catalogues of a timetabling problem and
//! derives the teacher, calendar and task universes from them. It is frozen
//! for the duration of a solve; the model builder only reads it.

use crate::domain::catalogue::{Catalogue, Record};
use crate::domain::entities::{CalendarTask, FixedAssignment, Playtime, TeacherTask};
use crate::domain::errors::CatalogueError;

/// The full tabular input of one solve
#[derive(Debug, Clone)]
pub struct InputData {
    /// Class calendars, in display order
    pub classes: Vec<String>,
    /// School days, in display order
    pub days: Vec<String>,
    /// Daily periods, in display order
    pub times: Vec<String>,
    pub playtime: Playtime,
    pub teacher_tasks: Catalogue<TeacherTask>,
    pub calendar_tasks: Catalogue<CalendarTask>,
    pub fixed_assignments: Catalogue<FixedAssignment>,
}

impl InputData {
    /// Distinct teachers appearing in the eligibility catalogue, in key order
    pub fn teachers(&self) -> Vec<String> {
        unique(self.teacher_tasks.iter().map(|row| row.teacher.clone()))
    }

    /// Distinct calendars appearing in the demand catalogue, in key order.
    ///
    /// A calendar is either a class or a teacher's personal calendar; the
    /// distinction is membership in `classes`.
    pub fn calendars(&self) -> Vec<String> {
        unique(self.calendar_tasks.iter().map(|row| row.calendar.clone()))
    }

    /// Distinct tasks in the demand catalogue plus the playtime label
    pub fn tasks(&self) -> Vec<String> {
        let mut tasks = unique(self.calendar_tasks.iter().map(|row| row.task.clone()));
        if !tasks.iter().any(|t| *t == self.playtime.name) {
            tasks.push(self.playtime.name.clone());
        }
        tasks
    }

    /// Cross-catalogue well-formedness checks.
    ///
    /// Failures are fatal: the model builder refuses data that does not pass.
    pub fn validate(&self) -> Result<(), CatalogueError> {
        let demands = self.calendar_tasks.by_key();

        for class in &self.classes {
            if !self
                .calendar_tasks
                .iter()
                .any(|row| row.calendar == *class)
            {
                return Err(CatalogueError::ReferentialIntegrity {
                    catalogue: CalendarTask::catalogue_name(),
                    detail: format!("class '{}' declares no tasks", class),
                });
            }
        }

        for row in self.teacher_tasks.iter() {
            if !demands.contains_key(&(row.calendar.clone(), row.task.clone())) {
                return Err(CatalogueError::ReferentialIntegrity {
                    catalogue: TeacherTask::catalogue_name(),
                    detail: format!(
                        "({}, {}, {}) references an undeclared calendar task",
                        row.teacher, row.calendar, row.task
                    ),
                });
            }
        }

        let eligibilities = self.teacher_tasks.by_key();
        for row in self.fixed_assignments.iter() {
            if !demands.contains_key(&(row.calendar.clone(), row.task.clone())) {
                return Err(CatalogueError::ReferentialIntegrity {
                    catalogue: FixedAssignment::catalogue_name(),
                    detail: format!(
                        "({}, {}) is not a declared calendar task",
                        row.calendar, row.task
                    ),
                });
            }
            if !eligibilities.contains_key(&(
                row.teacher.clone(),
                row.calendar.clone(),
                row.task.clone(),
            )) {
                return Err(CatalogueError::ReferentialIntegrity {
                    catalogue: FixedAssignment::catalogue_name(),
                    detail: format!(
                        "teacher '{}' is not eligible for ({}, {})",
                        row.teacher, row.calendar, row.task
                    ),
                });
            }
            self.check_day_time(FixedAssignment::catalogue_name(), &row.day, &row.time)?;
        }

        for slot in self.playtime.slots.iter() {
            self.check_day_time("Playtime", &slot.day, &slot.time)?;
        }

        for row in self.calendar_tasks.iter() {
            if f64::from(row.min_time_periods) > row.max_time_periods {
                return Err(CatalogueError::ReferentialIntegrity {
                    catalogue: CalendarTask::catalogue_name(),
                    detail: format!(
                        "({}, {}): min_time_periods {} exceeds max_time_periods {}",
                        row.calendar, row.task, row.min_time_periods, row.max_time_periods
                    ),
                });
            }
            if row.max_time_period_per_day.is_finite()
                && row.max_time_period_per_day > row.max_time_periods
            {
                return Err(CatalogueError::ReferentialIntegrity {
                    catalogue: CalendarTask::catalogue_name(),
                    detail: format!(
                        "({}, {}): max_time_period_per_day {} exceeds max_time_periods {}",
                        row.calendar, row.task, row.max_time_period_per_day, row.max_time_periods
                    ),
                });
            }
            if row.num_teachers == 0 && row.task != self.playtime.name {
                return Err(CatalogueError::ReferentialIntegrity {
                    catalogue: CalendarTask::catalogue_name(),
                    detail: format!(
                        "({}, {}): num_teachers = 0 is reserved for the break task '{}'",
                        row.calendar, row.task, self.playtime.name
                    ),
                });
            }
        }

        Ok(())
    }

    fn check_day_time(
        &self,
        catalogue: &'static str,
        day: &str,
        time: &str,
    ) -> Result<(), CatalogueError> {
        if !self.days.iter().any(|d| d == day) {
            return Err(CatalogueError::ReferentialIntegrity {
                catalogue,
                detail: format!("unknown day '{}'", day),
            });
        }
        if !self.times.iter().any(|t| t == time) {
            return Err(CatalogueError::ReferentialIntegrity {
                catalogue,
                detail: format!("unknown time '{}'", time),
            });
        }
        Ok(())
    }
}

/// Unique values keeping the order in which the elements appear
fn unique<I: Iterator<Item = String>>(items: I) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.filter(|item| seen.insert(item.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalogue::Catalogue;
    use crate::domain::entities::PlaytimeSlot;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn minimal() -> InputData {
        InputData {
            classes: strings(&["X"]),
            days: strings(&["Mo"]),
            times: strings(&["t1", "t2"]),
            playtime: Playtime::default(),
            teacher_tasks: Catalogue::new(vec![TeacherTask::new("T1", "X", "a")]).unwrap(),
            calendar_tasks: Catalogue::new(vec![
                CalendarTask::new("X", "a").with_weekly(2, 2.0)
            ])
            .unwrap(),
            fixed_assignments: Catalogue::empty(),
        }
    }

    #[test]
    fn test_derived_universes() {
        let data = minimal();
        assert_eq!(data.teachers(), strings(&["T1"]));
        assert_eq!(data.calendars(), strings(&["X"]));
        assert_eq!(data.tasks(), strings(&["a", "playtime"]));
    }

    #[test]
    fn test_tasks_include_playtime_label_once() {
        let mut data = minimal();
        data.playtime = Playtime::new("a", Catalogue::empty());
        assert_eq!(data.tasks(), strings(&["a"]));
    }

    #[test]
    fn test_validate_accepts_minimal_problem() {
        assert!(minimal().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_calendar_task_reference() {
        let mut data = minimal();
        data.teacher_tasks = Catalogue::new(vec![TeacherTask::new("T1", "X", "ghost")]).unwrap();
        assert!(matches!(
            data.validate(),
            Err(CatalogueError::ReferentialIntegrity { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_fixed_assignment_without_eligibility() {
        let mut data = minimal();
        data.fixed_assignments = Catalogue::new(vec![FixedAssignment::new(
            "T2", "X", "a", "Mo", "t1",
        )])
        .unwrap();
        assert!(matches!(
            data.validate(),
            Err(CatalogueError::ReferentialIntegrity { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_day() {
        let mut data = minimal();
        data.playtime = Playtime::new(
            "playtime",
            Catalogue::new(vec![PlaytimeSlot {
                calendar: "X".to_string(),
                day: "Su".to_string(),
                time: "t1".to_string(),
            }])
            .unwrap(),
        );
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_weekly_envelope() {
        let mut data = minimal();
        data.calendar_tasks =
            Catalogue::new(vec![CalendarTask::new("X", "a").with_weekly(3, 2.0)]).unwrap();
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unstaffed_regular_task() {
        let mut data = minimal();
        data.calendar_tasks = Catalogue::new(vec![
            CalendarTask::new("X", "a").with_weekly(2, 2.0).with_num_teachers(0),
        ])
        .unwrap();
        assert!(data.validate().is_err());
    }
}
