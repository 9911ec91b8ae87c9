//! Solve orchestration
//!
//! One uninterrupted compute per call: validate the input, materialize the
//! index universes, build the program, run the solver, scan the elastic
//! slacks and decode the calendars. The only blocking point is the solver
//! invocation inside the driver. A solve whose backend terminates without a
//! primal still completes: the result carries the termination status and
//! empty calendars, and the caller decides the exit code.

use anyhow::Result;
use tracing::warn;

use crate::application::use_cases::build_indices::BuildIndices;
use crate::application::use_cases::build_model::{BuildModel, RejectedConstraint};
use crate::application::use_cases::decode_calendars::DecodeCalendars;
use crate::domain::entities::Calendar;
use crate::domain::InputData;
use crate::infrastructure::solver::{Infeasibility, MilpDriver, SolverStatus};

/// Outcome of one solve: the calendars plus everything a caller needs to
/// judge them
pub struct TimetableResult {
    /// Class calendars in class order, then teacher calendars in teacher
    /// order; empty when the solver exposed no primal
    pub calendars: Vec<Calendar>,
    pub status: SolverStatus,
    /// Objective value of the best primal, if there was one
    pub objective: Option<f64>,
    /// Residual violations found by the elastic slack scan
    pub infeasibilities: Vec<Infeasibility>,
    /// Constraint instances dropped as statically impossible
    pub rejected: Vec<RejectedConstraint>,
}

impl TimetableResult {
    /// Whether the solver produced a primal solution worth decoding
    pub fn has_solution(&self) -> bool {
        matches!(
            self.status,
            SolverStatus::Optimal | SolverStatus::Feasible
        )
    }
}

pub struct SolveTimetable {
    build_indices: BuildIndices,
    build_model: BuildModel,
    driver: MilpDriver,
    decoder: DecodeCalendars,
}

impl SolveTimetable {
    pub fn new() -> Self {
        Self::with_driver(MilpDriver::new())
    }

    /// Caps the solver wall clock; see [`MilpDriver::with_time_limit`]
    pub fn with_time_limit(seconds: f64) -> Self {
        Self::with_driver(MilpDriver::with_time_limit(seconds))
    }

    fn with_driver(driver: MilpDriver) -> Self {
        Self {
            build_indices: BuildIndices::new(),
            build_model: BuildModel::new(),
            driver,
            decoder: DecodeCalendars::new(),
        }
    }

    pub fn execute(&self, data: &InputData) -> Result<TimetableResult> {
        data.validate()?;

        let indices = self.build_indices.execute(data);
        let model = self.build_model.execute(data, indices);
        let outcome = self.driver.solve(model);

        let infeasibilities = outcome.infeasibilities();
        let objective = outcome.objective();
        let calendars = match &outcome.solution {
            Some(solved) => self.decoder.execute(data, solved)?,
            None => {
                warn!(
                    "no primal solution to decode (status: {}); emitting empty calendars",
                    outcome.status
                );
                Vec::new()
            }
        };

        Ok(TimetableResult {
            calendars,
            status: outcome.status,
            objective,
            infeasibilities,
            rejected: outcome.rejected,
        })
    }
}

impl Default for SolveTimetable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CalendarTask, Playtime, PlaytimeSlot, TeacherTask};
    use crate::domain::{Catalogue, GUARD_TASK};
    use crate::infrastructure::solver::SolvedModel;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn solve(data: &InputData) -> SolvedModel {
        data.validate().unwrap();
        let indices = BuildIndices::new().execute(data);
        let model = BuildModel::new().execute(data, indices);
        MilpDriver::new()
            .solve(model)
            .solution
            .expect("expected a primal solution")
    }

    #[track_caller]
    fn assert_value(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("variable not found");
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[track_caller]
    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    fn x_key(
        p: &str,
        c: &str,
        t: &str,
        d: &str,
        h: &str,
    ) -> (String, String, String, String, String) {
        (
            p.to_string(),
            c.to_string(),
            t.to_string(),
            d.to_string(),
            h.to_string(),
        )
    }

    fn y_key(c: &str, t: &str, d: &str, h: &str) -> (String, String, String, String) {
        (c.to_string(), t.to_string(), d.to_string(), h.to_string())
    }

    fn single_class(min: u32, max: f64) -> InputData {
        InputData {
            classes: strings(&["X"]),
            days: strings(&["Mo"]),
            times: strings(&["t1", "t2"]),
            playtime: Playtime::default(),
            teacher_tasks: Catalogue::new(vec![TeacherTask::new("T1", "X", "a")]).unwrap(),
            calendar_tasks: Catalogue::new(vec![
                CalendarTask::new("X", "a").with_weekly(min, max)
            ])
            .unwrap(),
            fixed_assignments: Catalogue::empty(),
        }
    }

    #[test]
    fn test_minimal_feasible_problem() {
        let data = single_class(2, 2.0);
        let solved = solve(&data);

        assert_value(solved.y_value(&y_key("X", "a", "Mo", "t1")), 1.0);
        assert_value(solved.y_value(&y_key("X", "a", "Mo", "t2")), 1.0);
        assert_value(solved.x_value(&x_key("T1", "X", "a", "Mo", "t1")), 1.0);
        assert_value(solved.x_value(&x_key("T1", "X", "a", "Mo", "t2")), 1.0);
        assert_close(solved.objective, 0.0);
        assert_close(solved.max_guard_periods, 0.0);
        assert!(solved.infeasibilities().is_empty());
    }

    #[test]
    fn test_unsatisfiable_weekly_minimum_is_absorbed_by_slack() {
        // three periods demanded, two exist
        let data = single_class(3, 3.0);
        let solved = solve(&data);

        assert_value(solved.y_value(&y_key("X", "a", "Mo", "t1")), 1.0);
        assert_value(solved.y_value(&y_key("X", "a", "Mo", "t2")), 1.0);
        let report = solved.infeasibilities();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].constraint, "weekly_task_periods");
        assert_close(report[0].slack, -1.0);
        assert_close(solved.objective, 1000.0);
    }

    #[test]
    fn test_two_teacher_task_is_double_staffed() {
        let data = InputData {
            classes: strings(&["X"]),
            days: strings(&["Mo"]),
            times: strings(&["t1"]),
            playtime: Playtime::default(),
            teacher_tasks: Catalogue::new(vec![
                TeacherTask::new("T1", "X", "r"),
                TeacherTask::new("T2", "X", "r"),
            ])
            .unwrap(),
            calendar_tasks: Catalogue::new(vec![CalendarTask::new("X", "r")
                .with_weekly(1, 1.0)
                .with_daily_cap(1.0)
                .with_num_teachers(2)])
            .unwrap(),
            fixed_assignments: Catalogue::empty(),
        };
        let solved = solve(&data);

        assert_value(solved.y_value(&y_key("X", "r", "Mo", "t1")), 1.0);
        assert_value(solved.x_value(&x_key("T1", "X", "r", "Mo", "t1")), 1.0);
        assert_value(solved.x_value(&x_key("T2", "X", "r", "Mo", "t1")), 1.0);
    }

    #[test]
    fn test_playtime_is_pinned_and_decoded() {
        let data = InputData {
            classes: strings(&["X"]),
            days: strings(&["Mo"]),
            times: strings(&["t1", "t2"]),
            playtime: Playtime::new(
                "recreo",
                Catalogue::new(vec![PlaytimeSlot {
                    calendar: "X".to_string(),
                    day: "Mo".to_string(),
                    time: "t1".to_string(),
                }])
                .unwrap(),
            ),
            teacher_tasks: Catalogue::new(vec![TeacherTask::new("T1", "X", "a")]).unwrap(),
            calendar_tasks: Catalogue::new(vec![
                CalendarTask::new("X", "recreo").with_num_teachers(0),
                CalendarTask::new("X", "a").with_weekly(1, 1.0),
            ])
            .unwrap(),
            fixed_assignments: Catalogue::empty(),
        };
        let solved = solve(&data);

        assert_value(solved.y_value(&y_key("X", "recreo", "Mo", "t1")), 1.0);
        assert_value(solved.y_value(&y_key("X", "recreo", "Mo", "t2")), 0.0);
        assert_value(solved.y_value(&y_key("X", "a", "Mo", "t2")), 1.0);

        let calendars = DecodeCalendars::new().execute(&data, &solved).unwrap();
        assert_eq!(calendars[0].task_at("Mo", "t1"), "recreo");
        assert_eq!(calendars[0].task_at("Mo", "t2"), "a (T1)");
    }

    #[test]
    fn test_guard_duty_is_balanced_across_teachers() {
        let teacher_rows: Vec<TeacherTask> = ["T1", "T2"]
            .iter()
            .flat_map(|p| {
                vec![
                    TeacherTask::new(*p, *p, GUARD_TASK),
                    TeacherTask::new(*p, *p, "libre"),
                ]
            })
            .collect();
        let demand_rows: Vec<CalendarTask> = ["T1", "T2"]
            .iter()
            .flat_map(|p| {
                vec![
                    CalendarTask::new(*p, GUARD_TASK).with_weekly(2, f64::INFINITY),
                    CalendarTask::new(*p, "libre"),
                ]
            })
            .collect();
        let data = InputData {
            classes: vec![],
            days: strings(&["Mo"]),
            times: strings(&["t1", "t2", "t3", "t4"]),
            playtime: Playtime::default(),
            teacher_tasks: Catalogue::new(teacher_rows).unwrap(),
            calendar_tasks: Catalogue::new(demand_rows).unwrap(),
            fixed_assignments: Catalogue::empty(),
        };
        let solved = solve(&data);

        assert_close(solved.max_guard_periods, 2.0);
        for teacher in ["T1", "T2"] {
            let guard_count: f64 = solved
                .indices
                .a
                .entries()
                .iter()
                .enumerate()
                .filter(|(_, (p, _, t, _, _))| p == teacher && t == GUARD_TASK)
                .map(|(i, _)| solved.x[i])
                .sum();
            assert_close(guard_count, 2.0);
        }
        assert!(solved.infeasibilities().is_empty());
    }

    #[test]
    fn test_forced_double_booking_shows_up_in_slack_scan() {
        let data = InputData {
            classes: strings(&["X", "Y"]),
            days: strings(&["Mo"]),
            times: strings(&["t1"]),
            playtime: Playtime::default(),
            teacher_tasks: Catalogue::new(vec![
                TeacherTask::new("T1", "X", "a"),
                TeacherTask::new("T1", "Y", "a"),
            ])
            .unwrap(),
            calendar_tasks: Catalogue::new(vec![
                CalendarTask::new("X", "a").with_weekly(1, 1.0),
                CalendarTask::new("Y", "a").with_weekly(1, 1.0),
            ])
            .unwrap(),
            fixed_assignments: Catalogue::empty(),
        };
        let solved = solve(&data);

        let report = solved.infeasibilities();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].constraint, "one_task_per_teacher_slot");
        assert_close(report[0].slack, 1.0);
        assert!(solved.objective >= 999.0);
    }

    #[test]
    fn test_fixed_assignments_are_honored() {
        let mut data = single_class(2, 2.0);
        data.teacher_tasks = Catalogue::new(vec![
            TeacherTask::new("T1", "X", "a"),
            TeacherTask::new("T2", "X", "a"),
        ])
        .unwrap();
        data.fixed_assignments = Catalogue::new(vec![crate::domain::entities::FixedAssignment::new(
            "T2", "X", "a", "Mo", "t1",
        )])
        .unwrap();
        let solved = solve(&data);

        assert_value(solved.x_value(&x_key("T2", "X", "a", "Mo", "t1")), 1.0);
    }

    #[test]
    fn test_execute_returns_calendars_and_report() {
        let data = single_class(2, 2.0);
        let result = SolveTimetable::new().execute(&data).unwrap();

        assert_eq!(result.status, SolverStatus::Optimal);
        assert!(result.has_solution());
        assert_close(result.objective.unwrap(), 0.0);
        assert!(result.infeasibilities.is_empty());
        assert!(result.rejected.is_empty());
        // the class grid first, then the teacher grid
        assert_eq!(result.calendars.len(), 2);
        assert_eq!(result.calendars[0].name, "X");
        assert_eq!(result.calendars[1].name, "T1");
        assert_eq!(result.calendars[0].task_at("Mo", "t1"), "a (T1)");
        assert_eq!(result.calendars[1].task_at("Mo", "t1"), "a (X)");
    }

    #[test]
    fn test_execute_rejects_invalid_input() {
        let mut data = single_class(2, 2.0);
        data.teacher_tasks = Catalogue::new(vec![TeacherTask::new("T1", "X", "ghost")]).unwrap();
        assert!(SolveTimetable::new().execute(&data).is_err());
    }

    #[test]
    fn test_overstaffed_task_surfaces_infeasible_status() {
        // two teachers demanded per occurrence, only one eligible: the hard
        // coverage and staffing rows cannot both hold, so the program is
        // genuinely infeasible and the status must survive to the result
        let data = InputData {
            classes: strings(&["X"]),
            days: strings(&["Mo"]),
            times: strings(&["t1"]),
            playtime: Playtime::default(),
            teacher_tasks: Catalogue::new(vec![TeacherTask::new("T1", "X", "r")]).unwrap(),
            calendar_tasks: Catalogue::new(vec![CalendarTask::new("X", "r")
                .with_weekly(1, 1.0)
                .with_num_teachers(2)])
            .unwrap(),
            fixed_assignments: Catalogue::empty(),
        };
        let result = SolveTimetable::new().execute(&data).unwrap();

        assert_eq!(result.status, SolverStatus::Infeasible);
        assert!(!result.has_solution());
        assert_eq!(result.objective, None);
        assert!(result.calendars.is_empty());
        assert!(result.infeasibilities.is_empty());
    }
}
