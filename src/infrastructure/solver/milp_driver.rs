//! MILP driver module
//!
//! Executes a [`TimetableModel`] against a branch-and-cut backend through the
//! `good_lp` solver abstraction (CBC by default) and reads every primal value
//! back before the solver model is released. The driver never hides the
//! termination status behind an error: every invocation produces a
//! [`SolveOutcome`] carrying the mapped status, the rejected-constraint
//! diagnostics, and the best primal when the backend exposed one. Residual
//! constraint violations are enumerated from the elastic slack values rather
//! than from solver infeasibility, so a tight catalogue still produces a
//! timetable plus a diagnosis; a genuinely infeasible program (the hard
//! coverage and staffing families cannot bend) comes back as a solution-less
//! outcome for the caller to report.

use std::fmt;
use std::time::Instant;

use good_lp::{
    default_solver, Constraint, ResolutionError, Solution, Solver, SolverModel, Variable,
    WithTimeLimit,
};
use tracing::{info, warn};

use crate::application::use_cases::build_indices::{
    ClassSlotKey, TeacherSlotKey, TimetableIndices,
};
use crate::application::use_cases::build_model::{
    ElasticConstraint, RejectedConstraint, TimetableModel, SLACK_WEIGHT,
};

/// Termination status of one solver invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// The backend proved its incumbent optimal
    Optimal,
    /// An incumbent was found but optimality was not proven (the configured
    /// time limit ran out first)
    Feasible,
    Infeasible,
    Unbounded,
    TimeLimit,
    Other,
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SolverStatus::Optimal => "optimal",
            SolverStatus::Feasible => "feasible",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::Unbounded => "unbounded",
            SolverStatus::TimeLimit => "time_limit",
            SolverStatus::Other => "other",
        };
        write!(f, "{}", label)
    }
}

/// Solved slack values of one elastic constraint instance
#[derive(Debug, Clone)]
pub struct SlackValue {
    pub constraint: &'static str,
    pub key: String,
    pub pos: f64,
    pub neg: f64,
    pub expression: String,
}

/// One residual violation reported by the slack scan
#[derive(Debug, Clone, PartialEq)]
pub struct Infeasibility {
    pub constraint: String,
    pub key: String,
    /// Signed violation: positive slack minus negative slack
    pub slack: f64,
    pub expression: String,
}

/// Primal values of a solved model, detached from the solver process
#[derive(Debug, Clone)]
pub struct SolvedModel {
    pub objective: f64,
    pub indices: TimetableIndices,
    /// Values of the teacher assignment variables, parallel to `indices.a`
    pub x: Vec<f64>,
    /// Values of the calendar occupation variables, parallel to `indices.b`
    pub y: Vec<f64>,
    pub max_guard_periods: f64,
    pub teacher_slot_slacks: Vec<SlackValue>,
    pub weekly_envelope_slacks: Vec<SlackValue>,
}

impl SolvedModel {
    pub fn x_value(&self, key: &TeacherSlotKey) -> Option<f64> {
        self.indices.a.position(key).map(|i| self.x[i])
    }

    pub fn y_value(&self, key: &ClassSlotKey) -> Option<f64> {
        self.indices.b.position(key).map(|j| self.y[j])
    }

    /// Walks every elastic constraint and reports the instances whose slack
    /// is nonzero
    pub fn infeasibilities(&self) -> Vec<Infeasibility> {
        self.teacher_slot_slacks
            .iter()
            .chain(self.weekly_envelope_slacks.iter())
            .filter_map(|slack| {
                let value = slack.pos - slack.neg;
                (value.abs() > 0.5).then(|| Infeasibility {
                    constraint: slack.constraint.to_string(),
                    key: slack.key.clone(),
                    slack: value,
                    expression: slack.expression.clone(),
                })
            })
            .collect()
    }
}

/// What one solver invocation produced: the termination status, the dropped
/// constraint diagnostics, and the best primal when there is one
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolverStatus,
    /// `None` when the backend terminated without exposing a primal
    pub solution: Option<SolvedModel>,
    pub rejected: Vec<RejectedConstraint>,
}

impl SolveOutcome {
    pub fn has_solution(&self) -> bool {
        self.solution.is_some()
    }

    pub fn objective(&self) -> Option<f64> {
        self.solution.as_ref().map(|solved| solved.objective)
    }

    /// The slack scan of the best primal; empty when there is none
    pub fn infeasibilities(&self) -> Vec<Infeasibility> {
        self.solution
            .as_ref()
            .map(|solved| solved.infeasibilities())
            .unwrap_or_default()
    }
}

/// Decision and slack variables handed back after the solve
struct ModelVariables {
    indices: TimetableIndices,
    x: Vec<Variable>,
    y: Vec<Variable>,
    max_guard_periods: Variable,
    teacher_slot_elastic: Vec<ElasticConstraint>,
    weekly_envelope_elastic: Vec<ElasticConstraint>,
}

/// Synchronous MILP invocation; the only blocking point of a solve
pub struct MilpDriver {
    time_limit: Option<f64>,
}

impl MilpDriver {
    pub fn new() -> Self {
        Self { time_limit: None }
    }

    /// Caps the branch-and-cut wall clock. An incumbent found when the limit
    /// runs out is reported as feasible instead of optimal.
    pub fn with_time_limit(seconds: f64) -> Self {
        Self {
            time_limit: Some(seconds),
        }
    }

    /// Solves with the crate's default backend (CBC)
    pub fn solve(&self, model: TimetableModel) -> SolveOutcome {
        let TimetableModel {
            indices,
            variables,
            x,
            y,
            max_guard_periods,
            teacher_slot_elastic,
            weekly_envelope_elastic,
            constraints,
            objective,
            rejected,
        } = model;

        let mut problem = variables.minimise(objective).using(default_solver);
        if let Some(limit) = self.time_limit {
            problem = problem.with_time_limit(limit);
        }
        Self::run(
            problem,
            constraints,
            ModelVariables {
                indices,
                x,
                y,
                max_guard_periods,
                teacher_slot_elastic,
                weekly_envelope_elastic,
            },
            rejected,
            self.time_limit,
        )
    }

    /// Solves with any `good_lp` backend.
    ///
    /// Generic backends expose no option surface, so the driver's time limit
    /// does not apply here and a returned incumbent counts as optimal.
    pub fn solve_with<S: Solver>(&self, model: TimetableModel, solver: S) -> SolveOutcome
    where
        S::Model: SolverModel<Error = ResolutionError>,
    {
        let TimetableModel {
            indices,
            variables,
            x,
            y,
            max_guard_periods,
            teacher_slot_elastic,
            weekly_envelope_elastic,
            constraints,
            objective,
            rejected,
        } = model;

        let problem = variables.minimise(objective).using(solver);
        Self::run(
            problem,
            constraints,
            ModelVariables {
                indices,
                x,
                y,
                max_guard_periods,
                teacher_slot_elastic,
                weekly_envelope_elastic,
            },
            rejected,
            None,
        )
    }

    fn run<M: SolverModel<Error = ResolutionError>>(
        mut problem: M,
        constraints: Vec<Constraint>,
        parts: ModelVariables,
        rejected: Vec<RejectedConstraint>,
        time_limit: Option<f64>,
    ) -> SolveOutcome {
        info!(
            "solving: {} assignment variables, {} occupation variables, {} constraints",
            parts.x.len(),
            parts.y.len(),
            constraints.len()
        );
        for constraint in constraints {
            problem.add_constraint(constraint);
        }

        let started = Instant::now();
        match problem.solve() {
            Ok(solution) => {
                let limit_hit =
                    time_limit.map_or(false, |limit| started.elapsed().as_secs_f64() >= limit);
                let status = if limit_hit {
                    SolverStatus::Feasible
                } else {
                    SolverStatus::Optimal
                };
                let solved = Self::read_back(&solution, parts);

                info!("solver status: {}", status);
                info!("objective function: {}", solved.objective);
                let infeasibilities = solved.infeasibilities();
                if !infeasibilities.is_empty() {
                    warn!("{} residual infeasibilities:", infeasibilities.len());
                    for entry in &infeasibilities {
                        warn!(
                            "  {}{}: slack {:+} ({})",
                            entry.constraint, entry.key, entry.slack, entry.expression
                        );
                    }
                }

                SolveOutcome {
                    status,
                    solution: Some(solved),
                    rejected,
                }
            }
            Err(error) => {
                let status = Self::failure_status(&error);
                warn!(
                    "solver terminated without a primal solution: {} (status: {})",
                    error, status
                );
                SolveOutcome {
                    status,
                    solution: None,
                    rejected,
                }
            }
        }
    }

    fn read_back(solution: &impl Solution, parts: ModelVariables) -> SolvedModel {
        let x: Vec<f64> = parts.x.iter().map(|&v| solution.value(v)).collect();
        let y: Vec<f64> = parts.y.iter().map(|&v| solution.value(v)).collect();
        let max_guard_periods = solution.value(parts.max_guard_periods);
        let read_slacks = |elastics: Vec<ElasticConstraint>| {
            elastics
                .into_iter()
                .map(|e| SlackValue {
                    constraint: e.constraint,
                    key: e.key,
                    pos: solution.value(e.pos),
                    neg: solution.value(e.neg),
                    expression: e.expression,
                })
                .collect::<Vec<_>>()
        };
        let teacher_slot_slacks = read_slacks(parts.teacher_slot_elastic);
        let weekly_envelope_slacks = read_slacks(parts.weekly_envelope_elastic);

        let slack_total: f64 = teacher_slot_slacks
            .iter()
            .chain(weekly_envelope_slacks.iter())
            .map(|s| s.pos + s.neg)
            .sum();

        SolvedModel {
            objective: max_guard_periods + SLACK_WEIGHT * slack_total,
            indices: parts.indices,
            x,
            y,
            max_guard_periods,
            teacher_slot_slacks,
            weekly_envelope_slacks,
        }
    }

    fn failure_status(error: &ResolutionError) -> SolverStatus {
        match error {
            ResolutionError::Infeasible => SolverStatus::Infeasible,
            ResolutionError::Unbounded => SolverStatus::Unbounded,
            ResolutionError::Other(message) => Self::message_status(message),
            ResolutionError::Str(message) => Self::message_status(message),
        }
    }

    fn message_status(message: &str) -> SolverStatus {
        if message.to_ascii_lowercase().contains("time") {
            SolverStatus::TimeLimit
        } else {
            SolverStatus::Other
        }
    }
}

impl Default for MilpDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::build_indices::BuildIndices;
    use crate::domain::entities::{CalendarTask, Playtime, TeacherTask};
    use crate::domain::{Catalogue, InputData};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn solved_with_slacks(pos: f64, neg: f64) -> SolvedModel {
        let data = InputData {
            classes: strings(&["X"]),
            days: strings(&["Mo"]),
            times: strings(&["t1"]),
            playtime: Playtime::default(),
            teacher_tasks: Catalogue::new(vec![TeacherTask::new("T1", "X", "a")]).unwrap(),
            calendar_tasks: Catalogue::new(vec![CalendarTask::new("X", "a")]).unwrap(),
            fixed_assignments: Catalogue::empty(),
        };
        let indices = BuildIndices::new().execute(&data);
        SolvedModel {
            objective: 0.0,
            indices,
            x: vec![1.0],
            y: vec![1.0],
            max_guard_periods: 0.0,
            teacher_slot_slacks: vec![SlackValue {
                constraint: "one_task_per_teacher_slot",
                key: "(T1, Mo, t1)".to_string(),
                pos,
                neg,
                expression: "sum x[T1, *, *, Mo, t1] == 1 + slack_pos - slack_neg".to_string(),
            }],
            weekly_envelope_slacks: vec![],
        }
    }

    #[test]
    fn test_scan_reports_nonzero_slack_with_sign() {
        let solved = solved_with_slacks(1.0, 0.0);
        let report = solved.infeasibilities();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].constraint, "one_task_per_teacher_slot");
        assert_eq!(report[0].slack, 1.0);

        let solved = solved_with_slacks(0.0, 2.0);
        assert_eq!(solved.infeasibilities()[0].slack, -2.0);
    }

    #[test]
    fn test_scan_is_silent_when_slacks_vanish() {
        let solved = solved_with_slacks(0.0, 0.0);
        assert!(solved.infeasibilities().is_empty());
    }

    #[test]
    fn test_outcome_without_solution_reports_status_only() {
        let outcome = SolveOutcome {
            status: SolverStatus::Infeasible,
            solution: None,
            rejected: vec![RejectedConstraint {
                constraint: "class_slot_coverage",
                key: "(Y, Mo, t1)".to_string(),
            }],
        };
        assert!(!outcome.has_solution());
        assert_eq!(outcome.objective(), None);
        assert!(outcome.infeasibilities().is_empty());
        assert_eq!(outcome.rejected.len(), 1);
    }

    #[test]
    fn test_failure_status_mapping() {
        assert_eq!(
            MilpDriver::failure_status(&ResolutionError::Infeasible),
            SolverStatus::Infeasible
        );
        assert_eq!(
            MilpDriver::failure_status(&ResolutionError::Unbounded),
            SolverStatus::Unbounded
        );
        assert_eq!(
            MilpDriver::failure_status(&ResolutionError::Str("time limit reached".into())),
            SolverStatus::TimeLimit
        );
        assert_eq!(
            MilpDriver::failure_status(&ResolutionError::Str("numerical trouble".into())),
            SolverStatus::Other
        );
    }

    #[test]
    fn test_value_lookup_by_key() {
        let solved = solved_with_slacks(0.0, 0.0);
        let key = (
            "T1".to_string(),
            "X".to_string(),
            "a".to_string(),
            "Mo".to_string(),
            "t1".to_string(),
        );
        assert_eq!(solved.x_value(&key), Some(1.0));
    }
}
