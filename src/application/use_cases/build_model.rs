//! Optimization model builder
//!
//! Translates an [`InputData`] and its index universes into a mixed-integer
//! linear program: binary assignment variables, elastic slacks, pre-fixed
//! assignments, the constraint families and the workload-balancing
//! objective. The builder never talks to a solver; it returns a
//! [`TimetableModel`] for the solver driver to execute.

use std::collections::{HashMap, HashSet};

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};
use tracing::{debug, error};

use crate::application::use_cases::build_indices::{
    ClassSlotKey, TeacherSlotKey, TimetableIndices,
};
use crate::domain::{InputData, GUARD_TASK};

/// Penalty factor making any slack unit costlier than any guard-duty
/// reshuffling
pub const SLACK_WEIGHT: f64 = 1000.0;

/// One elastic constraint instance with its paired slack variables
#[derive(Debug, Clone)]
pub struct ElasticConstraint {
    /// Constraint family name
    pub constraint: &'static str,
    /// Key tuple the instance was quantified over
    pub key: String,
    pub pos: Variable,
    pub neg: Variable,
    /// Human-readable form for the infeasibility report
    pub expression: String,
}

/// A constraint instance that was statically impossible and therefore not
/// emitted; kept for diagnostics on malformed inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedConstraint {
    pub constraint: &'static str,
    pub key: String,
}

/// The built, not yet solved, program
pub struct TimetableModel {
    pub indices: TimetableIndices,
    pub variables: ProblemVariables,
    /// Teacher assignment variables, parallel to `indices.a`
    pub x: Vec<Variable>,
    /// Calendar occupation variables, parallel to `indices.b`
    pub y: Vec<Variable>,
    /// Min-max auxiliary: the largest weekly guard-duty count over teachers
    pub max_guard_periods: Variable,
    /// Elastic single-assignment constraints, one per (teacher, day, time)
    pub teacher_slot_elastic: Vec<ElasticConstraint>,
    /// Elastic weekly envelopes, one per (calendar, task)
    pub weekly_envelope_elastic: Vec<ElasticConstraint>,
    pub constraints: Vec<Constraint>,
    pub objective: Expression,
    pub rejected: Vec<RejectedConstraint>,
}

pub struct BuildModel;

impl BuildModel {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, data: &InputData, indices: TimetableIndices) -> TimetableModel {
        let teachers = data.teachers();
        let playtime = &data.playtime;
        let demands = data.calendar_tasks.by_key();

        let fixed: HashSet<TeacherSlotKey> = data
            .fixed_assignments
            .iter()
            .map(|r| {
                (
                    r.teacher.clone(),
                    r.calendar.clone(),
                    r.task.clone(),
                    r.day.clone(),
                    r.time.clone(),
                )
            })
            .collect();

        let mut variables = ProblemVariables::new();

        // Pre-assigned x variables are clamped to 1 instead of constrained
        let x: Vec<Variable> = indices
            .a
            .entries()
            .iter()
            .map(|key| {
                if fixed.contains(key) {
                    variables.add(variable().integer().min(1).max(1))
                } else {
                    variables.add(variable().binary())
                }
            })
            .collect();

        // The break task is not a decision: y is pinned to the break calendar
        let y: Vec<Variable> = indices
            .b
            .entries()
            .iter()
            .map(|(calendar, task, day, time)| {
                if *task == playtime.name {
                    let pinned = if playtime.contains(calendar, day, time) {
                        1
                    } else {
                        0
                    };
                    variables.add(variable().integer().min(pinned).max(pinned))
                } else {
                    variables.add(variable().binary())
                }
            })
            .collect();

        let max_guard_periods = variables.add(variable().integer().min(0));

        // Position groupings reused across constraint families
        let mut a_by_teacher_slot: HashMap<(String, String, String), Vec<usize>> = HashMap::new();
        let mut a_by_class_slot: HashMap<ClassSlotKey, Vec<usize>> = HashMap::new();
        let mut a_guard_by_teacher: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, (teacher, calendar, task, day, time)) in
            indices.a.entries().iter().enumerate()
        {
            a_by_teacher_slot
                .entry((teacher.clone(), day.clone(), time.clone()))
                .or_default()
                .push(i);
            a_by_class_slot
                .entry((calendar.clone(), task.clone(), day.clone(), time.clone()))
                .or_default()
                .push(i);
            if task == GUARD_TASK {
                a_guard_by_teacher.entry(teacher.clone()).or_default().push(i);
            }
        }

        let mut b_by_class_slot: HashMap<(String, String, String), Vec<usize>> = HashMap::new();
        let mut b_by_calendar_task: HashMap<(String, String), Vec<usize>> = HashMap::new();
        let mut b_by_calendar_task_day: HashMap<(String, String, String), Vec<usize>> =
            HashMap::new();
        for (j, (calendar, task, day, time)) in indices.b.entries().iter().enumerate() {
            b_by_class_slot
                .entry((calendar.clone(), day.clone(), time.clone()))
                .or_default()
                .push(j);
            b_by_calendar_task
                .entry((calendar.clone(), task.clone()))
                .or_default()
                .push(j);
            b_by_calendar_task_day
                .entry((calendar.clone(), task.clone(), day.clone()))
                .or_default()
                .push(j);
        }

        let mut constraints: Vec<Constraint> = Vec::new();
        let mut rejected: Vec<RejectedConstraint> = Vec::new();

        // A teacher performs exactly one task per period, elastically: the
        // slacks expose double-booking and idling instead of making the
        // program infeasible
        let mut teacher_slot_elastic = Vec::new();
        for teacher in &teachers {
            for day in &data.days {
                for time in &data.times {
                    let pos = variables.add(variable().integer().min(0));
                    let neg = variables.add(variable().integer().min(0));
                    let positions = a_by_teacher_slot
                        .get(&(teacher.clone(), day.clone(), time.clone()))
                        .expect("every teacher universe entry spans all slots");
                    let lhs: Expression = positions.iter().map(|&i| x[i]).sum();
                    constraints.push(constraint!(lhs - pos + neg == 1));
                    teacher_slot_elastic.push(ElasticConstraint {
                        constraint: "one_task_per_teacher_slot",
                        key: format!("({}, {}, {})", teacher, day, time),
                        pos,
                        neg,
                        expression: format!(
                            "sum x[{}, *, *, {}, {}] == 1 + slack_pos - slack_neg",
                            teacher, day, time
                        ),
                    });
                }
            }
        }

        // Every class slot is covered by exactly one task
        for class in &data.classes {
            for day in &data.days {
                for time in &data.times {
                    match b_by_class_slot.get(&(class.clone(), day.clone(), time.clone())) {
                        Some(positions) => {
                            let lhs: Expression = positions.iter().map(|&j| y[j]).sum();
                            constraints.push(constraint!(lhs == 1));
                        }
                        None => {
                            let key = format!("({}, {}, {})", class, day, time);
                            error!(
                                "infeasible constraint: class_slot_coverage{} has no candidate tasks",
                                key
                            );
                            rejected.push(RejectedConstraint {
                                constraint: "class_slot_coverage",
                                key,
                            });
                        }
                    }
                }
            }
        }

        // A scheduled task is staffed by exactly its declared teacher count
        for (j, (calendar, task, day, time)) in indices.b.entries().iter().enumerate() {
            let demand = demands
                .get(&(calendar.clone(), task.clone()))
                .expect("universe B is built from the demand catalogue");
            let staffing = f64::from(demand.num_teachers);
            let lhs = staffing * y[j];
            match a_by_class_slot.get(&(calendar.clone(), task.clone(), day.clone(), time.clone()))
            {
                Some(positions) => {
                    let assigned: Expression = positions.iter().map(|&i| x[i]).sum();
                    constraints.push(constraint!(lhs - assigned == 0));
                }
                None => {
                    // no eligible teacher: the slot can only stay unscheduled
                    constraints.push(constraint!(lhs == 0));
                }
            }
        }

        // Weekly envelope per (calendar, task), elastic on both sides
        let mut weekly_envelope_elastic = Vec::new();
        for demand in data.calendar_tasks.iter() {
            let pos = variables.add(variable().integer().min(0));
            let neg = variables.add(variable().integer().min(0));
            let key = (demand.calendar.clone(), demand.task.clone());
            let positions = b_by_calendar_task
                .get(&key)
                .expect("universe B covers every demand row");
            let weekly: Expression = positions.iter().map(|&j| y[j]).sum();

            if demand.max_time_periods.is_finite() {
                constraints.push(constraint!(weekly.clone() - pos <= demand.max_time_periods));
            } else {
                debug!(
                    "skip weekly_task_periods({}, {}): no finite maximum",
                    demand.calendar, demand.task
                );
            }
            constraints
                .push(constraint!(weekly + neg >= f64::from(demand.min_time_periods)));

            weekly_envelope_elastic.push(ElasticConstraint {
                constraint: "weekly_task_periods",
                key: format!("({}, {})", demand.calendar, demand.task),
                pos,
                neg,
                expression: format!(
                    "{} - slack_neg <= sum y[{}, {}, *, *] <= {} + slack_pos",
                    demand.min_time_periods,
                    demand.calendar,
                    demand.task,
                    demand.max_time_periods
                ),
            });

            // Daily cap, only when one was declared
            if demand.max_time_period_per_day.is_finite() {
                for day in &data.days {
                    let day_key =
                        (demand.calendar.clone(), demand.task.clone(), day.clone());
                    let Some(day_positions) = b_by_calendar_task_day.get(&day_key) else {
                        continue;
                    };
                    let daily: Expression = day_positions.iter().map(|&j| y[j]).sum();
                    constraints
                        .push(constraint!(daily <= demand.max_time_period_per_day));
                }
            }
        }

        // The guard-duty count of every teacher is capped by the shared
        // min-max auxiliary; minimizing it balances the duty
        for teacher in &teachers {
            match a_guard_by_teacher.get(teacher) {
                Some(positions) => {
                    let guard_load: Expression = positions.iter().map(|&i| x[i]).sum();
                    constraints.push(constraint!(guard_load - max_guard_periods <= 0));
                }
                None => {
                    debug!("skip max_guard_periods({}): no guard eligibility", teacher);
                }
            }
        }

        let mut objective = Expression::from(max_guard_periods);
        for elastic in weekly_envelope_elastic
            .iter()
            .chain(teacher_slot_elastic.iter())
        {
            objective = objective
                + SLACK_WEIGHT * (Expression::from(elastic.pos) + elastic.neg);
        }

        TimetableModel {
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
        }
    }
}

impl Default for BuildModel {
    fn default() -> Self {
        Self::new()
    }
}
