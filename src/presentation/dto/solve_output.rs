use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::application::use_cases::solve_timetable::TimetableResult;
use crate::domain::InputData;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveOutput {
    pub summary: SummaryOutput,
    pub infeasibilities: Vec<InfeasibilityOutput>,
    pub rejected_constraints: Vec<RejectedConstraintOutput>,
    pub calendars: Vec<CalendarOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutput {
    pub solver_status: String,
    /// Absent when the solver terminated without a primal solution
    pub objective: Option<f64>,
    pub solve_date: String,
    pub total_classes: usize,
    pub total_teachers: usize,
    pub infeasibility_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfeasibilityOutput {
    pub constraint: String,
    pub key: String,
    pub slack: f64,
    pub expression: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedConstraintOutput {
    pub constraint: String,
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarOutput {
    pub name: String,
    pub days: Vec<String>,
    pub times: Vec<String>,
    pub rows: Vec<CalendarCellOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarCellOutput {
    pub day: String,
    pub time: String,
    pub task: String,
}

impl SolveOutput {
    pub fn from_result(data: &InputData, result: &TimetableResult) -> Self {
        Self {
            summary: SummaryOutput {
                solver_status: result.status.to_string(),
                objective: result.objective,
                solve_date: Utc::now().format("%Y-%m-%d").to_string(),
                total_classes: data.classes.len(),
                total_teachers: data.teachers().len(),
                infeasibility_count: result.infeasibilities.len(),
            },
            infeasibilities: result
                .infeasibilities
                .iter()
                .map(|entry| InfeasibilityOutput {
                    constraint: entry.constraint.clone(),
                    key: entry.key.clone(),
                    slack: entry.slack,
                    expression: entry.expression.clone(),
                })
                .collect(),
            rejected_constraints: result
                .rejected
                .iter()
                .map(|entry| RejectedConstraintOutput {
                    constraint: entry.constraint.to_string(),
                    key: entry.key.clone(),
                })
                .collect(),
            calendars: result
                .calendars
                .iter()
                .map(|calendar| CalendarOutput {
                    name: calendar.name.clone(),
                    days: calendar.days.clone(),
                    times: calendar.times.clone(),
                    rows: calendar
                        .iter_grid()
                        .map(|(day, time, task)| CalendarCellOutput {
                            day: day.to_string(),
                            time: time.to_string(),
                            task: task.to_string(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
