pub mod solve_output;

pub use solve_output::{
    CalendarCellOutput, CalendarOutput, InfeasibilityOutput, RejectedConstraintOutput,
    SolveOutput, SummaryOutput,
};
