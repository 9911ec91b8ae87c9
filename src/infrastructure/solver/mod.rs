pub mod milp_driver;

pub use milp_driver::{
    Infeasibility, MilpDriver, SlackValue, SolveOutcome, SolvedModel, SolverStatus,
};
