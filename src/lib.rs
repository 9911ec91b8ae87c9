pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::entities;
pub use domain::catalogue;
pub use application::use_cases;
pub use infrastructure::parsers;
pub use infrastructure::output;
pub use infrastructure::solver;
