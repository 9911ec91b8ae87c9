pub mod input_loader;

pub use input_loader::{InputLoader, TimetableStructure};
