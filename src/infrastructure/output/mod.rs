pub mod csv_generator;
pub mod html_generator;
pub mod json_generator;

pub use csv_generator::CsvGenerator;
pub use html_generator::HtmlGenerator;
pub use json_generator::JsonGenerator;
