pub mod commands;
pub mod sample_data;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "timeweaver")]
#[command(author = "TimeWeaver Team")]
#[command(version = "0.1.0")]
#[command(about = "School timetable generator backed by MILP optimization", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Solve a timetable and write the calendar reports")]
    Solve {
        #[arg(short, long, value_name = "DIR", help = "Input directory holding timetable.json and the catalogue CSV files")]
        input: PathBuf,

        #[arg(short, long, value_name = "DIR", default_value = "output", help = "Output directory for reports")]
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "all", help = "Output format")]
        format: OutputFormat,

        #[arg(long, value_name = "SECONDS", help = "Wall-clock limit for the solver; an incumbent found at the limit is reported as feasible, not optimal")]
        time_limit: Option<f64>,
    },

    #[command(about = "Write the bundled two-class sample input set")]
    Sample {
        #[arg(short, long, value_name = "DIR", default_value = "sample", help = "Directory to write the sample input into")]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Html,
    All,
}

impl OutputFormat {
    pub fn should_generate_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::All)
    }

    pub fn should_generate_csv(&self) -> bool {
        matches!(self, OutputFormat::Csv | OutputFormat::All)
    }

    pub fn should_generate_html(&self) -> bool {
        matches!(self, OutputFormat::Html | OutputFormat::All)
    }
}
