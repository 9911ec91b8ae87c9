//! CLI Commands module
//!
//! Command implementations for the CLI interface: solving a timetable from
//! an input directory, writing the calendar reports, and emitting the
//! bundled sample input set.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::application::use_cases::{SolveTimetable, TimetableResult};
use crate::infrastructure::output::{CsvGenerator, HtmlGenerator, JsonGenerator};
use crate::infrastructure::parsers::InputLoader;
use crate::presentation::dto::SolveOutput;

/// Command for solving a timetable and generating reports
pub struct SolveCommand;

impl SolveCommand {
    pub fn execute(
        input: &Path,
        output: &Path,
        generate_json: bool,
        generate_csv: bool,
        generate_html: bool,
        time_limit: Option<f64>,
    ) -> Result<()> {
        info!("loading input set from {}", input.display());
        let data = InputLoader::new().load_dir(input)?;

        let solver = match time_limit {
            Some(seconds) => SolveTimetable::with_time_limit(seconds),
            None => SolveTimetable::new(),
        };

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message("🧮 Running MILP solver...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        let result = solver.execute(&data);
        spinner.finish_and_clear();
        let result = result?;

        let report = SolveOutput::from_result(&data, &result);

        fs::create_dir_all(output)
            .with_context(|| format!("failed to create {}", output.display()))?;
        if generate_json {
            let path = output.join("solve_report.json");
            JsonGenerator::new().generate(&report, &path)?;
            info!("wrote {}", path.display());
        }
        if generate_csv {
            let dir = output.join("calendars");
            CsvGenerator::new().generate(&report, &dir)?;
            info!("wrote calendar grids under {}", dir.display());
        }
        if generate_html {
            let path = output.join("timetables.html");
            HtmlGenerator::new().generate(&report, &path)?;
            info!("wrote {}", path.display());
        }

        Self::print_summary(&report, &result);

        // the summary and reports still go out, the exit code carries the
        // solver status
        if !result.has_solution() {
            anyhow::bail!("solver terminated without a primal solution: {}", result.status);
        }
        Ok(())
    }

    fn print_summary(report: &SolveOutput, result: &TimetableResult) {
        println!("\n{}", "=".repeat(80));
        println!("📅 TIMETABLE SOLVE SUMMARY");
        println!("{}", "=".repeat(80));

        let objective = report
            .summary
            .objective
            .map(|value| format!("{:.0}", value))
            .unwrap_or_else(|| "n/a".to_string());
        println!("\n📈 Overall:");
        println!("  • Solver Status:     {}", report.summary.solver_status);
        println!("  • Objective:         {}", objective);
        println!("  • Classes:           {}", report.summary.total_classes);
        println!("  • Teachers:          {}", report.summary.total_teachers);

        if !result.has_solution() {
            println!("\n❌ No primal solution; calendars were not decoded");
        }

        if !report.rejected_constraints.is_empty() {
            println!("\n🚫 Dropped constraints (statically impossible):");
            for entry in &report.rejected_constraints {
                println!("  • {}{}", entry.constraint, entry.key);
            }
        }

        if report.infeasibilities.is_empty() {
            println!("\n✅ No residual infeasibilities");
        } else {
            println!("\n⚠️  Residual infeasibilities:");
            for entry in &report.infeasibilities {
                println!(
                    "  • {}{}: slack {:+} ({})",
                    entry.constraint, entry.key, entry.slack, entry.expression
                );
            }
        }

        for calendar in &result.calendars {
            println!("\n{}", calendar);
        }

        println!("\n{}", "=".repeat(80));
    }
}

/// Command for writing the bundled sample input set
pub struct SampleCommand;

impl SampleCommand {
    pub fn execute(output: &Path) -> Result<()> {
        super::sample_data::write_sample(output)?;
        info!("sample input written to {}", output.display());
        println!(
            "Sample input written. Solve it with:\n  timeweaver solve --input {} --output output",
            output.display()
        );
        Ok(())
    }
}
