use anyhow::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use crate::presentation::dto::{CalendarOutput, SolveOutput};

pub struct HtmlGenerator;

impl HtmlGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate<P: AsRef<Path>>(&self, output: &SolveOutput, path: P) -> Result<()> {
        let html = self.generate_string(output)?;
        let mut file = File::create(path)?;
        file.write_all(html.as_bytes())?;
        Ok(())
    }

    pub fn generate_string(&self, output: &SolveOutput) -> Result<String> {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
        html.push_str("    <title>Weekly Timetables</title>\n");
        html.push_str("    <style>\n");
        html.push_str(Self::get_css());
        html.push_str("    </style>\n");
        html.push_str("</head>\n<body>\n");
        html.push_str("    <div class=\"container\">\n");
        html.push_str("        <h1>📅 Weekly Timetables</h1>\n");

        // Summary cards
        html.push_str("        <div class=\"stats-grid\">\n");
        Self::stat_card(&mut html, &output.summary.solver_status, "Solver Status");
        let objective = output
            .summary
            .objective
            .map(|value| format!("{:.0}", value))
            .unwrap_or_else(|| "n/a".to_string());
        Self::stat_card(&mut html, &objective, "Objective");
        Self::stat_card(&mut html, &output.summary.total_classes.to_string(), "Classes");
        Self::stat_card(&mut html, &output.summary.total_teachers.to_string(), "Teachers");
        Self::stat_card(
            &mut html,
            &output.summary.infeasibility_count.to_string(),
            "Infeasibilities",
        );
        html.push_str("        </div>\n");

        if !output.infeasibilities.is_empty() {
            html.push_str("        <h2>⚠️ Residual Infeasibilities</h2>\n");
            html.push_str("        <table>\n");
            html.push_str("            <tr><th>Constraint</th><th>Index</th><th>Slack</th><th>Expression</th></tr>\n");
            for entry in &output.infeasibilities {
                html.push_str(&format!(
                    "            <tr><td>{}</td><td>{}</td><td>{:+}</td><td>{}</td></tr>\n",
                    Self::escape(&entry.constraint),
                    Self::escape(&entry.key),
                    entry.slack,
                    Self::escape(&entry.expression),
                ));
            }
            html.push_str("        </table>\n");
        }

        for calendar in &output.calendars {
            Self::calendar_table(&mut html, calendar);
        }

        html.push_str(&format!(
            "        <p class=\"footer\">Generated on {}</p>\n",
            Self::escape(&output.summary.solve_date)
        ));
        html.push_str("    </div>\n</body>\n</html>\n");
        Ok(html)
    }

    fn stat_card(html: &mut String, value: &str, label: &str) {
        html.push_str("            <div class=\"stat-card\">\n");
        html.push_str(&format!(
            "                <div class=\"stat-value\">{}</div>\n",
            Self::escape(value)
        ));
        html.push_str(&format!(
            "                <div class=\"stat-label\">{}</div>\n",
            label
        ));
        html.push_str("            </div>\n");
    }

    fn calendar_table(html: &mut String, calendar: &CalendarOutput) {
        html.push_str(&format!(
            "        <h2>{}</h2>\n",
            Self::escape(&calendar.name)
        ));
        html.push_str("        <table>\n            <tr><th></th>");
        for day in &calendar.days {
            html.push_str(&format!("<th>{}</th>", Self::escape(day)));
        }
        html.push_str("</tr>\n");
        for time in &calendar.times {
            html.push_str(&format!(
                "            <tr><th>{}</th>",
                Self::escape(time)
            ));
            for day in &calendar.days {
                let task = calendar
                    .rows
                    .iter()
                    .find(|cell| cell.day == *day && cell.time == *time)
                    .map(|cell| cell.task.as_str())
                    .unwrap_or("");
                html.push_str(&format!("<td>{}</td>", Self::escape(task)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("        </table>\n");
    }

    fn escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    fn get_css() -> &'static str {
        "        body { font-family: 'Segoe UI', Arial, sans-serif; background: #f5f6fa; margin: 0; }\n\
         .container { max-width: 1100px; margin: 0 auto; padding: 24px; }\n\
         h1 { color: #2c3e50; }\n\
         h2 { color: #34495e; margin-top: 32px; }\n\
         .stats-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(140px, 1fr)); gap: 12px; }\n\
         .stat-card { background: white; border-radius: 8px; padding: 16px; text-align: center; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }\n\
         .stat-value { font-size: 1.6em; font-weight: bold; color: #2980b9; }\n\
         .stat-label { color: #7f8c8d; margin-top: 4px; }\n\
         table { border-collapse: collapse; width: 100%; background: white; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }\n\
         th, td { border: 1px solid #dfe4ea; padding: 8px 10px; text-align: center; }\n\
         th { background: #eef1f6; color: #2c3e50; }\n\
         .footer { color: #7f8c8d; margin-top: 24px; }\n"
    }
}

impl Default for HtmlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::dto::{CalendarCellOutput, SummaryOutput};

    #[test]
    fn test_generate_string_contains_cells_and_summary() {
        let generator = HtmlGenerator::new();
        let output = SolveOutput {
            summary: SummaryOutput {
                solver_status: "optimal".to_string(),
                objective: Some(0.0),
                solve_date: "2026-01-12".to_string(),
                total_classes: 1,
                total_teachers: 1,
                infeasibility_count: 0,
            },
            infeasibilities: vec![],
            rejected_constraints: vec![],
            calendars: vec![CalendarOutput {
                name: "X".to_string(),
                days: vec!["Mo".to_string()],
                times: vec!["t1".to_string()],
                rows: vec![CalendarCellOutput {
                    day: "Mo".to_string(),
                    time: "t1".to_string(),
                    task: "a (T1)".to_string(),
                }],
            }],
        };

        let html = generator.generate_string(&output).unwrap();
        assert!(html.contains("optimal"));
        assert!(html.contains("<td>a (T1)</td>"));
        assert!(!html.contains("Residual Infeasibilities"));
    }
}
