use anyhow::Result;
use csv::Writer;
use std::fs;
use std::path::Path;
use crate::presentation::dto::{CalendarOutput, SolveOutput};

pub struct CsvGenerator;

impl CsvGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Writes one grid file per calendar into `dir`: days as columns, one
    /// row per period
    pub fn generate<P: AsRef<Path>>(&self, output: &SolveOutput, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        for calendar in &output.calendars {
            let path = dir.join(format!("{}.csv", Self::file_stem(&calendar.name)));
            let mut wtr = Writer::from_path(path)?;
            self.write_calendar(calendar, &mut wtr)?;
            wtr.flush()?;
        }
        Ok(())
    }

    fn write_calendar<W: std::io::Write>(
        &self,
        calendar: &CalendarOutput,
        wtr: &mut Writer<W>,
    ) -> Result<()> {
        let mut header = vec!["time".to_string()];
        header.extend(calendar.days.iter().cloned());
        wtr.write_record(&header)?;

        for time in &calendar.times {
            let mut record = vec![time.clone()];
            for day in &calendar.days {
                let task = calendar
                    .rows
                    .iter()
                    .find(|cell| cell.day == *day && cell.time == *time)
                    .map(|cell| cell.task.clone())
                    .unwrap_or_default();
                record.push(task);
            }
            wtr.write_record(&record)?;
        }
        Ok(())
    }

    fn file_stem(name: &str) -> String {
        name.chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect()
    }
}

impl Default for CsvGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::dto::CalendarCellOutput;

    fn calendar() -> CalendarOutput {
        CalendarOutput {
            name: "X".to_string(),
            days: vec!["Mo".to_string()],
            times: vec!["t1".to_string(), "t2".to_string()],
            rows: vec![
                CalendarCellOutput {
                    day: "Mo".to_string(),
                    time: "t1".to_string(),
                    task: "recreo".to_string(),
                },
                CalendarCellOutput {
                    day: "Mo".to_string(),
                    time: "t2".to_string(),
                    task: "a (T1)".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_grid_layout() {
        let generator = CsvGenerator::new();
        let mut wtr = Writer::from_writer(vec![]);
        generator.write_calendar(&calendar(), &mut wtr).unwrap();
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();

        assert_eq!(text, "time,Mo\nt1,recreo\nt2,a (T1)\n");
    }

    #[test]
    fn test_file_stem_sanitizes_path_separators() {
        assert_eq!(CsvGenerator::file_stem("1A EP"), "1A EP");
        assert_eq!(CsvGenerator::file_stem("a/b"), "a_b");
    }
}
