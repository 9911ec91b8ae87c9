//! Bundled sample input set
//!
//! A two-class primary-school week: four teachers, seven daily periods, the
//! midday break pinned for every class and day, the per-teacher personal
//! calendars carrying guard duty and free-disposition periods, and five
//! pre-fixed personal-calendar slots.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::infrastructure::parsers::input_loader::{
    CALENDAR_TASKS_FILE, FIXED_ASSIGNMENTS_FILE, PLAYTIME_FILE, STRUCTURE_FILE,
    TEACHER_TASKS_FILE,
};

const STRUCTURE: &str = r#"{
  "classes": ["1A EP", "2A EP"],
  "days": ["Luns", "Martes", "Mércores", "Xoves", "Venres"],
  "times": [
    "08:55 - 09:45",
    "09:45 - 10:35",
    "10:35 - 11:25",
    "11:25 - 11:55",
    "11:55 - 12:15",
    "12:15 - 13:05",
    "13:05 - 13:55"
  ],
  "playtime_name": "recreo"
}
"#;

const CALENDAR_TASKS: &str = "\
calendar,task,min_time_periods,max_time_periods,max_time_period_per_day,num_teachers
1A EP,titoría,16,16,,
1A EP,inglés,5,5,1,
1A EP,educación física,4,4,1,
1A EP,plástica,2,2,1,
1A EP,música,2,2,1,
1A EP,relixión/valores,1,1,1,2
1A EP,recreo,,,,0
2A EP,titoría,16,16,,
2A EP,inglés,5,5,1,
2A EP,educación física,4,4,1,
2A EP,plástica,2,2,1,
2A EP,música,2,2,1,
2A EP,relixión/valores,1,1,1,2
2A EP,recreo,,,,0
Noa Fuertes,libre disposición,2,2,,
Noa Fuertes,garda,2,,,
Noa Fuertes,coordinación,2,2,,
Pilar Campos,libre disposición,2,2,,
Pilar Campos,garda,2,,,
Laura Álvarez,libre disposición,2,2,,
Laura Álvarez,garda,2,,,
Rocío,libre disposición,2,2,,
Rocío,garda,2,,,
";

const TEACHER_TASKS: &str = "\
teacher,calendar,task
Noa Fuertes,1A EP,titoría
Noa Fuertes,1A EP,relixión/valores
Noa Fuertes,1A EP,educación física
Noa Fuertes,2A EP,educación física
Noa Fuertes,Noa Fuertes,garda
Noa Fuertes,Noa Fuertes,libre disposición
Noa Fuertes,Noa Fuertes,coordinación
Pilar Campos,1A EP,plástica
Pilar Campos,1A EP,música
Pilar Campos,2A EP,titoría
Pilar Campos,2A EP,plástica
Pilar Campos,2A EP,música
Pilar Campos,2A EP,relixión/valores
Pilar Campos,Pilar Campos,garda
Pilar Campos,Pilar Campos,libre disposición
Laura Álvarez,1A EP,inglés
Laura Álvarez,2A EP,inglés
Laura Álvarez,Laura Álvarez,garda
Laura Álvarez,Laura Álvarez,libre disposición
Rocío,1A EP,titoría
Rocío,2A EP,titoría
Rocío,1A EP,relixión/valores
Rocío,2A EP,relixión/valores
Rocío,Rocío,garda
Rocío,Rocío,libre disposición
";

// Pinned personal-calendar slots decided before the solve
const FIXED_ASSIGNMENTS: &str = "\
teacher,calendar,task,day,time
Noa Fuertes,Noa Fuertes,libre disposición,Luns,08:55 - 09:45
Noa Fuertes,Noa Fuertes,libre disposición,Venres,08:55 - 09:45
Noa Fuertes,Noa Fuertes,coordinación,Luns,13:05 - 13:55
Pilar Campos,Pilar Campos,libre disposición,Luns,09:45 - 10:35
Laura Álvarez,Laura Álvarez,libre disposición,Martes,08:55 - 09:45
";

/// Writes the sample input set into `dir`
pub fn write_sample<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    fs::write(dir.join(STRUCTURE_FILE), STRUCTURE)?;
    fs::write(dir.join(CALENDAR_TASKS_FILE), CALENDAR_TASKS)?;
    fs::write(dir.join(TEACHER_TASKS_FILE), TEACHER_TASKS)?;
    fs::write(dir.join(PLAYTIME_FILE), playtime_csv())?;
    fs::write(dir.join(FIXED_ASSIGNMENTS_FILE), FIXED_ASSIGNMENTS)?;
    Ok(())
}

/// The break is pinned for every class and day at the midday period
fn playtime_csv() -> String {
    let mut csv = String::from("calendar,day,time\n");
    for class in ["1A EP", "2A EP"] {
        for day in ["Luns", "Martes", "Mércores", "Xoves", "Venres"] {
            csv.push_str(&format!("{},{},11:25 - 11:55\n", class, day));
        }
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsers::InputLoader;
    use std::path::PathBuf;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir()
            .join("timeweaver-tests")
            .join(format!("sample-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_sample_loads_and_validates() {
        let dir = scratch_dir();
        write_sample(&dir).unwrap();

        let data = InputLoader::new().load_dir(&dir).unwrap();
        data.validate().unwrap();

        assert_eq!(data.classes.len(), 2);
        assert_eq!(data.teachers().len(), 4);
        assert_eq!(data.playtime.name, "recreo");
        // every class and day has its pinned break
        assert_eq!(data.playtime.slots.len(), 10);
        assert_eq!(data.calendar_tasks.len(), 23);
        assert_eq!(data.teacher_tasks.len(), 25);
        // the pinned personal-calendar slots survive the round trip
        assert_eq!(data.fixed_assignments.len(), 5);
        assert!(data.fixed_assignments.contains_key(&(
            "Noa Fuertes".to_string(),
            "Noa Fuertes".to_string(),
            "libre disposición".to_string(),
            "Luns".to_string(),
            "08:55 - 09:45".to_string(),
        )));

        fs::remove_dir_all(&dir).unwrap();
    }
}
