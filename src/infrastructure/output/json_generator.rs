use anyhow::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use crate::presentation::dto::SolveOutput;

pub struct JsonGenerator;

impl JsonGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate<P: AsRef<Path>>(&self, output: &SolveOutput, path: P) -> Result<()> {
        let json = self.generate_string(output)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    pub fn generate_string(&self, output: &SolveOutput) -> Result<String> {
        Ok(serde_json::to_string_pretty(output)?)
    }
}

impl Default for JsonGenerator {
    fn default() -> Self {
        Self::new()
    }
}
