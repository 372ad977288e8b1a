use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Print `label`, read one line and parse it.
pub fn prompt_value<T>(input: &mut impl BufRead, output: &mut impl Write, label: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    write!(output, "{label}: ")?;
    output.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .with_context(|| format!("reading answer to '{label}'"))?;
    if read == 0 {
        bail!("input closed before '{label}' was answered");
    }
    let trimmed = line.trim();
    trimmed
        .parse()
        .with_context(|| format!("parsing '{trimmed}' for '{label}'"))
}

/// Values given on the command line; anything missing is prompted for.
#[derive(Debug, Default, Clone, Copy)]
pub struct PartialInput {
    pub max_cable_length: Option<f32>,
    pub support_height: Option<f32>,
    pub station_count: Option<u32>,
}

impl PartialInput {
    pub fn is_complete(&self) -> bool {
        self.max_cable_length.is_some()
            && self.support_height.is_some()
            && self.station_count.is_some()
    }

    /// Fill the gaps interactively, in the order cable, support, stations.
    pub fn complete(
        self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<calib_core::CalibrationInput> {
        let max_cable_length = match self.max_cable_length {
            Some(value) => value,
            None => prompt_value(input, output, "Enter maximum cable length [m]")?,
        };
        let support_height = match self.support_height {
            Some(value) => value,
            None => prompt_value(input, output, "Enter vertical support height [m]")?,
        };
        let station_count = match self.station_count {
            Some(value) => value,
            None => prompt_value(
                input,
                output,
                &format!("Enter number of sensor stations (2 to {support_height:.0})"),
            )?,
        };
        Ok(calib_core::CalibrationInput::new(
            max_cable_length,
            support_height,
            station_count,
        ))
    }
}
