use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use towndiff::DiffOutcome;

#[derive(Serialize)]
struct DiffResponse<'a> {
    home: &'a str,
    dest: &'a str,
    distance: Option<f64>,
    units: &'static str,
}

pub fn run(towns: Option<PathBuf>, home: String, dest: String, json: bool) -> Result<()> {
    let service = super::load_service(towns)?;

    let outcome = service
        .diff_towns(&home, &dest)
        .context("Failed to compute distance")?;

    write_outcome(&mut io::stdout().lock(), &home, &dest, outcome, json)
}

fn write_outcome<W: Write>(
    out: &mut W,
    home: &str,
    dest: &str,
    outcome: DiffOutcome,
    json: bool,
) -> Result<()> {
    if json {
        let response = DiffResponse {
            home,
            dest,
            distance: outcome.into_result().map(|d| d.distance),
            units: towndiff::UNITS,
        };
        writeln!(out, "{}", serde_json::to_string(&response)?)?;
        return Ok(());
    }

    match outcome {
        DiffOutcome::Computed(diff) => writeln!(out, "{:.3} {}", diff.distance, diff.units)?,
        DiffOutcome::HomeNotFound => writeln!(out, "not found: {}", home)?,
        DiffOutcome::DestinationNotFound => writeln!(out, "not found: {}", dest)?,
    }

    Ok(())
}
