use anyhow::Result;
use std::io::{self, Write};
use towndiff::{great_circle_km, DiffResult};

pub fn run(from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64, json: bool) -> Result<()> {
    let diff = DiffResult::kilometers(great_circle_km(from_lat, from_lon, to_lat, to_lon));
    write_diff(&mut io::stdout().lock(), &diff, json)
}

fn write_diff<W: Write>(out: &mut W, diff: &DiffResult, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(diff)?)?;
    } else {
        writeln!(out, "{:.3} {}", diff.distance, diff.units)?;
    }

    Ok(())
}
