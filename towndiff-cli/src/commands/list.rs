use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::PathBuf;
use towndiff::geojson::towns_to_feature_collection;
use towndiff::{Criteria, Town};

pub fn run(towns: Option<PathBuf>, as_geojson: bool) -> Result<()> {
    let service = super::load_service(towns)?;
    let towns = service
        .get(&Criteria::all())
        .context("Failed to read towns")?;

    write_towns(&mut io::stdout().lock(), &towns, as_geojson)
}

fn write_towns<W: Write>(out: &mut W, towns: &[Town], as_geojson: bool) -> Result<()> {
    if as_geojson {
        let collection = geojson::GeoJson::FeatureCollection(towns_to_feature_collection(towns));
        writeln!(out, "{}", serde_json::to_string_pretty(&collection)?)?;
        return Ok(());
    }

    if towns.is_empty() {
        writeln!(out, "No towns found")?;
        return Ok(());
    }

    writeln!(out, "{:>6}  {:<24} {:>12} {:>12}", "ID", "NAME", "LAT", "LON")?;
    writeln!(out, "{}", "-".repeat(57))?;
    for town in towns {
        writeln!(
            out,
            "{:>6}  {:<24} {:>12.6} {:>12.6}",
            town.id, town.name, town.lat, town.lon
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Total: {} towns", towns.len())?;

    Ok(())
}
