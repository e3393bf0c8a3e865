use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use towndiff::{MemoryTownStore, TownService};

pub fn run(
    towns: Option<PathBuf>,
    input: PathBuf,
    output: Option<PathBuf>,
    home_col: String,
    dest_col: String,
) -> Result<()> {
    let service = super::load_service(towns)?;

    let output_path = output.unwrap_or_else(|| default_output_path(&input));
    let stats = process_csv(&service, &input, &output_path, &home_col, &dest_col)?;

    println!(
        "Output written to: {} ({} rows, {} not found)",
        output_path.display(),
        stats.rows,
        stats.not_found
    );
    Ok(())
}

/// Row counts from a batch run.
#[derive(Debug, Default, PartialEq, Eq)]
struct BatchStats {
    rows: u64,
    not_found: u64,
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "towns".to_string());
    input.with_file_name(format!("{}_distance.csv", stem))
}

/// Copy every row of `input` to `output` with a trailing `distance_km` column.
///
/// Rows naming an unknown town get an empty distance.
fn process_csv(
    service: &TownService<MemoryTownStore>,
    input: &Path,
    output: &Path,
    home_col: &str,
    dest_col: &str,
) -> Result<BatchStats> {
    let file = File::open(input).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    // Find column indices
    let headers = reader.headers()?.clone();
    let home_idx = headers
        .iter()
        .position(|h| h == home_col)
        .with_context(|| format!("Column '{}' not found in CSV", home_col))?;
    let dest_idx = headers
        .iter()
        .position(|h| h == dest_col)
        .with_context(|| format!("Column '{}' not found in CSV", dest_col))?;

    // Collect records for progress bar
    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let output_file = File::create(output).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(output_file));

    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.push("distance_km");
    writer.write_record(&new_headers)?;

    let mut stats = BatchStats::default();
    for record in records {
        let home = record.get(home_idx).context("Missing home town")?;
        let dest = record.get(dest_idx).context("Missing destination town")?;

        let distance = match service
            .diff(home, dest)
            .with_context(|| format!("Failed to compute distance {} -> {}", home, dest))?
        {
            Some(diff) => diff.distance.to_string(),
            None => {
                stats.not_found += 1;
                String::new()
            }
        };

        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.push(&distance);
        writer.write_record(&new_record)?;

        stats.rows += 1;
        pb.inc(1);
    }

    pb.finish_with_message("done");
    writer.flush()?;

    Ok(stats)
}
