use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// Town distance CLI tool
#[derive(Parser)]
#[command(name = "towndiff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON or GeoJSON file of towns
    #[arg(short, long, env = "TOWNDIFF_SEED_FILE", global = true)]
    towns: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Distance between two towns from the towns file
    Diff {
        /// Name of the home town
        home: String,

        /// Name of the destination town
        dest: String,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Distance between two raw coordinates
    Distance {
        /// Home latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        from_lat: f64,

        /// Home longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        from_lon: f64,

        /// Destination latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        to_lat: f64,

        /// Destination longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        to_lon: f64,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add distances to a CSV of town name pairs
    Batch {
        /// Input CSV file
        input: PathBuf,

        /// Output file (defaults to <input>_distance.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for the home town
        #[arg(long, default_value = "home")]
        home_col: String,

        /// Column name for the destination town
        #[arg(long, default_value = "dest")]
        dest_col: String,
    },

    /// List towns in the towns file
    List {
        /// Output a GeoJSON FeatureCollection
        #[arg(short, long)]
        geojson: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Diff { home, dest, json } => commands::diff::run(cli.towns, home, dest, json),
        Commands::Distance {
            from_lat,
            from_lon,
            to_lat,
            to_lon,
            json,
        } => commands::distance::run(from_lat, from_lon, to_lat, to_lon, json),
        Commands::Batch {
            input,
            output,
            home_col,
            dest_col,
        } => commands::batch::run(cli.towns, input, output, home_col, dest_col),
        Commands::List { geojson } => commands::list::run(cli.towns, geojson),
    }
}
