pub mod batch;
pub mod diff;
pub mod distance;
pub mod list;

use anyhow::{Context, Result};
use std::path::PathBuf;
use towndiff::{MemoryTownStore, TownService, TownServiceBuilder};

/// Build a service over the towns file.
pub fn load_service(towns: Option<PathBuf>) -> Result<TownService<MemoryTownStore>> {
    let path = towns.context(
        "TOWNDIFF_SEED_FILE environment variable not set. Use --towns or set TOWNDIFF_SEED_FILE",
    )?;

    TownServiceBuilder::new()
        .seed_file(&path)
        .build()
        .with_context(|| format!("Failed to load towns from {}", path.display()))
}
