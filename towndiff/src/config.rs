//! Service construction and seed files.
//!
//! [`TownServiceBuilder`] assembles a [`TownService`] over a
//! [`MemoryTownStore`], optionally seeded from a file.
//!
//! # Seed File Format
//!
//! A JSON array of towns; `id` may be omitted and is then assigned by the
//! store:
//!
//! ```json
//! [
//!   {"name": "Antibes", "lat": 43.580719, "lon": 7.12087},
//!   {"name": "Paris", "lat": 48.856613, "lon": 2.352222}
//! ]
//! ```
//!
//! With the `geojson` feature, files ending in `.geojson` are read as a
//! `FeatureCollection` of `Point` features carrying a `name` property.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::service::TownService;
use crate::store::MemoryTownStore;
use crate::town::Town;

/// Environment variable naming the seed file.
pub const SEED_FILE_ENV: &str = "TOWNDIFF_SEED_FILE";

/// Builder for a [`TownService`] backed by a [`MemoryTownStore`].
///
/// # Example
///
/// ```
/// use towndiff::{Town, TownServiceBuilder};
///
/// let service = TownServiceBuilder::new()
///     .towns([Town::new("Paris", 48.856613, 2.352222)])
///     .build()?;
/// assert_eq!(service.store().len()?, 1);
/// # Ok::<(), towndiff::TownError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TownServiceBuilder {
    seed_file: Option<PathBuf>,
    towns: Vec<Town>,
}

impl TownServiceBuilder {
    /// Create a builder for an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder configured from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `TOWNDIFF_SEED_FILE` | Towns to load at startup | None |
    pub fn from_env() -> Self {
        let seed_file = std::env::var_os(SEED_FILE_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Self {
            seed_file,
            towns: Vec::new(),
        }
    }

    /// Load towns from this file at build time.
    pub fn seed_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.seed_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Add towns to create at build time, after the seed file's.
    pub fn towns<I>(mut self, towns: I) -> Self
    where
        I: IntoIterator<Item = Town>,
    {
        self.towns.extend(towns);
        self
    }

    /// The configured seed file, if any.
    pub fn seed_path(&self) -> Option<&Path> {
        self.seed_file.as_deref()
    }

    /// Build the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed file cannot be read or decoded, or if two
    /// seeded towns share a name.
    pub fn build(self) -> Result<TownService<MemoryTownStore>> {
        let mut towns = match &self.seed_file {
            Some(path) => load_towns(path)?,
            None => Vec::new(),
        };
        towns.extend(self.towns);

        Ok(TownService::new(MemoryTownStore::with_towns(towns)?))
    }
}

/// Read towns from a seed file.
///
/// Files ending in `.geojson` are decoded as GeoJSON when the `geojson`
/// feature is enabled; everything else is read as a JSON array of towns.
pub fn load_towns<P: AsRef<Path>>(path: P) -> Result<Vec<Town>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    #[cfg(feature = "geojson")]
    {
        if is_geojson_path(path) {
            let geojson: ::geojson::GeoJson = serde_json::from_reader(reader)?;
            return crate::geojson::towns_from_geojson(geojson);
        }
    }

    Ok(serde_json::from_reader(reader)?)
}

/// Whether a path names a GeoJSON file.
pub fn is_geojson_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("geojson"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TownError;
    use crate::town::Criteria;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_build_empty() {
        let service = TownServiceBuilder::new().build().unwrap();
        assert!(service.store().is_empty().unwrap());
    }

    #[test]
    fn test_load_json_seed() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "towns.json",
            r#"[
                {"name": "Antibes", "lat": 43.580719, "lon": 7.12087},
                {"id": 7, "name": "Paris", "lat": 48.856613, "lon": 2.352222}
            ]"#,
        );

        let service = TownServiceBuilder::new()
            .seed_file(&path)
            .towns([Town::new("Lyon", 45.764043, 4.835659)])
            .build()
            .unwrap();

        let towns = service.get(&Criteria::all()).unwrap();
        let ids: Vec<_> = towns.iter().map(|t| (t.id, t.name.as_str())).collect();
        assert_eq!(ids, vec![(1, "Antibes"), (7, "Paris"), (8, "Lyon")]);
    }

    #[test]
    fn test_duplicate_seed_names_fail() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "towns.json",
            r#"[{"name": "Paris", "lat": 1, "lon": 2}, {"name": "Paris", "lat": 3, "lon": 4}]"#,
        );
        let err = TownServiceBuilder::new()
            .seed_file(path)
            .build()
            .unwrap_err();
        assert!(matches!(err, TownError::ConstraintViolation { .. }));
    }

    #[test]
    fn test_missing_and_malformed_seed_files() {
        let dir = TempDir::new().unwrap();

        let err = load_towns(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, TownError::Io(_)));

        let path = write_file(&dir, "bad.json", "{not json");
        let err = load_towns(path).unwrap_err();
        assert!(matches!(err, TownError::Parse { .. }));
    }

    #[test]
    fn test_geojson_extension_detection() {
        assert!(is_geojson_path(Path::new("towns.geojson")));
        assert!(is_geojson_path(Path::new("/data/TOWNS.GeoJSON")));
        assert!(!is_geojson_path(Path::new("towns.json")));
        assert!(!is_geojson_path(Path::new("towns")));
    }
}
