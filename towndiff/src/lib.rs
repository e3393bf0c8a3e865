//! # towndiff - Town records and distances
//!
//! Small library for storing named towns (name, latitude, longitude) and
//! computing the great-circle distance between two of them by name.
//!
//! ## Features
//!
//! - **Pluggable storage**: [`TownService`] works over any [`TownStore`]
//! - **In-memory store**: [`MemoryTownStore`], optionally seeded from a file
//! - **GeoJSON**: convert towns to and from GeoJSON (`geojson` feature)
//!
//! ## Quick Start
//!
//! ```
//! use towndiff::{MemoryTownStore, Town, TownService};
//!
//! let service = TownService::new(MemoryTownStore::new());
//! service.save(Town::new("Antibes", 43.580719, 7.12087))?;
//! service.save(Town::new("Paris", 48.856613, 2.352222))?;
//!
//! let diff = service.diff("Antibes", "Paris")?.expect("both towns exist");
//! assert_eq!(diff.units, "kilometers");
//! assert!((diff.distance - 691.5725).abs() < 1e-3);
//! # Ok::<(), towndiff::TownError>(())
//! ```
//!
//! ## Distance Model
//!
//! Distances use the spherical law of cosines. The central angle in degrees
//! is converted to nautical miles (60 per degree), scaled by 1.1515 to
//! statute miles, then by 1.609344 to kilometers.

pub mod config;
pub mod distance;
pub mod error;
#[cfg(feature = "geojson")]
pub mod geojson;
pub mod service;
pub mod store;
pub mod town;

// Re-export main types at crate root for convenience
pub use config::TownServiceBuilder;
pub use distance::{great_circle_km, DiffResult, UNITS};
pub use error::{Result, TownError};
pub use service::{DeleteOutcome, DiffOutcome, TownService, UpdateOutcome};
pub use store::{MemoryTownStore, TownStore};
pub use town::{Criteria, Town};
