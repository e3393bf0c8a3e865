//! Town records and lookup criteria.

use serde::{Deserialize, Serialize};

/// A named geographic point.
///
/// `id` is assigned by the store on creation; `0` means the town has not been
/// persisted yet. Latitude and longitude are signed decimal degrees and are
/// not range-checked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Town {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: u64,
    /// Town name, unique within a store.
    #[serde(default)]
    pub name: String,
    /// Latitude in decimal degrees.
    #[serde(default)]
    pub lat: f64,
    /// Longitude in decimal degrees.
    #[serde(default)]
    pub lon: f64,
}

impl Town {
    /// Create an unsaved town (id `0`).
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            lat,
            lon,
        }
    }

    /// Same town with the given identifier.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }
}

/// Filter used to look towns up.
///
/// Set fields are ANDed together. An empty name and a zero id count as unset,
/// so `Criteria::default()` matches every town.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Criteria {
    /// Exact town name.
    #[serde(default)]
    pub name: Option<String>,
    /// Town identifier.
    #[serde(default)]
    pub id: Option<u64>,
}

impl Criteria {
    /// Criteria matching every town.
    pub fn all() -> Self {
        Self::default()
    }

    /// Criteria matching the town with this exact name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            id: None,
        }
    }

    /// Criteria matching the town with this identifier.
    pub fn by_id(id: u64) -> Self {
        Self {
            name: None,
            id: Some(id),
        }
    }

    /// Narrow these criteria to an identifier as well.
    pub fn and_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// The name filter, if one is effectively set.
    pub fn name_filter(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// The id filter, if one is effectively set.
    pub fn id_filter(&self) -> Option<u64> {
        self.id.filter(|&id| id > 0)
    }

    /// Whether no filter is set.
    pub fn is_empty(&self) -> bool {
        self.name_filter().is_none() && self.id_filter().is_none()
    }

    /// Check a town against every set filter.
    pub fn matches(&self, town: &Town) -> bool {
        self.name_filter().map_or(true, |name| town.name == name)
            && self.id_filter().map_or(true, |id| town.id == id)
    }
}

impl From<&Town> for Criteria {
    /// Criteria built from a partial town, as sent by callers that reuse the
    /// town shape for filtering.
    fn from(town: &Town) -> Self {
        Self {
            name: Some(town.name.clone()),
            id: Some(town.id),
        }
    }
}
