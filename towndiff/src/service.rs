//! Town operations over a [`TownStore`].
//!
//! [`TownService`] delegates CRUD to its store and resolves towns by name to
//! compute distances between them. It holds no state besides the store and
//! never caches: every call re-reads the store.
//!
//! # Not-found handling
//!
//! Updating, deleting or diffing a name that does not exist is not an error.
//! The `update`, `delete` and `diff` methods keep that success-shaped surface
//! (unchanged patch, `true`, `None`). The `update_town`, `delete_town` and
//! `diff_towns` methods return tagged outcomes that tell the cases apart.
//!
//! ```
//! use towndiff::{MemoryTownStore, Town, TownService, UpdateOutcome};
//!
//! let service = TownService::new(MemoryTownStore::new());
//! let patch = Town::new("Nice", 43.7102, 7.262);
//!
//! // Legacy surface: the patch comes back as if it had been applied
//! assert_eq!(service.update("Nice", patch.clone())?, patch);
//!
//! // Tagged surface: the miss is visible
//! assert!(matches!(
//!     service.update_town("Nice", patch)?,
//!     UpdateOutcome::NotFound(_)
//! ));
//! # Ok::<(), towndiff::TownError>(())
//! ```

use crate::distance::DiffResult;
use crate::error::Result;
use crate::store::TownStore;
use crate::town::{Criteria, Town};

/// Result of [`TownService::update_town`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The named town was overwritten; carries the persisted record.
    Updated(Town),
    /// No town had that name; carries the untouched patch.
    NotFound(Town),
}

impl UpdateOutcome {
    /// The town reported to legacy callers: updated record or echoed patch.
    pub fn into_town(self) -> Town {
        match self {
            UpdateOutcome::Updated(town) | UpdateOutcome::NotFound(town) => town,
        }
    }

    /// Whether a town was actually updated.
    pub fn is_updated(&self) -> bool {
        matches!(self, UpdateOutcome::Updated(_))
    }
}

/// Result of [`TownService::delete_town`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Exactly one row was removed.
    Deleted,
    /// The town was found but the store did not remove exactly one row.
    NotDeleted { rows_affected: u64 },
    /// No town had that name.
    NotFound,
}

impl DeleteOutcome {
    /// Delete-if-exists success flag: absence counts as success.
    pub fn succeeded(self) -> bool {
        match self {
            DeleteOutcome::Deleted | DeleteOutcome::NotFound => true,
            DeleteOutcome::NotDeleted { .. } => false,
        }
    }
}

/// Result of [`TownService::diff_towns`].
#[derive(Debug, Clone, PartialEq)]
pub enum DiffOutcome {
    /// Both towns resolved.
    Computed(DiffResult),
    /// The home town name matched nothing.
    HomeNotFound,
    /// The destination town name matched nothing.
    DestinationNotFound,
}

impl DiffOutcome {
    /// The distance, if both towns resolved.
    pub fn into_result(self) -> Option<DiffResult> {
        match self {
            DiffOutcome::Computed(diff) => Some(diff),
            DiffOutcome::HomeNotFound | DiffOutcome::DestinationNotFound => None,
        }
    }
}

/// Town CRUD and name-based distance lookups.
///
/// The store is injected at construction; share one store between several
/// services by passing an `Arc<S>` or `&S`.
#[derive(Debug)]
pub struct TownService<S> {
    store: S,
}

impl<S: TownStore> TownService<S> {
    /// Create a service over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the service, returning its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Towns matching `criteria`. An empty result is not an error.
    pub fn get(&self, criteria: &Criteria) -> Result<Vec<Town>> {
        self.store.find(criteria)
    }

    /// Persist a new town, returning it with its store-assigned id.
    ///
    /// # Errors
    ///
    /// [`TownError::ConstraintViolation`](crate::TownError::ConstraintViolation)
    /// if the name already exists.
    pub fn save(&self, town: Town) -> Result<Town> {
        self.store.create(town)
    }

    /// Overwrite name, latitude and longitude of the town called `name`.
    ///
    /// Returns the updated record. If no town has that name, returns `patch`
    /// unchanged without touching the store.
    pub fn update(&self, name: &str, patch: Town) -> Result<Town> {
        self.update_town(name, patch).map(UpdateOutcome::into_town)
    }

    /// Like [`Self::update`], reporting whether the town existed.
    pub fn update_town(&self, name: &str, patch: Town) -> Result<UpdateOutcome> {
        let Some(mut town) = self.first_named(name)? else {
            return Ok(UpdateOutcome::NotFound(patch));
        };

        town.name = patch.name;
        town.lat = patch.lat;
        town.lon = patch.lon;

        self.store.update(town).map(UpdateOutcome::Updated)
    }

    /// Delete the town called `name`.
    ///
    /// Returns `true` if no such town exists, otherwise whether exactly one
    /// row was removed.
    pub fn delete(&self, name: &str) -> Result<bool> {
        self.delete_town(name).map(DeleteOutcome::succeeded)
    }

    /// Like [`Self::delete`], reporting whether the town existed.
    pub fn delete_town(&self, name: &str) -> Result<DeleteOutcome> {
        let Some(town) = self.first_named(name)? else {
            return Ok(DeleteOutcome::NotFound);
        };

        Ok(match self.store.delete(&town)? {
            1 => DeleteOutcome::Deleted,
            rows_affected => DeleteOutcome::NotDeleted { rows_affected },
        })
    }

    /// Distance between the towns called `home` and `dest`.
    ///
    /// Returns `None` if either name matches nothing.
    pub fn diff(&self, home: &str, dest: &str) -> Result<Option<DiffResult>> {
        self.diff_towns(home, dest).map(DiffOutcome::into_result)
    }

    /// Like [`Self::diff`], reporting which town was missing.
    pub fn diff_towns(&self, home: &str, dest: &str) -> Result<DiffOutcome> {
        let home = self.first_named(home)?;
        let dest = self.first_named(dest)?;

        Ok(match (home, dest) {
            (None, _) => DiffOutcome::HomeNotFound,
            (_, None) => DiffOutcome::DestinationNotFound,
            (Some(home), Some(dest)) => DiffOutcome::Computed(DiffResult::between(&home, &dest)),
        })
    }

    /// First town with this exact name. The store keeps names unique, so the
    /// first match is authoritative.
    fn first_named(&self, name: &str) -> Result<Option<Town>> {
        // An empty name leaves the criteria unset, so re-check equality
        Ok(self
            .get(&Criteria::by_name(name))?
            .into_iter()
            .find(|town| town.name == name))
    }
}
