//! Town persistence.
//!
//! [`TownStore`] is the contract [`TownService`](crate::TownService) relies on.
//! [`MemoryTownStore`] is a thread-safe in-memory implementation.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Result, TownError};
use crate::town::{Criteria, Town};

/// Persistence contract for towns.
///
/// Implementations enforce name uniqueness and assign identifiers. They must
/// be safe to share between threads; the service adds no locking of its own.
pub trait TownStore: Send + Sync {
    /// Towns matching every set field of `criteria`, in ascending id order.
    ///
    /// Empty criteria return every town.
    fn find(&self, criteria: &Criteria) -> Result<Vec<Town>>;

    /// Persist a new town and return it with its assigned identifier.
    ///
    /// Fails with [`TownError::ConstraintViolation`] if the name is taken.
    fn create(&self, town: Town) -> Result<Town>;

    /// Overwrite the town with the same identifier.
    fn update(&self, town: Town) -> Result<Town>;

    /// Remove the town with the same identifier, returning rows affected.
    fn delete(&self, town: &Town) -> Result<u64>;
}

impl<S: TownStore + ?Sized> TownStore for Arc<S> {
    fn find(&self, criteria: &Criteria) -> Result<Vec<Town>> {
        (**self).find(criteria)
    }

    fn create(&self, town: Town) -> Result<Town> {
        (**self).create(town)
    }

    fn update(&self, town: Town) -> Result<Town> {
        (**self).update(town)
    }

    fn delete(&self, town: &Town) -> Result<u64> {
        (**self).delete(town)
    }
}

impl<S: TownStore + ?Sized> TownStore for &S {
    fn find(&self, criteria: &Criteria) -> Result<Vec<Town>> {
        (**self).find(criteria)
    }

    fn create(&self, town: Town) -> Result<Town> {
        (**self).create(town)
    }

    fn update(&self, town: Town) -> Result<Town> {
        (**self).update(town)
    }

    fn delete(&self, town: &Town) -> Result<u64> {
        (**self).delete(town)
    }
}

#[derive(Debug, Default)]
struct Rows {
    /// Towns keyed by identifier.
    towns: BTreeMap<u64, Town>,
    /// Last identifier handed out.
    last_id: u64,
}

impl Rows {
    fn name_taken(&self, name: &str, except_id: u64) -> bool {
        self.towns
            .values()
            .any(|town| town.id != except_id && town.name == name)
    }
}

/// In-memory [`TownStore`].
///
/// # Example
///
/// ```
/// use towndiff::{Criteria, MemoryTownStore, Town, TownStore};
///
/// let store = MemoryTownStore::new();
/// let nice = store.create(Town::new("Nice", 43.7102, 7.262))?;
/// assert_eq!(nice.id, 1);
/// assert_eq!(store.find(&Criteria::by_name("Nice"))?, vec![nice]);
/// # Ok::<(), towndiff::TownError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryTownStore {
    rows: RwLock<Rows>,
}

impl MemoryTownStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given towns.
    ///
    /// Each town goes through [`TownStore::create`], so duplicate names fail.
    pub fn with_towns<I>(towns: I) -> Result<Self>
    where
        I: IntoIterator<Item = Town>,
    {
        let store = Self::new();
        for town in towns {
            store.create(town)?;
        }
        Ok(store)
    }

    /// Number of stored towns.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.towns.len())
    }

    /// Whether the store holds no towns.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Rows>> {
        self.rows.read().map_err(|_| TownError::StoreUnavailable {
            reason: "town table lock poisoned".to_string(),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Rows>> {
        self.rows.write().map_err(|_| TownError::StoreUnavailable {
            reason: "town table lock poisoned".to_string(),
        })
    }
}

impl TownStore for MemoryTownStore {
    fn find(&self, criteria: &Criteria) -> Result<Vec<Town>> {
        let rows = self.read()?;

        // Identifier lookups hit the map directly
        if let Some(id) = criteria.id_filter() {
            return Ok(rows
                .towns
                .get(&id)
                .filter(|town| criteria.matches(town))
                .cloned()
                .into_iter()
                .collect());
        }

        Ok(rows
            .towns
            .values()
            .filter(|town| criteria.matches(town))
            .cloned()
            .collect())
    }

    fn create(&self, mut town: Town) -> Result<Town> {
        let mut rows = self.write()?;

        if rows.name_taken(&town.name, 0) {
            return Err(TownError::duplicate_name(&town.name));
        }

        if town.id == 0 {
            town.id = rows
                .last_id
                .checked_add(1)
                .ok_or(TownError::IdsExhausted {
                    last_id: rows.last_id,
                })?;
        } else if rows.towns.contains_key(&town.id) {
            return Err(TownError::duplicate_id(town.id));
        }

        rows.last_id = rows.last_id.max(town.id);
        rows.towns.insert(town.id, town.clone());
        Ok(town)
    }

    fn update(&self, town: Town) -> Result<Town> {
        let mut rows = self.write()?;

        if !rows.towns.contains_key(&town.id) {
            return Err(TownError::NotFound { id: town.id });
        }
        if rows.name_taken(&town.name, town.id) {
            return Err(TownError::duplicate_name(&town.name));
        }

        rows.towns.insert(town.id, town.clone());
        Ok(town)
    }

    fn delete(&self, town: &Town) -> Result<u64> {
        let mut rows = self.write()?;
        Ok(rows.towns.remove(&town.id).map_or(0, |_| 1))
    }
}
