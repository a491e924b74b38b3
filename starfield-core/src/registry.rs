//! Registry of loaded datasets
//!
//! Keeps datasets both in load order (picking and drawing walk this order)
//! and by title. The two views are only ever changed together, and only
//! fully decoded datasets are inserted, so readers never observe a partial
//! buffer.

use crate::dataset::PointDataset;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered, title-indexed collection of loaded datasets
#[derive(Debug, Default)]
pub struct DatasetRegistry {
    ordered: Vec<Arc<PointDataset>>,
    by_title: HashMap<String, Arc<PointDataset>>,
}

impl DatasetRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a fully loaded dataset
    ///
    /// Fails if a dataset with the same title is already registered.
    pub fn insert(&mut self, dataset: PointDataset) -> Result<Arc<PointDataset>> {
        if self.by_title.contains_key(dataset.title()) {
            return Err(Error::DuplicateDataset(dataset.title().to_string()));
        }

        let dataset = Arc::new(dataset);
        self.by_title
            .insert(dataset.title().to_string(), Arc::clone(&dataset));
        self.ordered.push(Arc::clone(&dataset));
        log::info!(
            "Registered dataset '{}' with {} points",
            dataset.title(),
            dataset.len()
        );
        Ok(dataset)
    }

    /// Look a dataset up by title
    pub fn get(&self, title: &str) -> Option<&Arc<PointDataset>> {
        self.by_title.get(title)
    }

    /// Get an iterator over all datasets in load order
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<PointDataset>> {
        self.ordered.iter()
    }

    /// Get an iterator over the visible datasets in load order
    pub fn visible(&self) -> impl Iterator<Item = &Arc<PointDataset>> {
        self.ordered.iter().filter(|d| d.is_visible())
    }

    /// Show or hide a dataset by title
    pub fn set_visible(&self, title: &str, visible: bool) -> Result<()> {
        let dataset = self
            .get(title)
            .ok_or_else(|| Error::UnknownDataset(title.to_string()))?;
        dataset.set_visible(visible);
        Ok(())
    }

    /// Load-order position of a registered dataset
    pub fn position_of(&self, dataset: &Arc<PointDataset>) -> Option<usize> {
        self.ordered.iter().position(|d| Arc::ptr_eq(d, dataset))
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl<'a> IntoIterator for &'a DatasetRegistry {
    type Item = &'a Arc<PointDataset>;
    type IntoIter = std::slice::Iter<'a, Arc<PointDataset>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.iter()
    }
}
