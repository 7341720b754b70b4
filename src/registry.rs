//! Catalog of report item kinds that can be placed in a book.
//!
//! The registry is an ordinary value handed to whoever needs it. Book loading
//! only ever reads from it; entries are added once, up front, by the host.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::options::OptionSet;
use crate::render::ItemJob;

/// Rendering entry point of a report item kind.
pub trait ItemWriter: Send + Sync {
    fn write_item(&self, job: &ItemJob<'_>, out: &mut dyn Write) -> io::Result<()>;
}

impl<F> ItemWriter for F
where
    F: Fn(&ItemJob<'_>, &mut dyn Write) -> io::Result<()> + Send + Sync,
{
    fn write_item(&self, job: &ItemJob<'_>, out: &mut dyn Write) -> io::Result<()> {
        self(job, out)
    }
}

/// Builds a fresh option set for an item kind, given the item's label.
pub type OptionSetFactory = Arc<dyn Fn(&str) -> OptionSet + Send + Sync>;

/// One registered item kind.
#[derive(Clone)]
pub struct ItemRegistration {
    pub name: String,
    pub category: String,
    pub label: String,
    pub writer: Arc<dyn ItemWriter>,
    pub factory: OptionSetFactory,
}

impl ItemRegistration {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        label: impl Into<String>,
        writer: impl ItemWriter + 'static,
        factory: impl Fn(&str) -> OptionSet + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            label: label.into(),
            writer: Arc::new(writer),
            factory: Arc::new(factory),
        }
    }

    /// Create a new, independent option set for this kind.
    pub fn make_options(&self) -> OptionSet {
        (self.factory)(&self.label)
    }
}

impl fmt::Debug for ItemRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemRegistration")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Append-only table of item kinds, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    entries: Vec<ItemRegistration>,
    by_name: HashMap<String, usize>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item kind. Names are unique; a second registration is rejected.
    pub fn register(&mut self, registration: ItemRegistration) -> Result<()> {
        if self.by_name.contains_key(&registration.name) {
            return Err(Error::DuplicateItem(registration.name));
        }
        self.by_name
            .insert(registration.name.clone(), self.entries.len());
        self.entries.push(registration);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&ItemRegistration> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All registrations, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemRegistration> {
        self.entries.iter()
    }

    /// Distinct categories, in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.category.as_str()) {
                seen.push(&entry.category);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
