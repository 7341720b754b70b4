use std::fmt;
use std::sync::Arc;

use crate::options::OptionSet;
use crate::registry::{ItemRegistry, ItemWriter};

pub const DEFAULT_STYLE: &str = "default";

/// One configured entry of a book: a registered item kind, its option values
/// and the name of the style sheet it renders with.
#[derive(Clone)]
pub struct BookItem {
    name: String,
    category: String,
    label: String,
    writer: Option<Arc<dyn ItemWriter>>,
    option_set: OptionSet,
    style_name: String,
    /// Name read from storage when the registry did not know it.
    stored_name: Option<String>,
}

impl BookItem {
    /// An empty item, not bound to any registered kind.
    pub fn clear() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            label: String::new(),
            writer: None,
            option_set: OptionSet::default(),
            style_name: DEFAULT_STYLE.to_string(),
            stored_name: None,
        }
    }

    /// A cleared item standing in for a stored item whose kind is not
    /// registered. It is written back under `stored_name`.
    pub fn unregistered(stored_name: impl Into<String>) -> Self {
        Self {
            stored_name: Some(stored_name.into()),
            ..Self::clear()
        }
    }

    /// Build an item from the registry entry called `name`.
    ///
    /// Unknown names produce the same value as [`BookItem::clear`]. Use
    /// [`BookItem::try_from_registry`] to tell the two cases apart.
    pub fn from_registry(registry: &ItemRegistry, name: &str) -> Self {
        Self::try_from_registry(registry, name).unwrap_or_else(Self::clear)
    }

    /// Like [`BookItem::from_registry`], but `None` when `name` is not registered.
    pub fn try_from_registry(registry: &ItemRegistry, name: &str) -> Option<Self> {
        let entry = registry.lookup(name)?;
        Some(Self {
            name: entry.name.clone(),
            category: entry.category.clone(),
            label: entry.label.clone(),
            writer: Some(Arc::clone(&entry.writer)),
            option_set: entry.make_options(),
            style_name: DEFAULT_STYLE.to_string(),
            stored_name: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name the item is saved under: the registered name, or the stored name
    /// of an [`BookItem::unregistered`] item.
    pub fn saved_name(&self) -> &str {
        self.stored_name.as_deref().unwrap_or(&self.name)
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Human-readable label of the item kind.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn writer(&self) -> Option<&Arc<dyn ItemWriter>> {
        self.writer.as_ref()
    }

    pub fn option_set(&self) -> &OptionSet {
        &self.option_set
    }

    pub fn option_set_mut(&mut self) -> &mut OptionSet {
        &mut self.option_set
    }

    pub fn style_name(&self) -> &str {
        &self.style_name
    }

    pub fn set_style_name(&mut self, style_name: impl Into<String>) {
        self.style_name = style_name.into();
    }

    /// True for items that were never bound to a registry entry.
    pub fn is_cleared(&self) -> bool {
        self.name.is_empty()
    }
}

impl Default for BookItem {
    fn default() -> Self {
        Self::clear()
    }
}

impl PartialEq for BookItem {
    fn eq(&self, other: &Self) -> bool {
        let same_writer = match (&self.writer, &other.writer) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_writer
            && self.name == other.name
            && self.category == other.category
            && self.label == other.label
            && self.option_set == other.option_set
            && self.style_name == other.style_name
            && self.stored_name == other.stored_name
    }
}

impl fmt::Debug for BookItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookItem")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("label", &self.label)
            .field("has_writer", &self.writer.is_some())
            .field("option_set", &self.option_set)
            .field("style_name", &self.style_name)
            .field("stored_name", &self.stored_name)
            .finish()
    }
}

/// Outcome of [`Book::rebind_subjects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMatch {
    Same,
    /// The book was saved against another data source; subject ids were reset.
    Different { previous: String },
}

/// A named, ordered collection of book items.
///
/// Item order is render order. Cloning a book copies its items; two books
/// never share an item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Book {
    name: String,
    data_source_id: String,
    items: Vec<BookItem>,
}

impl Book {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A new, unnamed book holding copies of `other`'s items.
    pub fn with_items_of(other: &Book) -> Self {
        Self {
            items: other.items.clone(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Identifier of the data source the book was built against.
    pub fn data_source_id(&self) -> &str {
        &self.data_source_id
    }

    pub fn set_data_source_id(&mut self, id: impl Into<String>) {
        self.data_source_id = id.into();
    }

    /// Remove every item. Name and data source are kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn append_item(&mut self, item: BookItem) {
        self.items.push(item);
    }

    /// Insert at `index`, shifting later items back.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_item(&mut self, index: usize, item: BookItem) {
        self.items.insert(index, item);
    }

    /// Remove and return the item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn pop_item(&mut self, index: usize) -> BookItem {
        self.items.remove(index)
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn item(&self, index: usize) -> &BookItem {
        &self.items[index]
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn item_mut(&mut self, index: usize) -> &mut BookItem {
        &mut self.items[index]
    }

    /// Replace the item at `index`, returning the old one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_item(&mut self, index: usize, item: BookItem) -> BookItem {
        std::mem::replace(&mut self.items[index], item)
    }

    pub fn items(&self) -> &[BookItem] {
        &self.items
    }

    /// The live item sequence; edits go straight into the book.
    pub fn items_mut(&mut self) -> &mut Vec<BookItem> {
        &mut self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Point the book at data source `source_id`, using `active_person` as the
    /// subject of items whose stored subject can no longer be trusted.
    ///
    /// Subject ids only mean something inside the data source they came from.
    /// When the sources differ, every item gets `active_person`; otherwise only
    /// items without a subject do.
    pub fn rebind_subjects(&mut self, source_id: &str, active_person: &str) -> SourceMatch {
        let matched = if self.data_source_id == source_id {
            SourceMatch::Same
        } else {
            SourceMatch::Different {
                previous: std::mem::replace(&mut self.data_source_id, source_id.to_string()),
            }
        };

        for item in &mut self.items {
            let options = item.option_set_mut();
            if matched != SourceMatch::Same || options.person_id().is_empty() {
                options.set_person_id(active_person);
            }
        }

        matched
    }
}
