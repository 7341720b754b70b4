//! The user's saved books, persisted to a single XML file.
//!
//! # Format
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <booklist>
//!   <book name="Family" database="family.grdb">
//!     <item name="ancestor_report">
//!       <option name="max_gen" type="int" value="10"/>
//!       <option name="filters" length="2">
//!         <listitem number="0" type="str" value="all"/>
//!         <listitem number="1" type="str" value="living"/>
//!       </option>
//!       <person gramps_id="I0001"/>
//!       <style name="default"/>
//!     </item>
//!   </book>
//! </booklist>
//! ```
//!
//! Loading is forgiving: a missing or unreadable file gives an empty list.
//! [`BookList::status`] tells the cases apart.

mod parser;
mod writer;

pub use parser::{ParsedBookList, parse_booklist};
pub use writer::generate_booklist;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::book::Book;
use crate::config;
use crate::error::{Error, Result};
use crate::registry::ItemRegistry;

/// How the backing file looked when the list was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    /// No file yet.
    Missing,
    /// The file exists but could not be read or parsed; the list starts empty.
    Corrupt { reason: String },
}

/// Named books backed by one file.
#[derive(Debug)]
pub struct BookList {
    path: PathBuf,
    books: BTreeMap<String, Book>,
    status: LoadStatus,
    unknown_items: Vec<String>,
}

impl BookList {
    /// Open `filename` in the per-user configuration directory.
    pub fn open(filename: &str, registry: &ItemRegistry) -> Self {
        Self::open_at(config::resolve(filename), registry)
    }

    /// Open the book list stored at `path`.
    ///
    /// Never fails. When the file cannot be loaded the list is empty and
    /// [`BookList::status`] says why.
    pub fn open_at(path: impl Into<PathBuf>, registry: &ItemRegistry) -> Self {
        let path = path.into();
        match Self::try_open_at(&path, registry) {
            Ok(list) => list,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not load book list, starting empty");
                Self {
                    path,
                    books: BTreeMap::new(),
                    status: LoadStatus::Corrupt {
                        reason: e.to_string(),
                    },
                    unknown_items: Vec::new(),
                }
            }
        }
    }

    /// Open the book list stored at `path`, reporting read and parse errors.
    ///
    /// A missing file is not an error; it gives an empty list with
    /// [`LoadStatus::Missing`].
    pub fn try_open_at(path: impl Into<PathBuf>, registry: &ItemRegistry) -> Result<Self> {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no book list file yet");
                return Ok(Self {
                    path,
                    books: BTreeMap::new(),
                    status: LoadStatus::Missing,
                    unknown_items: Vec::new(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let parsed = parse_booklist(&content, registry)?;
        debug!(path = %path.display(), books = parsed.books.len(), "loaded book list");

        Ok(Self {
            path,
            books: parsed.books,
            status: LoadStatus::Loaded,
            unknown_items: parsed.unknown_items,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Item names met while loading that the registry did not know.
    ///
    /// Those items were loaded with [`crate::BookItem::unregistered`]; their stored
    /// name and options are kept and written back on save.
    pub fn unknown_items(&self) -> &[String] {
        &self.unknown_items
    }

    pub fn book(&self, name: &str) -> Option<&Book> {
        self.books.get(name)
    }

    pub fn book_mut(&mut self, name: &str) -> Option<&mut Book> {
        self.books.get_mut(name)
    }

    /// Add or replace the book stored under `name`, returning the one replaced.
    ///
    /// The stored book is renamed to `name`.
    pub fn set_book(&mut self, name: impl Into<String>, mut book: Book) -> Option<Book> {
        let name = name.into();
        book.set_name(name.as_str());
        self.books.insert(name, book)
    }

    /// Remove the book stored under `name`.
    pub fn delete_book(&mut self, name: &str) -> Result<Book> {
        self.books
            .remove(name)
            .ok_or_else(|| Error::BookNotFound(name.to_string()))
    }

    /// Book names in sorted order.
    pub fn book_names(&self) -> Vec<&str> {
        self.books.keys().map(String::as_str).collect()
    }

    pub fn books(&self) -> &BTreeMap<String, Book> {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// The document [`BookList::save`] would write.
    pub fn to_xml(&self) -> Result<String> {
        generate_booklist(&self.books)
    }

    /// Overwrite the backing file with the current books.
    ///
    /// The parent directory is created when needed. The file is rewritten in
    /// place, so a failure part way through can leave it truncated.
    pub fn save(&self) -> Result<()> {
        let xml = self.to_xml()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, xml)?;
        debug!(path = %self.path.display(), books = self.books.len(), "saved book list");
        Ok(())
    }
}
