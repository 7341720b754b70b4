//! # bookreport
//!
//! Book definitions for composite genealogy reports: a book is an ordered list
//! of report items, each with its own options, subject person and style. Books
//! are kept in a single XML file per user.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bookreport::{Book, BookItem, BookList, catalog};
//!
//! let registry = catalog::stock_registry()?;
//! let mut books = BookList::open("books.xml", &registry);
//!
//! let mut book = Book::new("Smith family");
//! book.set_data_source_id("/home/me/smith.grdb");
//! book.append_item(BookItem::from_registry(&registry, "title_page"));
//!
//! let mut ancestors = BookItem::from_registry(&registry, "ancestor_report");
//! ancestors.option_set_mut().set("max_gen", 6);
//! ancestors.option_set_mut().set_person_id("I0001");
//! book.append_item(ancestors);
//!
//! books.set_book("Smith family", book);
//! books.save()?;
//! # Ok::<(), bookreport::Error>(())
//! ```
//!
//! ## Item registry
//!
//! Item kinds come from an [`ItemRegistry`] that the caller builds and passes
//! in. Loading a book whose items are no longer registered does not fail: the
//! items come back cleared and their names are listed in
//! [`BookList::unknown_items`].

pub mod book;
pub mod booklist;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod options;
pub mod registry;
pub mod render;

pub use book::{Book, BookItem, SourceMatch};
pub use booklist::{BookList, LoadStatus};
pub use codec::{DecodeError, OptionValue, Scalar, TypeTag};
pub use error::{Error, Result};
pub use options::OptionSet;
pub use registry::{ItemRegistration, ItemRegistry, ItemWriter};
pub use render::{ItemJob, RenderSummary, render_book};
