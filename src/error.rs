//! Error types for book list operations.

use thiserror::Error;

use crate::codec::DecodeError;

/// Errors that can occur while loading, saving or editing book definitions.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Invalid XML escape: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Option decoding error: {0}")]
    Decode(#[from] DecodeError),

    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Malformed book list: {0}")]
    Structure(String),

    #[error("List option `{option}` declares {declared} elements but has {found}")]
    ListMismatch {
        option: String,
        declared: usize,
        found: usize,
    },

    #[error("Text {0:?} contains a character XML 1.0 cannot store")]
    UnwritableText(String),

    #[error("No book named `{0}`")]
    BookNotFound(String),

    #[error("Item `{0}` is already registered")]
    DuplicateItem(String),
}

pub type Result<T> = std::result::Result<T, Error>;
