//! Book list parsing.
//!
//! The document is read as a stream of open/close events. Each open pushes a
//! frame holding the partially built record; each close pops it and hands the
//! finished record to the frame below.

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use tracing::warn;

use crate::book::{Book, BookItem};
use crate::codec::{OptionValue, Scalar, decode};
use crate::error::{Error, Result};
use crate::registry::ItemRegistry;

/// Result of parsing a book list document.
#[derive(Debug, Default)]
pub struct ParsedBookList {
    pub books: BTreeMap<String, Book>,
    /// Item names that were not in the registry, in document order.
    pub unknown_items: Vec<String>,
}

/// Parse a book list document, binding items against `registry`.
///
/// Any error aborts the whole parse.
pub fn parse_booklist(content: &str, registry: &ItemRegistry) -> Result<ParsedBookList> {
    let mut reader = Reader::from_str(strip_bom(content));
    let config = reader.config_mut();
    config.trim_text(true);
    config.expand_empty_elements = true;

    let mut parsed = ParsedBookList::default();
    let mut stack: Vec<Frame> = Vec::new();
    let mut seen_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let frame = match stack.last_mut() {
                    None => open_root(&e, &mut seen_root)?,
                    Some(parent) => open_child(&e, parent, registry, &mut parsed)?,
                };
                stack.push(frame);
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(unbalanced)?;
                close(frame, stack.last_mut(), &mut parsed)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::Structure("document ends inside an open element".into()));
    }
    if !seen_root {
        return Err(Error::Structure("no <booklist> element".into()));
    }

    Ok(parsed)
}

// ----------------------------------------------------------------------------
// Frames
// ----------------------------------------------------------------------------

enum Frame {
    List,
    Book(Book),
    Item(PendingItem),
    Option(PendingOption),
    /// `listitem`, `person` or `style`: fully handled when opened.
    Leaf,
    /// Unknown element; everything inside it is skipped.
    Ignored,
}

struct PendingItem {
    item: BookItem,
    options: Vec<(String, OptionValue)>,
    person_id: Option<String>,
    style_name: Option<String>,
}

struct PendingOption {
    name: String,
    value: OptionValue,
    declared_len: Option<usize>,
}

fn open_root(e: &BytesStart<'_>, seen_root: &mut bool) -> Result<Frame> {
    let name = e.name();
    if name.as_ref() != b"booklist" {
        return Err(Error::Structure(format!(
            "expected <booklist>, found <{}>",
            String::from_utf8_lossy(name.as_ref())
        )));
    }
    if *seen_root {
        return Err(Error::Structure("more than one <booklist> element".into()));
    }
    *seen_root = true;
    Ok(Frame::List)
}

fn open_child(
    e: &BytesStart<'_>,
    parent: &mut Frame,
    registry: &ItemRegistry,
    parsed: &mut ParsedBookList,
) -> Result<Frame> {
    let qname = e.name();
    let tag = qname.as_ref();

    if matches!(parent, Frame::Ignored) {
        return Ok(Frame::Ignored);
    }

    let attrs = Attrs::read(e)?;

    match (tag, parent) {
        (b"book", Frame::List) => {
            let mut book = Book::new(attrs.require("book", "name")?);
            book.set_data_source_id(attrs.require("book", "database")?);
            Ok(Frame::Book(book))
        }
        (b"item", Frame::Book(book)) => {
            let item_name = attrs.require("item", "name")?;
            let item = match BookItem::try_from_registry(registry, item_name) {
                Some(item) => item,
                None => {
                    warn!(item = item_name, book = book.name(), "book item is not registered");
                    parsed.unknown_items.push(item_name.to_string());
                    BookItem::unregistered(item_name)
                }
            };
            Ok(Frame::Item(PendingItem {
                item,
                options: Vec::new(),
                person_id: None,
                style_name: None,
            }))
        }
        (b"option", Frame::Item(_)) => {
            let name = attrs.require("option", "name")?.to_string();
            let option = match attrs.get("length") {
                Some(length) => {
                    let declared = length.trim().parse::<usize>().map_err(|_| {
                        Error::Structure(format!("option `{name}` has invalid length `{length}`"))
                    })?;
                    PendingOption {
                        name,
                        value: OptionValue::List(Vec::new()),
                        declared_len: Some(declared),
                    }
                }
                None => PendingOption {
                    name,
                    value: OptionValue::Scalar(read_typed(&attrs, "option")?),
                    declared_len: None,
                },
            };
            Ok(Frame::Option(option))
        }
        (
            b"listitem",
            Frame::Option(PendingOption {
                name,
                value: OptionValue::List(elements),
                ..
            }),
        ) => {
            if let Some(number) = attrs.get("number") {
                let position = number.trim().parse::<usize>().ok();
                if position != Some(elements.len()) {
                    return Err(Error::Structure(format!(
                        "listitem number `{number}` of option `{name}` arrives at position {}",
                        elements.len()
                    )));
                }
            }
            elements.push(read_typed(&attrs, "listitem")?);
            Ok(Frame::Leaf)
        }
        (b"person", Frame::Item(pending)) => {
            pending.person_id = Some(attrs.require("person", "gramps_id")?.to_string());
            Ok(Frame::Leaf)
        }
        (b"style", Frame::Item(pending)) => {
            pending.style_name = Some(attrs.require("style", "name")?.to_string());
            Ok(Frame::Leaf)
        }
        (b"booklist" | b"book" | b"item" | b"option" | b"listitem" | b"person" | b"style", _) => {
            Err(Error::Structure(format!(
                "<{}> is not allowed here",
                String::from_utf8_lossy(tag)
            )))
        }
        _ => Ok(Frame::Ignored),
    }
}

fn close(frame: Frame, parent: Option<&mut Frame>, parsed: &mut ParsedBookList) -> Result<()> {
    match frame {
        Frame::Option(option) => {
            if let (Some(declared), OptionValue::List(elements)) = (option.declared_len, &option.value)
                && declared != elements.len()
            {
                return Err(Error::ListMismatch {
                    option: option.name,
                    declared,
                    found: elements.len(),
                });
            }
            let Some(Frame::Item(pending)) = parent else {
                return Err(unbalanced());
            };
            pending.options.push((option.name, option.value));
        }
        Frame::Item(pending) => {
            let mut item = pending.item;
            let options = item.option_set_mut();
            options.merge_options(pending.options);
            if let Some(person_id) = pending.person_id {
                options.set_person_id(person_id);
            }
            if let Some(style_name) = pending.style_name {
                item.set_style_name(style_name);
            }
            let Some(Frame::Book(book)) = parent else {
                return Err(unbalanced());
            };
            book.append_item(item);
        }
        Frame::Book(book) => {
            parsed.books.insert(book.name().to_string(), book);
        }
        Frame::List | Frame::Leaf | Frame::Ignored => {}
    }
    Ok(())
}

fn unbalanced() -> Error {
    Error::Structure("unbalanced element nesting".into())
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

/// Unescaped attributes of one element.
struct Attrs(Vec<(String, String)>);

impl Attrs {
    fn read(e: &BytesStart<'_>) -> Result<Self> {
        let mut pairs = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let raw = std::str::from_utf8(&attr.value)?;
            pairs.push((key, unescape(raw)?.into_owned()));
        }
        Ok(Self(pairs))
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn require(&self, element: &'static str, attribute: &'static str) -> Result<&str> {
        self.get(attribute)
            .ok_or(Error::MissingAttribute { element, attribute })
    }
}

fn read_typed(attrs: &Attrs, element: &'static str) -> Result<Scalar> {
    let tag = attrs.require(element, "type")?;
    let value = attrs.require(element, "value")?;
    Ok(decode(tag, value)?)
}

fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}
