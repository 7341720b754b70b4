//! Driving item writers over a book.
//!
//! Documents and page layout belong to the writers; this module only walks the
//! book in order and tells each writer whether it starts a new page.

use std::io::Write;

use tracing::{debug, warn};

use crate::book::{Book, BookItem};
use crate::error::Result;

/// What a writer receives for one item of the book.
#[derive(Debug, Clone, Copy)]
pub struct ItemJob<'a> {
    /// Position of the item in the book.
    pub index: usize,
    pub item: &'a BookItem,
    /// Every rendered item after the first begins on a new page.
    pub new_page: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub rendered: usize,
    /// Positions of items that had no writer.
    pub skipped: Vec<usize>,
}

/// Jobs for every item that has a writer, in book order.
pub fn plan(book: &Book) -> Vec<ItemJob<'_>> {
    let mut jobs = Vec::with_capacity(book.len());
    for (index, item) in book.items().iter().enumerate() {
        if item.writer().is_none() {
            continue;
        }
        jobs.push(ItemJob {
            index,
            item,
            new_page: !jobs.is_empty(),
        });
    }
    jobs
}

/// Run each item's writer against `out`.
pub fn render_book(book: &Book, out: &mut dyn Write) -> Result<RenderSummary> {
    let mut summary = RenderSummary::default();

    for (index, item) in book.items().iter().enumerate() {
        if item.writer().is_none() {
            warn!(book = book.name(), index, "skipping book item with no registered writer");
            summary.skipped.push(index);
        }
    }

    for job in plan(book) {
        if let Some(writer) = job.item.writer() {
            debug!(item = job.item.name(), index = job.index, new_page = job.new_page, "rendering book item");
            writer.write_item(&job, &mut *out)?;
            summary.rendered += 1;
        }
    }

    Ok(summary)
}
