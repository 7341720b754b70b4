//! Stock report items available to the command-line tool.

use std::io::{self, Write};

use crate::codec::Scalar;
use crate::error::Result;
use crate::options::OptionSet;
use crate::registry::{ItemRegistration, ItemRegistry};
use crate::render::ItemJob;

pub const CATEGORY_TITLE: &str = "Title";
pub const CATEGORY_TEXT: &str = "Text";
pub const CATEGORY_GRAPHICS: &str = "Graphics";

/// Registry holding the stock item kinds.
pub fn stock_registry() -> Result<ItemRegistry> {
    let mut registry = ItemRegistry::new();

    registry.register(ItemRegistration::new(
        "title_page",
        CATEGORY_TITLE,
        "Title Page",
        write_outline,
        |label: &str| {
            base_options(label, "title_page")
                .with_option("title", "")
                .with_option("subtitle", "")
                .with_option("footer", "")
        },
    ))?;
    registry.register(ItemRegistration::new(
        "ancestor_report",
        CATEGORY_TEXT,
        "Ahnentafel Report",
        write_outline,
        |label: &str| {
            base_options(label, "ancestor_report")
                .with_option("max_gen", 10)
                .with_option("pagebbg", false)
        },
    ))?;
    registry.register(ItemRegistration::new(
        "descendant_report",
        CATEGORY_TEXT,
        "Descendant Report",
        write_outline,
        |label: &str| base_options(label, "descendant_report").with_option("max_gen", 10),
    ))?;
    registry.register(ItemRegistration::new(
        "family_group",
        CATEGORY_TEXT,
        "Family Group Report",
        write_outline,
        |label: &str| {
            base_options(label, "family_group")
                .with_option("recursive", false)
                .with_option("include_events", vec![Scalar::from("birth"), Scalar::from("death")])
        },
    ))?;
    registry.register(ItemRegistration::new(
        "timeline",
        CATEGORY_GRAPHICS,
        "Timeline Chart",
        write_outline,
        |label: &str| {
            base_options(label, "timeline")
                .with_option("sort", "name")
                .with_option("title", "")
        },
    ))?;

    Ok(registry)
}

fn base_options(label: &str, name: &str) -> OptionSet {
    OptionSet::new(label).with_stylesheet_save_file(format!("{name}.xml"))
}

/// Plain-text outline of one item: what would be rendered, for whom, and how.
pub fn write_outline(job: &ItemJob<'_>, out: &mut dyn Write) -> io::Result<()> {
    let item = job.item;
    let options = item.option_set();

    if job.new_page {
        writeln!(out)?;
    }
    writeln!(out, "{}. {} [{}]", job.index + 1, item.label(), item.category())?;
    if item.category() != CATEGORY_TITLE {
        let person = match options.person_id() {
            "" => "(none)",
            id => id,
        };
        writeln!(out, "   subject: {person}")?;
    }
    writeln!(out, "   style: {}", item.style_name())?;
    for (name, value) in options.options() {
        writeln!(out, "   {name} = {value}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{Book, BookItem};
    use crate::render::render_book;

    #[test]
    fn test_stock_registry_contents() {
        let registry = stock_registry().unwrap();

        assert_eq!(registry.len(), 5);
        assert_eq!(
            registry.categories(),
            vec![CATEGORY_TITLE, CATEGORY_TEXT, CATEGORY_GRAPHICS]
        );
        let ancestors = registry.lookup("ancestor_report").unwrap().make_options();
        assert_eq!(ancestors.stylesheet_save_file(), "ancestor_report.xml");
        assert_eq!(ancestors.item_label(), "Ahnentafel Report");
    }

    #[test]
    fn test_outline() {
        let registry = stock_registry().unwrap();
        let mut book = Book::new("Smith family");
        book.append_item(BookItem::from_registry(&registry, "title_page"));
        let mut ancestors = BookItem::from_registry(&registry, "ancestor_report");
        ancestors.option_set_mut().set_person_id("I0001");
        book.append_item(ancestors);

        let mut out = Vec::new();
        render_book(&book, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("1. Title Page [Title]\n   style: default\n"));
        assert!(text.contains("\n\n2. Ahnentafel Report [Text]\n   subject: I0001\n"));
        assert!(text.contains("   max_gen = 10\n"));
        assert!(text.contains("   pagebbg = False\n"));
    }
}
