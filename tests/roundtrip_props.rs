//! Property tests: any book list survives serialization unchanged.

use std::collections::BTreeMap;
use std::io::{self, Write};

use bookreport::booklist::{generate_booklist, parse_booklist};
use bookreport::{Book, BookItem, ItemJob, ItemRegistration, ItemRegistry, OptionSet, OptionValue, Scalar};
use proptest::prelude::*;

fn noop(_job: &ItemJob<'_>, _out: &mut dyn Write) -> io::Result<()> {
    Ok(())
}

const KINDS: [&str; 3] = ["title", "ancestors", "timeline"];

fn registry() -> ItemRegistry {
    let mut registry = ItemRegistry::new();
    for kind in KINDS {
        registry
            .register(ItemRegistration::new(kind, "Text", kind, noop, |label: &str| {
                OptionSet::new(label).with_option("default", true)
            }))
            .unwrap();
    }
    registry
}

fn text() -> impl Strategy<Value = String> {
    "[ -~äöüßЖ\t\n]{0,12}"
}

fn scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        text().prop_map(Scalar::Str),
        any::<i64>().prop_map(Scalar::Int),
        any::<f64>()
            .prop_filter("finite", |v| v.is_finite())
            .prop_map(Scalar::Float),
        any::<bool>().prop_map(Scalar::Bool),
    ]
}

fn option_value() -> impl Strategy<Value = OptionValue> {
    prop_oneof![
        scalar().prop_map(OptionValue::Scalar),
        prop::collection::vec(scalar(), 0..5).prop_map(OptionValue::List),
    ]
}

#[derive(Debug, Clone)]
struct ItemSpec {
    kind: usize,
    options: Vec<(String, OptionValue)>,
    person: String,
    style: String,
}

fn item_spec() -> impl Strategy<Value = ItemSpec> {
    (
        0..KINDS.len(),
        prop::collection::vec(("[a-z_]{1,8}", option_value()), 0..5),
        "(I[0-9]{4})?",
        text(),
    )
        .prop_map(|(kind, options, person, style)| ItemSpec {
            kind,
            options,
            person,
            style,
        })
}

fn build_books(
    registry: &ItemRegistry,
    specs: Vec<(String, String, Vec<ItemSpec>)>,
) -> BTreeMap<String, Book> {
    let mut books = BTreeMap::new();
    for (name, source, items) in specs {
        let mut book = Book::new(name.clone());
        book.set_data_source_id(source);
        for spec in items {
            let mut item = BookItem::from_registry(registry, KINDS[spec.kind]);
            item.option_set_mut().merge_options(spec.options);
            item.option_set_mut().set_person_id(spec.person);
            item.set_style_name(spec.style);
            book.append_item(item);
        }
        books.insert(name, book);
    }
    books
}

proptest! {
    #[test]
    fn prop_booklist_round_trips(
        specs in prop::collection::vec(
            (text(), text(), prop::collection::vec(item_spec(), 0..4)),
            0..4,
        )
    ) {
        let registry = registry();
        let books = build_books(&registry, specs);

        let xml = generate_booklist(&books).unwrap();
        let parsed = parse_booklist(&xml, &registry).unwrap();

        prop_assert!(parsed.unknown_items.is_empty());
        prop_assert_eq!(&parsed.books, &books);
        prop_assert_eq!(generate_booklist(&parsed.books).unwrap(), xml);
    }
}
