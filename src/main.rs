//! bookreport - manage and outline saved report books

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use bookreport::{Book, BookList, ItemRegistry, LoadStatus, SourceMatch, catalog, config, render_book};

#[derive(Parser)]
#[command(name = "bookreport")]
#[command(version, about = "Manage saved report books", long_about = None)]
#[command(after_help = "EXAMPLES:
    bookreport list                       List saved books
    bookreport show Family --json         Show a book as JSON
    bookreport outline Family -o out.txt  Outline every item of a book")]
struct Cli {
    /// Book list file (defaults to books.xml in the user config directory)
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List saved books
    List,
    /// Show the items of a book
    Show {
        name: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the item kinds that can be added to a book
    Items,
    /// Delete a book
    Delete { name: String },
    /// Save a copy of a book under a new name
    Copy { from: String, to: String },
    /// Run every item of a book through its writer
    Outline {
        name: String,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Data source the outline is made for
        #[arg(long, requires = "person")]
        source: Option<String>,
        /// Subject to use when the book's own subjects do not apply
        #[arg(long, requires = "source")]
        person: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let registry = catalog::stock_registry().map_err(|e| e.to_string())?;
    let path = cli
        .file
        .unwrap_or_else(|| config::resolve(config::BOOKS_FILENAME));
    let mut books = BookList::open_at(path, &registry);

    if let LoadStatus::Corrupt { reason } = books.status() {
        eprintln!("warning: {} could not be loaded: {reason}", books.path().display());
    }
    for name in books.unknown_items() {
        eprintln!("warning: book item `{name}` is not a known item kind");
    }

    match cli.command {
        Command::List => {
            for name in books.book_names() {
                println!("{name}");
            }
            Ok(())
        }
        Command::Show { name, json } => {
            let book = find(&books, &name)?;
            if json {
                let view = BookView::new(&name, book);
                let text = serde_json::to_string_pretty(&view).map_err(|e| e.to_string())?;
                println!("{text}");
            } else {
                show(&name, book);
            }
            Ok(())
        }
        Command::Items => {
            list_items(&registry);
            Ok(())
        }
        Command::Delete { name } => {
            books.delete_book(&name).map_err(|e| e.to_string())?;
            books.save().map_err(|e| e.to_string())
        }
        Command::Copy { from, to } => {
            let copy = find(&books, &from)?.clone();
            books.set_book(to, copy);
            books.save().map_err(|e| e.to_string())
        }
        Command::Outline {
            name,
            output,
            source,
            person,
        } => {
            let mut book = find(&books, &name)?.clone();
            if let (Some(source), Some(person)) = (source, person)
                && let SourceMatch::Different { previous } = book.rebind_subjects(&source, &person)
            {
                eprintln!(
                    "warning: book was made for data source `{previous}`; using subject {person} for every item"
                );
            }
            outline(&book, output).map_err(|e| e.to_string())
        }
    }
}

fn find<'a>(books: &'a BookList, name: &str) -> Result<&'a Book, String> {
    books
        .book(name)
        .ok_or_else(|| format!("no book named `{name}`"))
}

fn show(name: &str, book: &Book) {
    println!("Book: {name}");
    println!("Data source: {}", book.data_source_id());
    println!("Items: {}", book.len());
    for (i, item) in book.items().iter().enumerate() {
        let person = if item.category() == catalog::CATEGORY_TITLE {
            "Not Applicable"
        } else {
            item.option_set().person_id()
        };
        let label = if item.is_cleared() {
            format!("(unknown item `{}`)", item.saved_name())
        } else {
            item.label().to_string()
        };
        println!("  {}. {label} [{}] subject={person} style={}", i + 1, item.category(), item.style_name());
    }
}

fn list_items(registry: &ItemRegistry) {
    for category in registry.categories() {
        println!("{category}:");
        for entry in registry.iter().filter(|e| e.category == category) {
            println!("  {:<20} {}", entry.name, entry.label);
        }
    }
}

fn outline(book: &Book, output: Option<PathBuf>) -> bookreport::Result<()> {
    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    let summary = render_book(book, &mut out)?;
    out.flush()?;
    if !summary.skipped.is_empty() {
        eprintln!("warning: skipped {} item(s) with no writer", summary.skipped.len());
    }
    Ok(())
}

#[derive(Serialize)]
struct BookView<'a> {
    name: &'a str,
    data_source: &'a str,
    items: Vec<ItemView<'a>>,
}

#[derive(Serialize)]
struct ItemView<'a> {
    name: &'a str,
    category: &'a str,
    person: &'a str,
    style: &'a str,
    options: Vec<(&'a str, String)>,
}

impl<'a> BookView<'a> {
    fn new(name: &'a str, book: &'a Book) -> Self {
        let items = book
            .items()
            .iter()
            .map(|item| ItemView {
                name: item.saved_name(),
                category: item.category(),
                person: item.option_set().person_id(),
                style: item.style_name(),
                options: item
                    .option_set()
                    .options()
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.to_string()))
                    .collect(),
            })
            .collect();
        Self {
            name,
            data_source: book.data_source_id(),
            items,
        }
    }
}
