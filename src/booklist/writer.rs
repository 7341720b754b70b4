//! Book list serialization.

use std::borrow::Cow;
use std::collections::BTreeMap;

use quick_xml::escape::escape;

use crate::book::{Book, BookItem};
use crate::codec::{OptionValue, Scalar, encode};
use crate::error::{Error, Result};

/// Render a whole book list as an XML document.
///
/// Books are written under their map key, not [`Book::name`]. Text holding a
/// character XML 1.0 cannot represent, such as a control character other than
/// tab, CR or LF, is rejected with [`Error::UnwritableText`].
pub fn generate_booklist(books: &BTreeMap<String, Book>) -> Result<String> {
    let mut xml = String::new();

    xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<booklist>\n");

    for (name, book) in books {
        xml.push_str(&format!(
            "  <book name=\"{}\" database=\"{}\">\n",
            escape_attr(name)?,
            escape_attr(book.data_source_id())?
        ));
        for item in book.items() {
            write_item(&mut xml, item)?;
        }
        xml.push_str("  </book>\n");
    }

    xml.push_str("</booklist>\n");
    Ok(xml)
}

fn write_item(xml: &mut String, item: &BookItem) -> Result<()> {
    xml.push_str(&format!("    <item name=\"{}\">\n", escape_attr(item.saved_name())?));

    let options = item.option_set();
    for (name, value) in options.options() {
        match value {
            OptionValue::Scalar(scalar) => {
                xml.push_str(&format!(
                    "      <option name=\"{}\" {}/>\n",
                    escape_attr(name)?,
                    typed_attrs(scalar)?
                ));
            }
            OptionValue::List(elements) => {
                xml.push_str(&format!(
                    "      <option name=\"{}\" length=\"{}\">\n",
                    escape_attr(name)?,
                    elements.len()
                ));
                for (index, element) in elements.iter().enumerate() {
                    xml.push_str(&format!(
                        "        <listitem number=\"{}\" {}/>\n",
                        index,
                        typed_attrs(element)?
                    ));
                }
                xml.push_str("      </option>\n");
            }
        }
    }

    xml.push_str(&format!(
        "      <person gramps_id=\"{}\"/>\n",
        escape_attr(options.person_id())?
    ));
    xml.push_str(&format!(
        "      <style name=\"{}\"/>\n",
        escape_attr(item.style_name())?
    ));
    xml.push_str("    </item>\n");
    Ok(())
}

fn typed_attrs(value: &Scalar) -> Result<String> {
    let (tag, text) = encode(value);
    Ok(format!("type=\"{}\" value=\"{}\"", tag, escape_attr(&text)?))
}

/// Escape for a double-quoted attribute. Whitespace controls become character
/// references so readers that normalize attribute values keep them.
fn escape_attr(s: &str) -> Result<Cow<'_, str>> {
    if s.chars().any(is_forbidden) {
        return Err(Error::UnwritableText(s.to_string()));
    }
    let escaped = escape(s);
    if escaped.contains(['\n', '\r', '\t']) {
        Ok(Cow::Owned(
            escaped
                .replace('\n', "&#10;")
                .replace('\r', "&#13;")
                .replace('\t', "&#9;"),
        ))
    } else {
        Ok(escaped)
    }
}

/// Characters outside the XML 1.0 `Char` production.
fn is_forbidden(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("plain").unwrap(), "plain");
        assert_eq!(escape_attr("a \"b\" & <c>").unwrap(), "a &quot;b&quot; &amp; &lt;c&gt;");
        assert_eq!(escape_attr("line\nbreak\tand tab").unwrap(), "line&#10;break&#9;and tab");
    }

    #[test]
    fn test_control_characters_are_rejected() {
        assert!(matches!(escape_attr("bell\u{7}"), Err(Error::UnwritableText(_))));
        assert!(matches!(escape_attr("\u{1}"), Err(Error::UnwritableText(_))));
        assert!(escape_attr("\u{7f} and \u{85}").is_ok());

        let mut item = BookItem::clear();
        item.option_set_mut().set("note", "start\u{1b}[0m");
        let mut book = Book::new("b");
        book.append_item(item);
        let books = BTreeMap::from([("b".to_string(), book)]);

        let err = generate_booklist(&books).unwrap_err();
        assert!(matches!(err, Error::UnwritableText(text) if text == "start\u{1b}[0m"));
    }

    #[test]
    fn test_unregistered_item_written_under_stored_name() {
        let mut book = Book::new("b");
        book.append_item(BookItem::unregistered("retired"));
        let books = BTreeMap::from([("b".to_string(), book)]);

        assert!(generate_booklist(&books).unwrap().contains("<item name=\"retired\">"));
    }

    #[test]
    fn test_typed_attrs() {
        assert_eq!(typed_attrs(&Scalar::Int(3)).unwrap(), "type=\"int\" value=\"3\"");
        assert_eq!(typed_attrs(&Scalar::Bool(false)).unwrap(), "type=\"bool\" value=\"False\"");
    }

    #[test]
    fn test_empty_booklist() {
        assert_eq!(
            generate_booklist(&BTreeMap::new()).unwrap(),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<booklist>\n</booklist>\n"
        );
    }

    #[test]
    fn test_item_layout() {
        let mut item = BookItem::clear();
        item.option_set_mut().set("count", 3);
        item.option_set_mut()
            .set("tags", vec![Scalar::from("x"), Scalar::from("y")]);
        item.option_set_mut().set_person_id("I0001");

        let mut book = Book::new("Family");
        book.set_data_source_id("family.grdb");
        book.append_item(item);

        let mut books = BTreeMap::new();
        books.insert("Family".to_string(), book);

        let expected = r#"<?xml version="1.0" encoding="utf-8"?>
<booklist>
  <book name="Family" database="family.grdb">
    <item name="">
      <option name="count" type="int" value="3"/>
      <option name="tags" length="2">
        <listitem number="0" type="str" value="x"/>
        <listitem number="1" type="str" value="y"/>
      </option>
      <person gramps_id="I0001"/>
      <style name="default"/>
    </item>
  </book>
</booklist>
"#;
        assert_eq!(generate_booklist(&books).unwrap(), expected);
    }
}
