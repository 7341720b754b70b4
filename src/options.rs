use std::collections::BTreeMap;

use crate::codec::OptionValue;

/// Option values for one book item, as produced by a registry factory.
///
/// Keys are kept sorted so that a book list written twice yields identical bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSet {
    item_label: String,
    options: BTreeMap<String, OptionValue>,
    person_id: String,
    stylesheet_save_file: String,
}

impl OptionSet {
    pub fn new(item_label: impl Into<String>) -> Self {
        Self {
            item_label: item_label.into(),
            ..Default::default()
        }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn with_stylesheet_save_file(mut self, file: impl Into<String>) -> Self {
        self.stylesheet_save_file = file.into();
        self
    }

    pub fn item_label(&self) -> &str {
        &self.item_label
    }

    pub fn options(&self) -> &BTreeMap<String, OptionValue> {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut BTreeMap<String, OptionValue> {
        &mut self.options
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    /// Set a single option, returning the value it replaced.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Option<OptionValue> {
        self.options.insert(name.into(), value.into())
    }

    /// Merge stored values over the current ones.
    ///
    /// Keys absent from `values` keep whatever the factory put there.
    pub fn merge_options(&mut self, values: impl IntoIterator<Item = (String, OptionValue)>) {
        self.options.extend(values);
    }

    /// Identifier of the subject record (person) this item reports on; empty when unset.
    pub fn person_id(&self) -> &str {
        &self.person_id
    }

    pub fn set_person_id(&mut self, person_id: impl Into<String>) {
        self.person_id = person_id.into();
    }

    /// File where the item's style sheets are stored.
    pub fn stylesheet_save_file(&self) -> &str {
        &self.stylesheet_save_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Scalar;

    #[test]
    fn test_merge_keeps_defaults() {
        let mut set = OptionSet::new("Ancestors")
            .with_option("a", 1)
            .with_option("b", 2);

        set.merge_options([("a".to_string(), OptionValue::from(99))]);

        assert_eq!(set.get("a"), Some(&OptionValue::from(99)));
        assert_eq!(set.get("b"), Some(&OptionValue::from(2)));
    }

    #[test]
    fn test_set_returns_previous() {
        let mut set = OptionSet::new("Timeline").with_option("sort", "name");
        let previous = set.set("sort", "date");

        assert_eq!(previous, Some(OptionValue::Scalar(Scalar::from("name"))));
        assert_eq!(set.get("sort").and_then(|v| v.as_scalar()), Some(&Scalar::from("date")));
    }

    #[test]
    fn test_person_id_defaults_empty() {
        let mut set = OptionSet::default();
        assert!(set.person_id().is_empty());
        set.set_person_id("I0001");
        assert_eq!(set.person_id(), "I0001");
    }
}
