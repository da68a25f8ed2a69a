//! crates/config/src/document.rs
//! Ordered section/option storage shared by the parser and the store.

/// Name of the section whose options are inherited by every other section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// A named section holding options in first-insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Section {
    name: String,
    options: Vec<(String, String)>,
}

impl Section {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn get(&self, option: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(key, _)| key == option)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn contains(&self, option: &str) -> bool {
        self.options.iter().any(|(key, _)| key == option)
    }

    /// Inserts or overrides an option. Overriding keeps the original position.
    pub(crate) fn set(&mut self, option: impl Into<String>, value: impl Into<String>) {
        let option = option.into();
        let value = value.into();
        match self.options.iter_mut().find(|(key, _)| *key == option) {
            Some(slot) => slot.1 = value,
            None => self.options.push((option, value)),
        }
    }

    pub(crate) fn get_mut(&mut self, option: &str) -> Option<&mut String> {
        self.options
            .iter_mut()
            .find(|(key, _)| key == option)
            .map(|(_, value)| value)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|(key, _)| key.as_str())
    }
}

/// Parsed configuration: the `DEFAULT` section plus named sections in file order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Document {
    defaults: Section,
    sections: Vec<Section>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            defaults: Section::new(DEFAULT_SECTION),
            sections: Vec::new(),
        }
    }
}

impl Document {
    pub(crate) const fn defaults(&self) -> &Section {
        &self.defaults
    }

    pub(crate) fn defaults_mut(&mut self) -> &mut Section {
        &mut self.defaults
    }

    pub(crate) fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub(crate) fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Returns the section with `name`, creating it at the end when absent.
    pub(crate) fn section_mut_or_insert(&mut self, name: &str) -> &mut Section {
        if name == DEFAULT_SECTION {
            return &mut self.defaults;
        }
        let index = match self.sections.iter().position(|section| section.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }

    pub(crate) fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Overlays `other` onto `self`; later values win, new sections append.
    pub(crate) fn merge(&mut self, other: Self) {
        for (key, value) in other.defaults.options {
            self.defaults.set(key, value);
        }
        for section in other.sections {
            let target = self.section_mut_or_insert(&section.name);
            for (key, value) in section.options {
                target.set(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overrides_in_place() {
        let mut section = Section::new("foo");
        section.set("a", "1");
        section.set("b", "2");
        section.set("a", "3");
        let pairs: Vec<_> = section.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn merge_appends_new_sections_and_overrides_existing_options() {
        let mut base = Document::default();
        base.section_mut_or_insert("foo").set("bar", "42");
        base.section_mut_or_insert("bar").set("magic", "0xDEADBEAF");

        let mut overlay = Document::default();
        overlay.section_mut_or_insert("baz").set("x", "1");
        overlay.section_mut_or_insert("foo").set("bar", "43");
        overlay.defaults_mut().set("shared", "yes");

        base.merge(overlay);

        let names: Vec<_> = base.sections().iter().map(Section::name).collect();
        assert_eq!(names, vec!["foo", "bar", "baz"]);
        assert_eq!(base.section("foo").and_then(|s| s.get("bar")), Some("43"));
        assert_eq!(base.defaults().get("shared"), Some("yes"));
    }

    #[test]
    fn default_section_name_routes_to_defaults() {
        let mut document = Document::default();
        document
            .section_mut_or_insert(DEFAULT_SECTION)
            .set("key", "value");
        assert!(document.sections().is_empty());
        assert_eq!(document.defaults().get("key"), Some("value"));
    }
}
