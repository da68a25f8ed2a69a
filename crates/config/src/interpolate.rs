//! crates/config/src/interpolate.rs
//! Expansion of `%(name)s` references against a section and the `DEFAULT` section.

use crate::document::{Document, Section};
use crate::error::ConfigError;

/// Maximum nesting of references before expansion gives up.
pub const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Resolved view of a document together with the values that failed to expand.
///
/// A value that cannot be expanded keeps its raw text in `document`, so it
/// stays listed by section and option enumeration. Only a lookup of that
/// value reports the failure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub(crate) document: Document,
    unresolved: Vec<Unresolved>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Unresolved {
    section: String,
    option: String,
    message: String,
}

impl Resolved {
    /// The expansion error recorded for `option` of `section`, if any.
    ///
    /// `option` must already be lower-cased.
    pub(crate) fn failure(&self, section: &str, option: &str) -> Option<ConfigError> {
        self.unresolved
            .iter()
            .find(|entry| entry.section == section && entry.option == option)
            .map(Unresolved::to_error)
    }

    /// The first expansion error recorded for any option of `section`.
    pub(crate) fn first_failure_in(&self, section: &str) -> Option<ConfigError> {
        self.unresolved
            .iter()
            .find(|entry| entry.section == section)
            .map(Unresolved::to_error)
    }
}

impl Unresolved {
    fn to_error(&self) -> ConfigError {
        ConfigError::Interpolation {
            section: self.section.clone(),
            option: self.option.clone(),
            message: self.message.clone(),
        }
    }
}

/// Builds the resolved view of `raw`.
///
/// Every named section in the result contains its own options followed by the
/// inherited `DEFAULT` options it does not override, all expanded in the
/// context of that section. The `DEFAULT` section is expanded in its own
/// context. Expansion failures are recorded per value and never abort the
/// whole document.
pub(crate) fn resolve(raw: &Document) -> Resolved {
    let defaults = raw.defaults();
    let mut document = Document::default();
    let mut unresolved = Vec::new();

    let mut expand_or_keep = |option: &str, value: &str, section: &Section| {
        expand(value, section, defaults).unwrap_or_else(|message| {
            unresolved.push(Unresolved {
                section: section.name().to_owned(),
                option: option.to_owned(),
                message,
            });
            value.to_owned()
        })
    };

    for (option, value) in defaults.iter() {
        let expanded = expand_or_keep(option, value, defaults);
        document.defaults_mut().set(option, expanded);
    }

    for section in raw.sections() {
        let mut out = Section::new(section.name());
        let inherited = defaults.iter().filter(|(key, _)| !section.contains(key));
        for (option, value) in section.iter().chain(inherited) {
            let expanded = expand_or_keep(option, value, section);
            out.set(option, expanded);
        }
        document.push_section(out);
    }

    Resolved {
        document,
        unresolved,
    }
}

fn expand(value: &str, section: &Section, defaults: &Section) -> Result<String, String> {
    let mut out = String::with_capacity(value.len());
    Expander { section, defaults }.expand_into(value, 1, &mut out)?;
    Ok(out)
}

struct Expander<'a> {
    section: &'a Section,
    defaults: &'a Section,
}

impl Expander<'_> {
    fn expand_into(&self, value: &str, depth: usize, out: &mut String) -> Result<(), String> {
        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(format!(
                "recursion limit exceeded ({MAX_INTERPOLATION_DEPTH}) while expanding references"
            ));
        }

        let mut rest = value;
        while let Some(percent) = rest.find('%') {
            out.push_str(&rest[..percent]);
            rest = &rest[percent..];

            if let Some(after) = rest.strip_prefix("%%") {
                out.push('%');
                rest = after;
            } else if let Some(after) = rest.strip_prefix("%(") {
                let (name, after) = after
                    .split_once(")s")
                    .filter(|(name, _)| !name.is_empty() && !name.contains(')'))
                    .ok_or_else(|| format!("bad interpolation variable reference {rest:?}"))?;
                let name = name.to_lowercase();
                let referenced = self
                    .section
                    .get(&name)
                    .or_else(|| self.defaults.get(&name))
                    .ok_or_else(|| format!("reference to missing option '{name}'"))?;
                if referenced.contains('%') {
                    self.expand_into(referenced, depth + 1, out)?;
                } else {
                    out.push_str(referenced);
                }
                rest = after;
            } else {
                return Err(format!("'%' must be followed by '%' or '(', found {rest:?}"));
            }
        }
        out.push_str(rest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use std::path::Path;

    fn resolve_str(input: &str) -> Resolved {
        let raw = Parser::new(input, Path::new("test.cfg"))
            .parse()
            .expect("parses");
        resolve(&raw)
    }

    fn value<'a>(resolved: &'a Resolved, section: &str, option: &str) -> Option<&'a str> {
        resolved.document.section(section).and_then(|s| s.get(option))
    }

    fn failure_message(resolved: &Resolved, section: &str, option: &str) -> String {
        resolved
            .failure(section, option)
            .expect("expansion failure recorded")
            .to_string()
    }

    #[test]
    fn plain_values_pass_through() {
        let resolved = resolve_str("[foo]\nbar=42\n");
        assert_eq!(value(&resolved, "foo", "bar"), Some("42"));
        assert_eq!(resolved.failure("foo", "bar").map(|e| e.to_string()), None);
    }

    #[test]
    fn references_expand_from_same_section() {
        let resolved = resolve_str("[paths]\nroot=/srv\ndata=%(root)s/data\n");
        assert_eq!(value(&resolved, "paths", "data"), Some("/srv/data"));
    }

    #[test]
    fn references_fall_back_to_defaults() {
        let resolved = resolve_str("[DEFAULT]\nroot=/srv\n[paths]\nlogs=%(root)s/logs\n");
        assert_eq!(value(&resolved, "paths", "logs"), Some("/srv/logs"));
        assert_eq!(value(&resolved, "paths", "root"), Some("/srv"));
    }

    #[test]
    fn inherited_defaults_expand_in_section_context() {
        let resolved =
            resolve_str("[DEFAULT]\nname=base\nlabel=%(name)s-label\n[a]\nname=alpha\n[b]\n");
        assert_eq!(value(&resolved, "a", "label"), Some("alpha-label"));
        assert_eq!(value(&resolved, "b", "label"), Some("base-label"));
        assert_eq!(resolved.document.defaults().get("label"), Some("base-label"));
    }

    #[test]
    fn nested_references_expand() {
        let resolved = resolve_str("[x]\na=1\nb=%(a)s2\nc=%(b)s3\n");
        assert_eq!(value(&resolved, "x", "c"), Some("123"));
    }

    #[test]
    fn double_percent_is_literal() {
        let resolved = resolve_str("[fmt]\nratio=50%%\n");
        assert_eq!(value(&resolved, "fmt", "ratio"), Some("50%"));
    }

    #[test]
    fn missing_reference_is_recorded_for_that_value() {
        let resolved = resolve_str("[x]\na=%(nope)s\nb=fine\n");
        match resolved.failure("x", "a") {
            Some(ConfigError::Interpolation {
                section,
                option,
                message,
            }) => {
                assert_eq!(section, "x");
                assert_eq!(option, "a");
                assert!(message.contains("'nope'"));
            }
            other => panic!("unexpected failure: {other:?}"),
        }
        assert!(resolved.failure("x", "b").is_none());
        assert_eq!(value(&resolved, "x", "b"), Some("fine"));
    }

    #[test]
    fn unexpandable_value_keeps_its_raw_text() {
        let resolved = resolve_str("[x]\na=100%\n");
        assert_eq!(value(&resolved, "x", "a"), Some("100%"));
    }

    #[test]
    fn lone_percent_is_a_failure() {
        let resolved = resolve_str("[x]\na=100%\n");
        assert!(failure_message(&resolved, "x", "a").contains("'%' must be followed by"));
    }

    #[test]
    fn malformed_reference_is_a_failure() {
        let resolved = resolve_str("[x]\nb=1\na=%(b)\n");
        assert!(failure_message(&resolved, "x", "a").contains("bad interpolation variable reference"));
    }

    #[test]
    fn self_reference_hits_depth_limit() {
        let resolved = resolve_str("[x]\na=%(a)s\n");
        assert!(failure_message(&resolved, "x", "a").contains("recursion limit"));
    }

    #[test]
    fn broken_default_fails_in_every_inheriting_section() {
        let resolved = resolve_str("[DEFAULT]\nbad=%(gone)s\n[a]\n[b]\nbad=own\n");
        assert!(resolved.failure("DEFAULT", "bad").is_some());
        assert!(resolved.failure("a", "bad").is_some());
        assert!(resolved.failure("b", "bad").is_none());
        assert!(resolved.first_failure_in("a").is_some());
        assert!(resolved.first_failure_in("b").is_none());
    }
}
