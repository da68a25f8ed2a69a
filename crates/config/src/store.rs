//! crates/config/src/store.rs
//! The read-only configuration store.

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::document::{DEFAULT_SECTION, Document, Section};
use crate::error::ConfigError;
use crate::interpolate::{Resolved, resolve};
use crate::parser::Parser;

static GLOBAL: OnceLock<Config> = OnceLock::new();

/// Section/option configuration loaded from one or more INI-style files.
///
/// The store is built by the application, filled with [`load`](Self::load)
/// and then only read. Lookups never mutate it, so a loaded store can be
/// shared across threads by reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    raw: Document,
    resolved: Resolved,
}

impl Config {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a store from in-memory text. `origin` is only used in error messages.
    pub fn from_str_with_origin(input: &str, origin: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = Self::new();
        config.load_str(input, origin)?;
        Ok(config)
    }

    /// Reads and merges configuration files in order.
    ///
    /// Values from later files override earlier ones for the same
    /// (section, option) pair. When any file fails to read or parse the store
    /// keeps its previous contents. A value whose `%(name)s` references cannot
    /// be expanded does not fail the load; only looking that value up does.
    pub fn load<I, P>(&mut self, paths: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut raw = self.raw.clone();
        for path in paths {
            let path = path.as_ref();
            let contents = fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
            raw.merge(Parser::new(&contents, path).parse()?);
        }
        self.commit(raw);
        Ok(())
    }

    /// Merges configuration text as if it had been read from `origin`.
    pub fn load_str(&mut self, input: &str, origin: impl AsRef<Path>) -> Result<(), ConfigError> {
        let mut raw = self.raw.clone();
        raw.merge(Parser::new(input, origin.as_ref()).parse()?);
        self.commit(raw);
        Ok(())
    }

    fn commit(&mut self, raw: Document) {
        self.resolved = resolve(&raw);
        self.raw = raw;
    }

    /// Returns the value of `option` in `section`.
    ///
    /// Option names are matched case-insensitively; section names are not.
    /// Options of the `DEFAULT` section are visible from every section. A
    /// value whose references cannot be expanded fails with
    /// [`ConfigError::Interpolation`].
    pub fn get(&self, section: &str, option: &str) -> Result<&str, ConfigError> {
        let option = option.to_lowercase();
        let value = self
            .visible(section)?
            .get(&option)
            .ok_or_else(|| ConfigError::OptionNotFound {
                section: section.to_owned(),
                option: option.clone(),
            })?;
        match self.resolved.failure(section, &option) {
            Some(error) => Err(error),
            None => Ok(value),
        }
    }

    fn visible(&self, section: &str) -> Result<&Section, ConfigError> {
        if section == DEFAULT_SECTION {
            return Ok(self.resolved.document.defaults());
        }
        self.resolved
            .document
            .section(section)
            .ok_or_else(|| ConfigError::SectionNotFound {
                section: section.to_owned(),
            })
    }

    /// Returns the value of `option` in `section`, or `default` when either is missing.
    ///
    /// Passing `None` as the default asks for "no value" rather than an error.
    /// Only the two lookup misses are absorbed; an expansion failure is
    /// still returned.
    ///
    /// ```
    /// use config::Config;
    ///
    /// let config = Config::from_str_with_origin("[foo]\nbar=42\nodd=5%\n", "inline")?;
    /// assert_eq!(config.get_or("foo", "bar", Some("0"))?, Some("42"));
    /// assert_eq!(config.get_or("bar", "foo", Some("0"))?, Some("0"));
    /// assert_eq!(config.get_or("bar", "foo", None)?, None);
    /// assert!(config.get_or("foo", "odd", Some("0")).is_err());
    /// # Ok::<(), config::ConfigError>(())
    /// ```
    pub fn get_or<'a>(
        &'a self,
        section: &str,
        option: &str,
        default: Option<&'a str>,
    ) -> Result<Option<&'a str>, ConfigError> {
        match self.get(section, option) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.is_not_found() => Ok(default),
            Err(error) => Err(error),
        }
    }

    /// Interprets a value as a boolean.
    ///
    /// Accepts `1`, `yes`, `true`, `on` and `0`, `no`, `false`, `off` in any case.
    pub fn get_bool(&self, section: &str, option: &str) -> Result<bool, ConfigError> {
        let value = self.get(section, option)?;
        match value.to_ascii_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(true),
            "0" | "no" | "false" | "off" => Ok(false),
            _ => Err(invalid_value(section, option, value, "a boolean")),
        }
    }

    /// Parses a value with [`FromStr`].
    pub fn get_parsed<T>(&self, section: &str, option: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
    {
        let value = self.get(section, option)?;
        value
            .trim()
            .parse()
            .map_err(|_| invalid_value(section, option, value, std::any::type_name::<T>()))
    }

    /// Returns the option names visible in `section`, or an empty list when it does not exist.
    ///
    /// The section's own options come first, in file order, followed by the
    /// `DEFAULT` options it does not override.
    #[must_use]
    pub fn options(&self, section: &str) -> Vec<&str> {
        self.resolved
            .document
            .section(section)
            .map(|s| s.keys().collect())
            .unwrap_or_default()
    }

    /// Returns every section name in file order, excluding `DEFAULT`.
    #[must_use]
    pub fn sections(&self) -> Vec<&str> {
        self.resolved
            .document
            .sections()
            .iter()
            .map(|s| s.name())
            .collect()
    }

    /// Returns the resolved `(option, value)` pairs of `section`.
    ///
    /// Fails with the first [`ConfigError::Interpolation`] of the section when
    /// any of its visible values cannot be expanded.
    pub fn items(&self, section: &str) -> Result<Vec<(&str, &str)>, ConfigError> {
        let options = self
            .resolved
            .document
            .section(section)
            .ok_or_else(|| ConfigError::SectionNotFound {
                section: section.to_owned(),
            })?;
        if let Some(error) = self.resolved.first_failure_in(section) {
            return Err(error);
        }
        Ok(options.iter().collect())
    }

    /// Reports whether a named section exists. `DEFAULT` never counts.
    #[must_use]
    pub fn has_section(&self, section: &str) -> bool {
        self.resolved.document.section(section).is_some()
    }

    /// Reports whether `option` is visible in `section`, whether or not its value expands.
    #[must_use]
    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.visible(section)
            .is_ok_and(|options| options.contains(&option.to_lowercase()))
    }

    /// Stores this configuration as the process-wide instance.
    ///
    /// Only the first call succeeds; later calls hand the configuration back.
    pub fn install(self) -> Result<&'static Self, Self> {
        let mut candidate = Some(self);
        let installed = GLOBAL.get_or_init(|| candidate.take().unwrap_or_default());
        match candidate {
            None => Ok(installed),
            Some(rejected) => Err(rejected),
        }
    }
}

/// Returns the process-wide configuration installed with [`Config::install`].
#[must_use]
pub fn global() -> Option<&'static Config> {
    GLOBAL.get()
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::from_str_with_origin(input, "<string>")
    }
}

fn invalid_value(section: &str, option: &str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_owned(),
        option: option.to_lowercase(),
        value: value.to_owned(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "[foo]\nbar=42\n\n[bar]\nmagic=0xDEADBEAF\n";

    fn sample() -> Config {
        Config::from_str_with_origin(SAMPLE, "sample.cfg").expect("sample parses")
    }

    #[test]
    fn get_returns_value() {
        assert_eq!(sample().get("foo", "bar").expect("value"), "42");
    }

    #[test]
    fn get_matches_option_case_insensitively() {
        assert_eq!(sample().get("bar", "MAGIC").expect("value"), "0xDEADBEAF");
    }

    #[test]
    fn get_missing_section() {
        let error = sample().get("baz", "bar").expect_err("missing section");
        assert!(matches!(error, ConfigError::SectionNotFound { ref section } if section == "baz"));
    }

    #[test]
    fn get_missing_option() {
        let error = sample().get("bar", "foo").expect_err("missing option");
        assert!(matches!(
            error,
            ConfigError::OptionNotFound { ref section, ref option } if section == "bar" && option == "foo"
        ));
    }

    #[test]
    fn get_or_returns_default_for_both_misses() {
        let config = sample();
        assert_eq!(config.get_or("bar", "foo", Some("fallback")).ok(), Some(Some("fallback")));
        assert_eq!(config.get_or("nope", "foo", Some("fallback")).ok(), Some(Some("fallback")));
        assert_eq!(config.get_or("bar", "foo", None).ok(), Some(None));
        assert_eq!(config.get_or("foo", "bar", None).ok(), Some(Some("42")));
    }

    #[test]
    fn section_names_are_case_sensitive() {
        assert!(sample().get("FOO", "bar").is_err());
    }

    #[test]
    fn options_of_unknown_section_is_empty() {
        assert!(sample().options("unknown").is_empty());
        assert!(sample().options(DEFAULT_SECTION).is_empty());
    }

    #[test]
    fn options_include_inherited_defaults_last() {
        let config =
            Config::from_str_with_origin("[DEFAULT]\nshared=1\nb=0\n[foo]\nb=2\na=3\n", "d.cfg")
                .expect("parses");
        assert_eq!(config.options("foo"), vec!["b", "a", "shared"]);
        assert_eq!(config.get("foo", "b").expect("own value wins"), "2");
        assert_eq!(config.get(DEFAULT_SECTION, "b").expect("default value"), "0");
    }

    #[test]
    fn sections_in_file_order() {
        assert_eq!(sample().sections(), vec!["foo", "bar"]);
    }

    #[test]
    fn later_loads_override_earlier_ones() {
        let mut config = sample();
        config
            .load_str("[foo]\nbar=43\n[baz]\nx=1\n", "override.cfg")
            .expect("override parses");
        assert_eq!(config.get("foo", "bar").expect("value"), "43");
        assert_eq!(config.sections(), vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn failed_load_keeps_previous_contents() {
        let mut config = sample();
        let before = config.clone();
        config
            .load_str("[foo]\nbar=43\nno delimiter\n", "broken.cfg")
            .expect_err("parse fails");
        assert_eq!(config, before);
        config
            .load(["/nonexistent/opslog/app.cfg"])
            .expect_err("missing file");
        assert_eq!(config, before);
    }

    #[test]
    fn get_bool_accepts_common_spellings() {
        let config = Config::from_str_with_origin(
            "[flags]\na=yes\nb=Off\nc=1\nd=TRUE\ne=maybe\n",
            "flags.cfg",
        )
        .expect("parses");
        assert!(config.get_bool("flags", "a").expect("bool"));
        assert!(!config.get_bool("flags", "b").expect("bool"));
        assert!(config.get_bool("flags", "c").expect("bool"));
        assert!(config.get_bool("flags", "d").expect("bool"));
        let error = config.get_bool("flags", "e").expect_err("not a bool");
        assert!(matches!(error, ConfigError::InvalidValue { expected: "a boolean", .. }));
    }

    #[test]
    fn get_parsed_converts_numbers() {
        let config = Config::from_str_with_origin("[net]\nport = 8873\nratio=0.5\nbad=x\n", "net.cfg")
            .expect("parses");
        assert_eq!(config.get_parsed::<u16>("net", "port").expect("port"), 8873);
        assert!((config.get_parsed::<f64>("net", "ratio").expect("ratio") - 0.5).abs() < f64::EPSILON);
        assert!(config.get_parsed::<u16>("net", "bad").is_err());
        assert!(config.get_parsed::<u16>("net", "missing").expect_err("missing").is_not_found());
    }

    #[test]
    fn items_returns_resolved_pairs() {
        let config = Config::from_str_with_origin("[p]\nroot=/srv\ndata=%(root)s/d\n", "p.cfg")
            .expect("parses");
        assert_eq!(
            config.items("p").expect("items"),
            vec![("root", "/srv"), ("data", "/srv/d")]
        );
        assert!(config.items("q").is_err());
    }

    #[test]
    fn bad_reference_fails_only_its_own_lookup() {
        let config = Config::from_str_with_origin(
            "[app]\nname=demo\nbanner=%(missing)s!\n[other]\nkey=1\n",
            "app.cfg",
        )
        .expect("loads despite the bad reference");

        assert_eq!(config.get("app", "name").expect("value"), "demo");
        assert!(matches!(
            config.get("app", "BANNER"),
            Err(ConfigError::Interpolation { ref option, .. }) if option == "banner"
        ));
        assert_eq!(config.options("app"), vec!["name", "banner"]);
        assert!(config.has_option("app", "banner"));
        assert!(config.items("app").is_err());
        assert_eq!(config.items("other").expect("items"), vec![("key", "1")]);
        assert!(config.get_or("app", "banner", Some("x")).is_err());
    }

    #[test]
    fn later_load_can_repair_a_bad_reference() {
        let mut config: Config = "[app]\nbanner=%(who)s\n".parse().expect("loads");
        assert!(config.get("app", "banner").is_err());
        config
            .load_str("[app]\nwho=world\n", "fix.cfg")
            .expect("loads");
        assert_eq!(config.get("app", "banner").expect("expands now"), "world");
    }

    #[test]
    fn from_str_reports_pseudo_origin() {
        let error = "[foo\n".parse::<Config>().expect_err("bad header");
        assert_eq!(error.path(), Some(Path::new("<string>")));
    }

    #[test]
    fn has_section_and_option() {
        let config = sample();
        assert!(config.has_section("foo"));
        assert!(!config.has_section(DEFAULT_SECTION));
        assert!(config.has_option("foo", "bar"));
        assert!(!config.has_option("foo", "baz"));
    }
}
