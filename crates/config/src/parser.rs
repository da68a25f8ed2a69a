//! crates/config/src/parser.rs
//! Line-oriented parser for INI-style configuration files.
//!
//! ```ini
//! # comment
//! [foo]
//! bar = 42
//! description: a value that
//!     continues on the next line
//!
//! [bar]
//! magic=0xDEADBEAF
//! ```

use std::path::Path;

use crate::document::Document;
use crate::error::ConfigError;

pub(crate) struct Parser<'a> {
    input: &'a str,
    path: &'a Path,
    line_number: usize,
}

/// Option most recently assigned, used to attach continuation lines.
struct Cursor {
    section: String,
    option: Option<String>,
}

impl<'a> Parser<'a> {
    pub(crate) const fn new(input: &'a str, path: &'a Path) -> Self {
        Self {
            input,
            path,
            line_number: 0,
        }
    }

    pub(crate) fn parse(&mut self) -> Result<Document, ConfigError> {
        let mut document = Document::default();
        let mut cursor: Option<Cursor> = None;

        for line in self.input.lines() {
            self.line_number += 1;
            let trimmed = line.trim();

            // Comments only count when they start in the first column.
            if trimmed.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with(char::is_whitespace) {
                if let Some(Cursor {
                    section,
                    option: Some(option),
                }) = &cursor
                {
                    if let Some(value) = document.section_mut_or_insert(section).get_mut(option) {
                        value.push('\n');
                        value.push_str(trimmed);
                        continue;
                    }
                }
            }

            if trimmed.starts_with('[') {
                let name = self.parse_header(trimmed)?;
                document.section_mut_or_insert(name);
                cursor = Some(Cursor {
                    section: name.to_owned(),
                    option: None,
                });
                continue;
            }

            let Some(current) = cursor.as_mut() else {
                return Err(ConfigError::parse_error(
                    self.path,
                    self.line_number,
                    "option appears before any section header",
                ));
            };

            let (key, value) = self.parse_option(trimmed)?;
            document
                .section_mut_or_insert(&current.section)
                .set(key.as_str(), value);
            current.option = Some(key);
        }

        Ok(document)
    }

    fn parse_header<'l>(&self, trimmed: &'l str) -> Result<&'l str, ConfigError> {
        let end = trimmed.find(']').ok_or_else(|| {
            ConfigError::parse_error(self.path, self.line_number, "unterminated section header")
        })?;

        let name = trimmed[1..end].trim();
        if name.is_empty() {
            return Err(ConfigError::parse_error(
                self.path,
                self.line_number,
                "section name must be non-empty",
            ));
        }

        let trailing = trimmed[end + 1..].trim();
        if !trailing.is_empty() && !trailing.starts_with('#') && !trailing.starts_with(';') {
            return Err(ConfigError::parse_error(
                self.path,
                self.line_number,
                "unexpected content after section header",
            ));
        }

        Ok(name)
    }

    fn parse_option(&self, trimmed: &str) -> Result<(String, String), ConfigError> {
        let delimiter = trimmed.find(['=', ':']).ok_or_else(|| {
            ConfigError::parse_error(
                self.path,
                self.line_number,
                "expected 'key = value' or 'key: value' format",
            )
        })?;

        let key = trimmed[..delimiter].trim();
        if key.is_empty() {
            return Err(ConfigError::parse_error(
                self.path,
                self.line_number,
                "option name must be non-empty",
            ));
        }

        let value = strip_inline_comment(trimmed[delimiter + 1..].trim());
        let value = if value == "\"\"" { "" } else { value };

        Ok((key.to_lowercase(), value.to_owned()))
    }
}

/// Drops a `;` comment that is preceded by whitespace.
fn strip_inline_comment(value: &str) -> &str {
    let mut previous_is_space = false;
    for (index, ch) in value.char_indices() {
        if ch == ';' && previous_is_space {
            return value[..index].trim_end();
        }
        previous_is_space = ch.is_whitespace();
    }
    value
}
