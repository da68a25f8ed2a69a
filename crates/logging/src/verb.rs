//! crates/logging/src/verb.rs
//! Splits an operation message into a verb and a remainder and inflects the verb.
//!
//! The inflection is a deliberately small heuristic: a trailing `e` is dropped
//! and `ing`/`ed` appended. Irregular verbs, doubled consonants and verbs
//! ending in `y` come out wrong ("Sum" gives "Suming"/"sumed"); messages are
//! expected to be phrased so the output reads well.

use thiserror::Error;

/// Error returned when an operation message has no words.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("operation message must not be empty")]
pub struct EmptyMessage;

/// A message split into the parts used to build the start, completion and failure lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageDescriptor {
    verb: String,
    verb_stem: String,
    remainder: String,
}

impl MessageDescriptor {
    /// Splits `message` at its first whitespace boundary.
    ///
    /// ```
    /// use logging::MessageDescriptor;
    ///
    /// let descriptor = MessageDescriptor::parse("Print some nice words")?;
    /// assert_eq!(descriptor.verb(), "print");
    /// assert_eq!(descriptor.remainder(), "some nice words");
    /// assert_eq!(descriptor.starting_line(), "Printing some nice words.");
    /// assert_eq!(descriptor.completed_line(), "Some nice words printed.");
    /// assert_eq!(descriptor.failed_line(), "Cannot print some nice words.");
    /// # Ok::<(), logging::EmptyMessage>(())
    /// ```
    pub fn parse(message: &str) -> Result<Self, EmptyMessage> {
        let message = message.trim();
        if message.is_empty() {
            return Err(EmptyMessage);
        }

        let (verb, remainder) = message
            .split_once(char::is_whitespace)
            .map_or((message, ""), |(verb, rest)| (verb, rest.trim_start()));

        let verb = verb.to_lowercase();
        let verb_stem = verb.strip_suffix('e').unwrap_or(verb.as_str()).to_owned();

        Ok(Self {
            verb,
            verb_stem,
            remainder: remainder.to_owned(),
        })
    }

    /// The lower-cased first word.
    #[must_use]
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// The verb without a trailing `e`.
    #[must_use]
    pub fn verb_stem(&self) -> &str {
        &self.verb_stem
    }

    /// Everything after the verb, or an empty string for one-word messages.
    #[must_use]
    pub fn remainder(&self) -> &str {
        &self.remainder
    }

    /// `stem + "ing"`.
    #[must_use]
    pub fn present_participle(&self) -> String {
        format!("{}ing", self.verb_stem)
    }

    /// `stem + "ed"`, derived from the stem, never from the present participle.
    #[must_use]
    pub fn past_participle(&self) -> String {
        format!("{}ed", self.verb_stem)
    }

    /// Line logged when the operation starts, e.g. `"Printing some nice words."`.
    #[must_use]
    pub fn starting_line(&self) -> String {
        let participle = capitalize(&self.present_participle());
        if self.remainder.is_empty() {
            format!("{participle}.")
        } else {
            format!("{participle} {}.", self.remainder)
        }
    }

    /// Line logged when the operation completes, e.g. `"Some nice words printed."`.
    ///
    /// A one-word message uses the verb itself as the subject: `"Print printed."`.
    #[must_use]
    pub fn completed_line(&self) -> String {
        let subject = if self.remainder.is_empty() {
            &self.verb
        } else {
            &self.remainder
        };
        format!("{} {}.", capitalize(subject), self.past_participle())
    }

    /// Line logged when the operation fails, e.g. `"Cannot print some nice words."`.
    #[must_use]
    pub fn failed_line(&self) -> String {
        if self.remainder.is_empty() {
            format!("Cannot {}.", self.verb)
        } else {
            format!("Cannot {} {}.", self.verb, self.remainder)
        }
    }
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
