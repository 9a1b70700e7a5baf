//! Color mapping: ordered literal find/replace pairs
//!
//! A mapping is written as `"#FFAA00=#112233,#000000=#FFFFFF"`. Pairs are
//! applied one after another to the raw document text, so a later pair sees
//! the output of the earlier ones.

use std::fmt;
use std::str::FromStr;

use log::debug;

/// How `from` tokens are matched against the document text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMatch {
    /// Byte-exact, case-sensitive matching
    #[default]
    Exact,
    /// ASCII letters match regardless of case; other characters match exactly
    IgnoreAsciiCase,
}

/// An ordered sequence of `(from, to)` substitutions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorMapping {
    pairs: Vec<(String, String)>,
}

impl ColorMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the `from=to,from=to` form.
    ///
    /// Entries that do not split into exactly two tokens on `=`, or whose
    /// `from` token is empty, are skipped.
    pub fn parse(text: &str) -> Self {
        let mut mapping = Self::new();

        for entry in text.split(',') {
            let tokens: Vec<&str> = entry.split('=').collect();
            if tokens.len() != 2 {
                debug!("skipping malformed color pair {:?}", entry);
                continue;
            }

            let from = tokens[0].trim();
            let to = tokens[1].trim();
            if from.is_empty() {
                debug!("skipping color pair with empty source {:?}", entry);
                continue;
            }

            mapping.pairs.push((from.to_string(), to.to_string()));
        }

        mapping
    }

    /// Append a pair, returning the mapping for chaining
    pub fn with_pair(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.push(from, to);
        self
    }

    /// Append a pair. Empty `from` tokens are ignored.
    pub fn push(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        if from.is_empty() {
            return;
        }
        self.pairs.push((from, to.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// The pairs in application order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(f, t)| (f.as_str(), t.as_str()))
    }

    /// Apply every pair in order to `text`.
    ///
    /// Matching covers the whole text, not only color attributes: ids,
    /// path data and comments are rewritten too.
    pub fn apply(&self, text: &str, matching: ColorMatch) -> String {
        let mut data = text.to_string();
        for (from, to) in &self.pairs {
            data = match matching {
                ColorMatch::Exact => data.replace(from.as_str(), to),
                ColorMatch::IgnoreAsciiCase => replace_ignore_ascii_case(&data, from, to),
            };
        }
        data
    }
}

impl FromStr for ColorMapping {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for ColorMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (from, to)) in self.pairs.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", from, to)?;
        }
        Ok(())
    }
}

impl<F: Into<String>, T: Into<String>> FromIterator<(F, T)> for ColorMapping {
    fn from_iter<I: IntoIterator<Item = (F, T)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (from, to) in iter {
            mapping.push(from, to);
        }
        mapping
    }
}

/// Replace all non-overlapping occurrences of `from`, comparing ASCII
/// letters case-insensitively.
///
/// ASCII lowercasing keeps byte offsets stable, so matches found in the
/// lowered copy splice directly into the original.
fn replace_ignore_ascii_case(haystack: &str, from: &str, to: &str) -> String {
    let lowered = haystack.to_ascii_lowercase();
    let needle = from.to_ascii_lowercase();

    let mut result = String::with_capacity(haystack.len());
    let mut last = 0;
    for (start, _) in lowered.match_indices(needle.as_str()) {
        result.push_str(&haystack[last..start]);
        result.push_str(to);
        last = start + needle.len();
    }
    result.push_str(&haystack[last..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_pairs_in_order() {
        let mapping = ColorMapping::parse("#FFAA00=#112233,#000000=#FFFFFF");
        let pairs: Vec<_> = mapping.pairs().collect();
        assert_eq!(pairs, vec![("#FFAA00", "#112233"), ("#000000", "#FFFFFF")]);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let mapping = ColorMapping::parse("  red = blue ,\tgreen=  yellow ");
        let pairs: Vec<_> = mapping.pairs().collect();
        assert_eq!(pairs, vec![("red", "blue"), ("green", "yellow")]);
    }

    #[test]
    fn test_parse_skips_malformed_pair() {
        let mapping = ColorMapping::parse("red=blue,bad,green=yellow");
        let pairs: Vec<_> = mapping.pairs().collect();
        assert_eq!(pairs, vec![("red", "blue"), ("green", "yellow")]);
    }

    #[test]
    fn test_parse_skips_pair_with_extra_equals() {
        let mapping = ColorMapping::parse("a=b=c,d=e");
        let pairs: Vec<_> = mapping.pairs().collect();
        assert_eq!(pairs, vec![("d", "e")]);
    }

    #[test]
    fn test_parse_skips_empty_source() {
        let mapping = ColorMapping::parse("=blue, =red,x=");
        let pairs: Vec<_> = mapping.pairs().collect();
        assert_eq!(pairs, vec![("x", "")]);
    }

    #[test]
    fn test_parse_empty_string() {
        assert!(ColorMapping::parse("").is_empty());
    }

    #[test]
    fn test_sequential_substitution() {
        let mapping = ColorMapping::new().with_pair("A", "B").with_pair("B", "C");
        assert_eq!(mapping.apply("A", ColorMatch::Exact), "C");
    }

    #[test]
    fn test_exact_is_case_sensitive() {
        let mapping = ColorMapping::parse("#ffaa00=#112233");
        let text = r##"<path fill="#FFAA00"/><path fill="#ffaa00"/>"##;
        assert_eq!(
            mapping.apply(text, ColorMatch::Exact),
            r##"<path fill="#FFAA00"/><path fill="#112233"/>"##
        );
    }

    #[test]
    fn test_ignore_case_matches_both() {
        let mapping = ColorMapping::parse("#ffaa00=#112233");
        let text = r##"<path fill="#FFAA00"/><path fill="#ffAa00"/>"##;
        assert_eq!(
            mapping.apply(text, ColorMatch::IgnoreAsciiCase),
            r##"<path fill="#112233"/><path fill="#112233"/>"##
        );
    }

    #[test]
    fn test_ignore_case_keeps_non_ascii_text() {
        let mapping = ColorMapping::parse("RED=blue");
        assert_eq!(
            mapping.apply("é red ü Red", ColorMatch::IgnoreAsciiCase),
            "é blue ü blue"
        );
    }

    #[test]
    fn test_substitution_reaches_ids() {
        let mapping = ColorMapping::parse("red=blue");
        assert_eq!(
            mapping.apply(r#"<g id="red-layer"/>"#, ColorMatch::Exact),
            r#"<g id="blue-layer"/>"#
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let mapping = ColorMapping::parse(" a = b ,c=d");
        assert_eq!(mapping.to_string(), "a=b,c=d");
        assert_eq!(ColorMapping::parse(&mapping.to_string()), mapping);
    }

    #[test]
    fn test_from_iterator_skips_empty_source() {
        let mapping: ColorMapping = vec![("", "x"), ("a", "b")].into_iter().collect();
        assert_eq!(mapping.len(), 1);
    }
}
