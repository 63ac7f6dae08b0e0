//! Path expressions addressing values inside nested configuration data
//!
//! A path is an ordered list of segments. Its textual form joins segments
//! with [`ConfigPath::SEPARATOR`]; that text is the key used for command-line
//! and environment lookups, so the separator must never change.
//!
//! Whether a segment addresses a map key or a sequence index is decided when
//! resolving, from the runtime kind of the node being indexed.

use std::fmt;

/// One step of a [`ConfigPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    /// Segment text as it appears in the joined path
    pub fn as_text(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Segment::Key(key) => std::borrow::Cow::Borrowed(key),
            Segment::Index(index) => std::borrow::Cow::Owned(index.to_string()),
        }
    }

    /// Sequence index this segment names, if it reads as one
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(index) => Some(*index),
            Segment::Key(key) => key.parse().ok(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// An ordered sequence of path segments
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ConfigPath {
    segments: Vec<Segment>,
}

impl ConfigPath {
    /// Separator joining segments in the textual form
    pub const SEPARATOR: char = '_';

    /// The empty (root) path
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse textual form, splitting on the separator
    ///
    /// Leading and trailing separators are trimmed and empty segments are
    /// dropped. Every segment is kept as a key; numeric keys are interpreted
    /// as indices when they meet a sequence.
    pub fn parse(text: &str) -> Self {
        let segments = text
            .trim_matches(Self::SEPARATOR)
            .split(Self::SEPARATOR)
            .filter(|part| !part.is_empty())
            .map(|part| Segment::Key(part.to_string()))
            .collect();
        Self { segments }
    }

    /// A new path with `key` appended as a single segment
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.into()));
        Self { segments }
    }

    /// A new path with every segment of `tail` appended
    pub fn append(&self, tail: &ConfigPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(tail.segments.iter().cloned());
        Self { segments }
    }

    /// A new path with a sequence index appended
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Textual form with every separator rendered as `.`, used in error
    /// messages
    pub fn dotted(&self) -> String {
        self.to_string().replace(Self::SEPARATOR, ".")
    }

    fn join(&self, separator: &str) -> String {
        self.segments
            .iter()
            .map(|segment| segment.as_text())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(&Self::SEPARATOR.to_string()))
    }
}

impl From<&str> for ConfigPath {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for ConfigPath {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<&ConfigPath> for ConfigPath {
    fn from(path: &ConfigPath) -> Self {
        path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_trims_separators() {
        let path = ConfigPath::parse("_Hobbies_Sports_First_");
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.to_string(), "Hobbies_Sports_First");
        assert_eq!(path.dotted(), "Hobbies.Sports.First");
    }

    #[test]
    fn test_child_keeps_underscored_key_whole() {
        let path = ConfigPath::root().child("database").child("max_connections");
        assert_eq!(path.segments().len(), 2);
        assert_eq!(path.to_string(), "database_max_connections");
        assert_eq!(path.dotted(), "database.max.connections");
    }

    #[test]
    fn test_append_parsed_tail() {
        let path = ConfigPath::root()
            .child("Service")
            .append(&ConfigPath::parse("Hobbies_Sports_First"));
        assert_eq!(path.segments().len(), 4);
        assert_eq!(path.to_string(), "Service_Hobbies_Sports_First");
        assert_eq!(ConfigPath::root().append(&ConfigPath::root()), ConfigPath::root());
    }

    #[test]
    fn test_index_segment() {
        let path = ConfigPath::root().child("servers").index(2).child("host");
        assert_eq!(path.to_string(), "servers_2_host");
        assert_eq!(path.segments()[1].as_index(), Some(2));
        assert_eq!(Segment::Key("7".into()).as_index(), Some(7));
        assert_eq!(Segment::Key("seven".into()).as_index(), None);
    }

    #[test]
    fn test_empty_path() {
        assert!(ConfigPath::parse("").is_empty());
        assert!(ConfigPath::parse("___").is_empty());
        assert_eq!(ConfigPath::root().to_string(), "");
    }

    proptest! {
        #[test]
        fn prop_parse_display_round_trip(parts in prop::collection::vec("[A-Za-z0-9]{1,8}", 1..6)) {
            let text = parts.join("_");
            let path = ConfigPath::parse(&text);
            prop_assert_eq!(path.segments().len(), parts.len());
            prop_assert_eq!(path.to_string(), text);
        }
    }
}
