//! PropertyPath parsing and formatting.
//!
//! Grammar (simple, object-model agnostic):
//!   segment('.' segment)*   where   segment = name ('[' index ']')?
//! Examples:
//!   "Position"             -> [Position]
//!   "Items[2].Position"    -> [Items[2], Position]
//!   "Points[3]"            -> [Points[3]]  (list element target)
//!
//! Resolution against a concrete object model is left to the property target;
//! this type only validates and splits the string.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty path")]
    Empty,
    #[error("invalid property path '{path}': empty segment")]
    EmptySegment { path: String },
    #[error("invalid property path '{path}': segment contains whitespace")]
    Whitespace { path: String },
    #[error("invalid property path '{path}': malformed index in '{segment}'")]
    BadIndex { path: String, segment: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    pub name: String,
    pub index: Option<usize>,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}[{}]", self.name, i),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    /// Parse a path string according to the grammar described above.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        let mut segments = Vec::new();
        for raw in s.split('.') {
            if raw.is_empty() {
                return Err(PathError::EmptySegment { path: s.to_string() });
            }
            if raw.chars().any(char::is_whitespace) {
                return Err(PathError::Whitespace { path: s.to_string() });
            }
            segments.push(parse_segment(s, raw)?);
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Element index of the final segment, if the path targets a list element.
    pub fn last_index(&self) -> Option<usize> {
        self.segments.last().and_then(|s| s.index)
    }

    /// Canonical lookup key: the full path with the final segment's index
    /// stripped. "Items[2].Points[3]" -> "Items[2].Points".
    pub fn lookup_key(&self) -> String {
        let mut out = String::new();
        let last = self.segments.len().saturating_sub(1);
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            if i == last {
                out.push_str(&seg.name);
            } else {
                out.push_str(&seg.to_string());
            }
        }
        out
    }

    /// True when the path is exactly one unindexed segment called `name`.
    pub fn is_single(&self, name: &str) -> bool {
        matches!(self.segments.as_slice(), [seg] if seg.index.is_none() && seg.name == name)
    }
}

fn parse_segment(path: &str, raw: &str) -> Result<PathSegment, PathError> {
    let bad_index = || PathError::BadIndex {
        path: path.to_string(),
        segment: raw.to_string(),
    };
    match raw.find('[') {
        None => {
            if raw.contains(']') {
                return Err(bad_index());
            }
            Ok(PathSegment {
                name: raw.to_string(),
                index: None,
            })
        }
        Some(open) => {
            let name = &raw[..open];
            let rest = &raw[open + 1..];
            let digits = rest.strip_suffix(']').ok_or_else(bad_index)?;
            if name.is_empty() {
                return Err(PathError::EmptySegment {
                    path: path.to_string(),
                });
            }
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(bad_index());
            }
            let index = digits.parse::<usize>().map_err(|_| bad_index())?;
            Ok(PathSegment {
                name: name.to_string(),
                index: Some(index),
            })
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl FromStr for PropertyPath {
    type Err = PathError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyPath::parse(s)
    }
}

// Serde support: serialize as string, deserialize from string
impl Serialize for PropertyPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PropertyPath {
    fn deserialize<D>(deserializer: D) -> Result<PropertyPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PropertyPath::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple() {
        let p = PropertyPath::parse("Position").unwrap();
        assert_eq!(p.segments().len(), 1);
        assert!(p.is_single("Position"));
        assert_eq!(p.last_index(), None);
        assert_eq!(p.lookup_key(), "Position");
    }

    #[test]
    fn parse_indexed_nested() {
        let p = PropertyPath::parse("Items[2].Position").unwrap();
        assert_eq!(p.segments()[0].name, "Items");
        assert_eq!(p.segments()[0].index, Some(2));
        assert_eq!(p.segments()[1].name, "Position");
        assert_eq!(p.last_index(), None);
        assert_eq!(p.lookup_key(), "Items[2].Position");
        assert_eq!(p.to_string(), "Items[2].Position");
    }

    #[test]
    fn lookup_key_strips_final_index_only() {
        let p = PropertyPath::parse("Items[2].Points[3]").unwrap();
        assert_eq!(p.last_index(), Some(3));
        assert_eq!(p.lookup_key(), "Items[2].Points");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert_eq!(PropertyPath::parse(""), Err(PathError::Empty));
        assert!(PropertyPath::parse("a..b").is_err());
        assert!(PropertyPath::parse("Items[x]").is_err());
        assert!(PropertyPath::parse("Items[2").is_err());
        assert!(PropertyPath::parse("Items]").is_err());
        assert!(PropertyPath::parse("[2]").is_err());
        assert!(PropertyPath::parse("Pos ition").is_err());
        assert!(PropertyPath::parse("Items[]").is_err());
    }

    #[test]
    fn serde_as_string() {
        let p = PropertyPath::parse("Points[1]").unwrap();
        let s = serde_json::to_string(&p).unwrap();
        assert_eq!(s, "\"Points[1]\"");
        let back: PropertyPath = serde_json::from_str(&s).unwrap();
        assert_eq!(back, p);
    }
}
