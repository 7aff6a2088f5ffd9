//! Identifiers and small value types shared across the reader.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable identity of a page in the narrative graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u32);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Reading orientation. Only affects how scroll offsets map to pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Pages stack top to bottom; the page extent is the screen height.
    #[default]
    Vertical,
    /// Pages run left to right; the page extent is the screen width.
    Horizontal,
}

impl Orientation {
    #[must_use]
    pub fn is_vertical(self) -> bool {
        self == Self::Vertical
    }

    /// The persisted `readingMode` value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            other => Err(format!("unknown reading mode {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_parses_trimmed_decimal() {
        assert_eq!(" 12 ".parse::<PageId>().unwrap(), PageId(12));
        assert!("twelve".parse::<PageId>().is_err());
    }

    #[test]
    fn test_orientation_round_trips_reading_mode_strings() {
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            assert_eq!(orientation.as_str().parse::<Orientation>(), Ok(orientation));
        }
        assert!("diagonal".parse::<Orientation>().is_err());
    }

    #[test]
    fn test_page_id_serializes_as_bare_number() {
        assert_eq!(serde_json::to_string(&PageId(7)).unwrap(), "7");
    }
}
