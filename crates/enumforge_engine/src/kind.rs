//! Enum kinds and their control tags.

use std::fmt;
use std::str::FromStr;

use enumforge_foundation::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which build strategy an enum uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Kind {
    /// Integer associations (`name ↔ int`).
    #[default]
    Simple,
    /// Bitmask associations (`name ↔ bit`).
    Flags,
    /// Tagged union with typed payloads and pattern matching.
    Symbolic,
}

impl Kind {
    /// Every kind, in tag order.
    pub const ALL: [Kind; 3] = [Kind::Simple, Kind::Flags, Kind::Symbolic];

    /// Control tags accepted by [`Kind::from_str`].
    pub const TAGS: [&'static str; 3] = ["simple", "flags", "symbolic"];

    /// Returns the control tag of this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Flags => "flags",
            Self::Symbolic => "symbolic",
        }
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| Error::invalid_kind(tag, &Self::TAGS))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
