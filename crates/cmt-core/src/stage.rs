//! Review-process stages.
//!
//! ```text
//! WD → CD → DIS → FDIS → PRF → PUB
//! ```
//!
//! Sheets produced by other tooling sometimes carry project-specific stage
//! names; those survive as [`Stage::Custom`].

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The review-process phase a comment sheet belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Working draft.
    Wd,
    /// Committee draft.
    Cd,
    /// Draft international standard.
    Dis,
    /// Final draft international standard.
    Fdis,
    /// Proof.
    Prf,
    /// Published.
    Pub,
    Custom(String),
}

impl Stage {
    /// The well-known stages in process order.
    pub const KNOWN: [Self; 6] = [
        Self::Wd,
        Self::Cd,
        Self::Dis,
        Self::Fdis,
        Self::Prf,
        Self::Pub,
    ];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Wd => "WD",
            Self::Cd => "CD",
            Self::Dis => "DIS",
            Self::Fdis => "FDIS",
            Self::Prf => "PRF",
            Self::Pub => "PUB",
            Self::Custom(name) => name,
        }
    }

    /// Whether this is one of the fixed process stages.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    /// Parse a stage name. Known stages match case-insensitively; anything
    /// else is kept verbatim as a custom stage.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        Self::KNOWN
            .into_iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(name))
            .unwrap_or_else(|| Self::Custom(name.to_string()))
    }
}

impl FromStr for Stage {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Stage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Stage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = crate::scalar::string(deserializer)?;
        Ok(Self::parse(&name))
    }
}

/// Decode an optional stage; blank values count as unset.
pub(crate) fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<Stage>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(crate::scalar::opt_string(deserializer)?
        .filter(|name| !name.trim().is_empty())
        .map(|name| Stage::parse(&name)))
}
