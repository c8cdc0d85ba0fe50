//! Milestone references.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A milestone given either by number or by exact title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MilestoneRef {
    Number(u64),
    Name(String),
}

impl MilestoneRef {
    /// Parse user input: digit-only strings are numbers, anything else a name.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        input
            .parse::<u64>()
            .map_or_else(|_| Self::Name(input.to_string()), Self::Number)
    }

    /// Normalize a name that is really a number (e.g. `name: "12"`).
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::Name(name) => Self::parse(&name),
            number @ Self::Number(_) => number,
        }
    }
}

impl fmt::Display for MilestoneRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "#{number}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// The `milestone:` section: `{ number: 3 }` or `{ name: "Ballot 1" }`.
///
/// `number` wins when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl MilestoneSpec {
    #[must_use]
    pub fn to_ref(&self) -> Option<MilestoneRef> {
        if let Some(number) = self.number {
            return Some(MilestoneRef::Number(number));
        }
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(MilestoneRef::parse)
    }
}
