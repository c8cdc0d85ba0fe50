use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::tracker_link::{self, TrackerLink};
use crate::scalar;

/// Default length for [`Comment::brief_summary`].
pub const BRIEF_SUMMARY_LEN: usize = 80;

/// Where in the reviewed document a comment applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Locality {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::opt_string"
    )]
    pub clause: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::opt_string"
    )]
    pub element: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::opt_string"
    )]
    pub line_number: Option<String>,
}

impl Locality {
    /// Human-readable summary, e.g. `Clause 5.1, Table 1, Line 42`.
    ///
    /// Blank parts are left out; an empty locality yields an empty string.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(clause) = non_blank(self.clause.as_deref()) {
            parts.push(format!("Clause {clause}"));
        }
        if let Some(element) = non_blank(self.element.as_deref()) {
            parts.push(element.to_string());
        }
        if let Some(line) = non_blank(self.line_number.as_deref()) {
            parts.push(format!("Line {line}"));
        }
        parts.join(", ")
    }
}

/// One review comment plus its locality and optional tracker linkage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Comment {
    /// Externally assigned identifier, e.g. `US-001`.
    #[serde(default, deserialize_with = "scalar::string")]
    pub id: String,
    /// Submitter code, e.g. `US`.
    #[serde(default, deserialize_with = "scalar::string")]
    pub body: String,
    #[serde(default)]
    pub locality: Locality,
    /// Comment type code: `ge`, `te`, `ed`, or anything else.
    #[serde(rename = "type", default, deserialize_with = "scalar::string")]
    pub comment_type: String,
    #[serde(default, deserialize_with = "scalar::string")]
    pub comments: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::opt_string"
    )]
    pub proposed_change: Option<String>,
    /// Disposition text; never written when empty.
    #[serde(
        default,
        skip_serializing_if = "is_empty_text",
        deserialize_with = "scalar::opt_string"
    )]
    pub observations: Option<String>,
    #[serde(
        rename = "github",
        alias = "tracker_link",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "tracker_link::optional_link"
    )]
    pub tracker_link: Option<TrackerLink>,
}

impl Comment {
    /// Create a comment with `body` derived from `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            body: Self::body_from_id(&id).to_string(),
            id,
            ..Self::default()
        }
    }

    /// Submitter code of an identifier: the part before the first hyphen,
    /// or the whole identifier when it has none.
    #[must_use]
    pub fn body_from_id(id: &str) -> &str {
        id.split_once('-').map_or(id, |(body, _)| body)
    }

    #[must_use]
    pub fn has_tracker_issue(&self) -> bool {
        self.tracker_link.is_some()
    }

    #[must_use]
    pub fn tracker_issue_number(&self) -> Option<u64> {
        self.tracker_link.as_ref().map(|link| link.issue_number)
    }

    #[must_use]
    pub fn has_observations(&self) -> bool {
        non_blank(self.observations.as_deref()).is_some()
    }

    #[must_use]
    pub fn has_proposed_change(&self) -> bool {
        non_blank(self.proposed_change.as_deref()).is_some()
    }

    #[must_use]
    pub fn locality_summary(&self) -> String {
        self.locality.summary()
    }

    /// One-line description for issue titles: locality plus the first
    /// sentence of the comment text, cut to `max_len` characters.
    #[must_use]
    pub fn brief_summary(&self, max_len: usize) -> String {
        let locality = self.locality.summary();
        let sentence = first_sentence(&self.comments);

        let summary = match (locality.is_empty(), sentence.is_empty()) {
            (true, true) => String::from("No description"),
            (false, true) => locality,
            (true, false) => sentence.to_string(),
            (false, false) => format!("{locality}: {sentence}"),
        };
        truncate_chars(&summary, max_len)
    }
}

fn is_empty_text(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn first_sentence(text: &str) -> &str {
    let text = text.trim();
    let end = text
        .char_indices()
        .find(|&(index, c)| {
            c == '\n'
                || (matches!(c, '.' | '!' | '?')
                    && text[index + c.len_utf8()..].starts_with(char::is_whitespace))
        })
        .map_or(text.len(), |(index, _)| index);
    text[..end].trim().trim_end_matches('.')
}

fn truncate_chars(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    if max_len <= 3 {
        return text.chars().take(max_len).collect();
    }
    let kept: String = text.chars().take(max_len - 3).collect();
    format!("{}...", kept.trim_end())
}
