//! Disposition-based cell shading.

use std::sync::LazyLock;

use regex::Regex;

/// Background colors applied to the observations cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingColor {
    OliveGreen,
    Green,
    Blue,
    Pink,
    LightGray,
}

impl ShadingColor {
    /// Hex fill value as written into the document.
    #[must_use]
    pub const fn fill(self) -> &'static str {
        match self {
            Self::OliveGreen => "C2D69B",
            Self::Green => "92D050",
            Self::Blue => "8DB3E2",
            Self::Pink => "F2DBDB",
            Self::LightGray => "D9D9D9",
        }
    }
}

static RULES: LazyLock<Vec<(Regex, ShadingColor)>> = LazyLock::new(|| {
    [
        (r"(?i)\bawm\b|\baccept\w* with modifications?", ShadingColor::OliveGreen),
        (r"(?i)\baccept", ShadingColor::Green),
        (r"(?i)\bnoted\b", ShadingColor::Blue),
        (r"(?i)\breject", ShadingColor::Pink),
        (r"(?i)\btodo\b", ShadingColor::LightGray),
    ]
    .into_iter()
    .filter_map(|(pattern, color)| Regex::new(pattern).ok().map(|re| (re, color)))
    .collect()
});

/// Color for an observation, decided by the first matching rule.
#[must_use]
pub fn shading_for(observation: &str) -> Option<ShadingColor> {
    RULES
        .iter()
        .find(|(re, _)| re.is_match(observation))
        .map(|(_, color)| *color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifications_win_over_plain_accept() {
        assert_eq!(shading_for("AWM"), Some(ShadingColor::OliveGreen));
        assert_eq!(
            shading_for("Accepted with modifications: see 6.1"),
            Some(ShadingColor::OliveGreen)
        );
        assert_eq!(shading_for("accept with modification"), Some(ShadingColor::OliveGreen));
    }

    #[test]
    fn remaining_rules_in_order() {
        assert_eq!(shading_for("Accepted, see clause 6"), Some(ShadingColor::Green));
        assert_eq!(shading_for("ACCEPT"), Some(ShadingColor::Green));
        assert_eq!(shading_for("Noted."), Some(ShadingColor::Blue));
        assert_eq!(shading_for("Rejected: out of scope"), Some(ShadingColor::Pink));
        assert_eq!(shading_for("TODO discuss"), Some(ShadingColor::LightGray));
    }

    #[test]
    fn word_forms_of_accept_and_reject() {
        assert_eq!(shading_for("Accepts the proposal"), Some(ShadingColor::Green));
        assert_eq!(shading_for("Acceptance in principle"), Some(ShadingColor::Green));
        assert_eq!(shading_for("Rejects, see N123"), Some(ShadingColor::Pink));
        assert_eq!(shading_for("Accepts with modification"), Some(ShadingColor::OliveGreen));
    }

    #[test]
    fn no_rule_matches() {
        assert_eq!(shading_for("Under discussion"), None);
        assert_eq!(shading_for(""), None);
        assert_eq!(shading_for("unaccepted"), None);
    }

    #[test]
    fn fills_are_hex() {
        assert_eq!(ShadingColor::Green.fill(), "92D050");
        assert!(
            [
                ShadingColor::OliveGreen,
                ShadingColor::Blue,
                ShadingColor::Pink,
                ShadingColor::LightGray,
            ]
            .iter()
            .all(|c| c.fill().len() == 6)
        );
    }
}
