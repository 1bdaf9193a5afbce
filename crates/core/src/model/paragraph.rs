use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── ROLE ──────────────────────────────────────────────────────────────────────
//

/// Functional role a paragraph plays within a passage.
///
/// The named variants mirror the fixed list offered to the learner; any
/// expert-authored label outside that list is preserved verbatim in
/// `Unknown` instead of silently mismatching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Context,
    Background,
    HistoricalViewpoint,
    CurrentStrategy,
    CounterPoint,
    AlternativeHypothesis,
    Rebuttal,
    Evidence,
    SupportingEvidence,
    SupportingDetail,
    Hypothesis,
    Limitation,
    Conclusion,
    Unknown(String),
}

impl Role {
    /// The fixed list of roles offered to the learner, in display order.
    pub const OFFERED: [Role; 13] = [
        Role::Context,
        Role::Background,
        Role::HistoricalViewpoint,
        Role::CurrentStrategy,
        Role::CounterPoint,
        Role::AlternativeHypothesis,
        Role::Rebuttal,
        Role::Evidence,
        Role::SupportingEvidence,
        Role::SupportingDetail,
        Role::Hypothesis,
        Role::Limitation,
        Role::Conclusion,
    ];

    /// Returns the human-readable label for this role.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Role::Context => "Context",
            Role::Background => "Background",
            Role::HistoricalViewpoint => "Historical Viewpoint",
            Role::CurrentStrategy => "Current Strategy",
            Role::CounterPoint => "Counter-point",
            Role::AlternativeHypothesis => "Alternative Hypothesis",
            Role::Rebuttal => "Rebuttal",
            Role::Evidence => "Evidence",
            Role::SupportingEvidence => "Supporting Evidence",
            Role::SupportingDetail => "Supporting Detail",
            Role::Hypothesis => "Hypothesis",
            Role::Limitation => "Limitation",
            Role::Conclusion => "Conclusion",
            Role::Unknown(label) => label,
        }
    }
}

impl From<String> for Role {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Context" => Role::Context,
            "Background" => Role::Background,
            "Historical Viewpoint" => Role::HistoricalViewpoint,
            "Current Strategy" => Role::CurrentStrategy,
            "Counter-point" => Role::CounterPoint,
            "Alternative Hypothesis" => Role::AlternativeHypothesis,
            "Rebuttal" => Role::Rebuttal,
            "Evidence" => Role::Evidence,
            "Supporting Evidence" => Role::SupportingEvidence,
            "Supporting Detail" => Role::SupportingDetail,
            "Hypothesis" => Role::Hypothesis,
            "Limitation" => Role::Limitation,
            "Conclusion" => Role::Conclusion,
            _ => Role::Unknown(label),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.label().to_owned()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

//
// ─── PARAGRAPH ─────────────────────────────────────────────────────────────────
//

/// One structural segment of a passage, as tagged by the analysis gateway.
///
/// `pivots` holds the rhetorical transition words found in `text`, in order
/// of appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub role: Role,
    pub summary: String,
    #[serde(default)]
    pub pivots: Vec<String>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_known_labels() {
        for role in Role::OFFERED {
            let label = role.label().to_owned();
            assert_eq!(Role::from(label), role);
        }
    }

    #[test]
    fn role_preserves_unknown_labels() {
        let role = Role::from("Authorial Aside".to_owned());
        assert_eq!(role, Role::Unknown("Authorial Aside".to_owned()));
        assert_eq!(role.label(), "Authorial Aside");
    }

    #[test]
    fn role_serializes_as_plain_label() {
        let json = serde_json::to_string(&Role::CounterPoint).unwrap();
        assert_eq!(json, "\"Counter-point\"");

        let parsed: Role = serde_json::from_str("\"Historical Viewpoint\"").unwrap();
        assert_eq!(parsed, Role::HistoricalViewpoint);
    }

    #[test]
    fn paragraph_deserializes_without_pivots() {
        let json = r#"{"text":"Some text.","role":"Context","summary":"Intro."}"#;
        let paragraph: Paragraph = serde_json::from_str(json).unwrap();
        assert_eq!(paragraph.role, Role::Context);
        assert!(paragraph.pivots.is_empty());
    }
}
