//! Passage analysis gateway.
//!
//! When `TRAINER_ANALYZE_URL` is set the passage text is forwarded to the
//! external endpoint and the enveloped response is decoded. Without it a
//! deterministic local splitter produces the same paragraph shape, so the
//! rest of the flow never has to care which mode produced the breakdown.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use trainer_core::model::{Paragraph, Role};

use crate::envelope::unwrap_envelope;
use crate::error::AnalysisError;

/// Roles assigned positionally by the fallback splitter. Segments past the
/// end of this list are labeled [`Role::Evidence`].
pub const FALLBACK_ROLES: [Role; 5] = [
    Role::Context,
    Role::HistoricalViewpoint,
    Role::CounterPoint,
    Role::SupportingEvidence,
    Role::Conclusion,
];

/// Number of leading characters kept in the fallback summary preview.
pub const SUMMARY_PREVIEW_CHARS: usize = 50;

static PIVOT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(While|However|Furthermore|Ultimately|But|Yet|Despite)\b")
        .unwrap_or_else(|e| panic!("pivot pattern: {e}"))
});

//
// ─── CONFIG ─────────────────────────────────────────────────────────────────
//

/// Endpoint configuration for the external analysis service.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    url: String,
}

impl AnalysisConfig {
    /// Reads the endpoint URL from `TRAINER_ANALYZE_URL`, if set and
    /// non-empty.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("TRAINER_ANALYZE_URL").ok()?;
        let url = url.trim().to_owned();
        if url.is_empty() { None } else { Some(Self { url }) }
    }

    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

//
// ─── SERVICE ────────────────────────────────────────────────────────────────
//

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeBody<'a> {
    full_text: &'a str,
}

/// Breaks a passage into labeled paragraphs, remotely or locally.
#[derive(Debug, Clone)]
pub struct AnalysisService {
    client: reqwest::Client,
    config: Option<AnalysisConfig>,
}

impl AnalysisService {
    #[must_use]
    pub fn new(config: Option<AnalysisConfig>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(AnalysisConfig::from_env())
    }

    /// Whether an external endpoint is configured.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Produces the paragraph breakdown for a passage.
    ///
    /// # Errors
    ///
    /// Only the configured mode can fail: on transport errors, non-success
    /// statuses, envelope defects, or a response without a `paragraphs`
    /// field. The local splitter is infallible.
    pub async fn analyze(&self, full_text: &str) -> Result<Vec<Paragraph>, AnalysisError> {
        let Some(config) = &self.config else {
            return Ok(split_into_paragraphs(full_text));
        };

        let response = self
            .client
            .post(config.url())
            .json(&AnalyzeBody { full_text })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::HttpStatus(status));
        }

        let raw: serde_json::Value = response.json().await?;
        let data = unwrap_envelope(raw)?;
        let paragraphs = data
            .get("paragraphs")
            .cloned()
            .ok_or(AnalysisError::MissingParagraphs)?;
        Ok(serde_json::from_value(paragraphs)?)
    }
}

//
// ─── FALLBACK SPLITTER ──────────────────────────────────────────────────────
//

/// Splits raw text on blank lines and labels each non-empty segment.
///
/// Segments keep their surrounding whitespace, so a whitespace-only segment
/// still counts as a paragraph; only zero-length segments are dropped.
#[must_use]
pub fn split_into_paragraphs(full_text: &str) -> Vec<Paragraph> {
    full_text
        .split("\n\n")
        .filter(|segment| !segment.is_empty())
        .enumerate()
        .map(|(index, segment)| Paragraph {
            text: segment.to_owned(),
            role: FALLBACK_ROLES.get(index).cloned().unwrap_or(Role::Evidence),
            summary: preview_summary(index, segment),
            pivots: pivot_words(segment),
        })
        .collect()
}

fn preview_summary(index: usize, text: &str) -> String {
    let preview: String = text.chars().take(SUMMARY_PREVIEW_CHARS).collect();
    format!("Summary of paragraph {}: {preview}...", index + 1)
}

/// Pivot words as they appear in the text, casing preserved.
#[must_use]
pub fn pivot_words(text: &str) -> Vec<String> {
    PIVOT_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_owned())
        .collect()
}
