//! Title/summary/tag resolution for a single submission.

use crate::clients::summarizer::{Enrichment, EnrichmentOutcome};

pub const FALLBACK_SUMMARY: &str = "summary generation failed";
pub const FALLBACK_TAG: &str = "Error";
pub const FALLBACK_TITLE: &str = "Unknown Title (Auto-generation failed)";

/// Fields derived from the summarizer outcome. Always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedFields {
    pub(crate) title: String,
    pub(crate) summary: String,
    pub(crate) tags: Vec<String>,
}

#[must_use]
pub(crate) fn fallback_tags() -> Vec<String> {
    vec![FALLBACK_TAG.to_string()]
}

/// Merges the caller-supplied title with the summarizer outcome.
///
/// A non-blank service title wins over the caller's. On failure the caller's
/// title survives as given and summary/tags become the fallback literals.
/// Empty values left after either branch are backfilled so nothing is stored
/// half-enriched.
pub(crate) fn resolve(caller_title: &str, outcome: &EnrichmentOutcome) -> ResolvedFields {
    let resolved = match outcome {
        EnrichmentOutcome::Success(Enrichment {
            title,
            summary,
            tags,
        }) => ResolvedFields {
            title: if title.trim().is_empty() {
                caller_title.to_string()
            } else {
                title.clone()
            },
            summary: summary.clone(),
            tags: tags.clone(),
        },
        EnrichmentOutcome::Failure(_) => ResolvedFields {
            title: caller_title.to_string(),
            summary: FALLBACK_SUMMARY.to_string(),
            tags: fallback_tags(),
        },
    };

    backfill(resolved)
}

fn backfill(mut fields: ResolvedFields) -> ResolvedFields {
    if fields.title.is_empty() {
        fields.title = FALLBACK_TITLE.to_string();
    }
    if fields.summary.is_empty() {
        fields.summary = FALLBACK_SUMMARY.to_string();
    }
    if fields.tags.is_empty() {
        fields.tags = fallback_tags();
    }
    fields
}
