//! AI tag parsing and aggregation
//!
//! Leads carry an `ai_tags` JSON column written by an external enrichment
//! pipeline. This module owns the defensive decode of that column and the
//! scoreboard-style aggregation over it. The column is untrusted input:
//! anything that is not a well-formed tag object is skipped, never an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A single AI-assigned tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AiTag {
    pub label: String,
    pub category: String,
}

impl AiTag {
    pub fn new(label: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            category: category.into(),
        }
    }
}

/// Aggregated count of one tag across a lead population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TagCount {
    pub category: String,
    pub label: String,
    pub count: u64,
}

/// Decode an `ai_tags` column value into the tags it actually contains.
///
/// The column may hold JSON `null`, a non-array, or an array with junk
/// elements. A valid element is an object with non-empty string `label`
/// and `category` fields; everything else is dropped. Order of valid
/// elements is preserved.
pub fn parse_tag_list(value: &Value) -> Vec<AiTag> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items.iter().filter_map(parse_tag).collect()
}

fn parse_tag(item: &Value) -> Option<AiTag> {
    let obj = item.as_object()?;
    let label = obj.get("label")?.as_str()?.trim();
    let category = obj.get("category")?.as_str()?.trim();
    if label.is_empty() || category.is_empty() {
        return None;
    }
    Some(AiTag::new(label, category))
}

/// Aggregate tag lists into per-(category, label) counts.
///
/// Output ordering is deterministic regardless of input row order:
/// descending by count, then ascending by label, then ascending by
/// category for identically-labelled tags in different categories.
pub fn aggregate_tags<I>(tag_lists: I) -> Vec<TagCount>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = AiTag>,
{
    let mut counts: HashMap<(String, String), u64> = HashMap::new();
    for tags in tag_lists {
        for tag in tags {
            *counts.entry((tag.category, tag.label)).or_insert(0) += 1;
        }
    }

    let mut result: Vec<TagCount> = counts
        .into_iter()
        .map(|((category, label), count)| TagCount {
            category,
            label,
            count,
        })
        .collect();

    result.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.category.cmp(&b.category))
    });
    result
}

// =============================================================================
// TESTS
// =============================================================================
