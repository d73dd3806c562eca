//! Ranked-list generation: prompt the model for a structured list, then
//! normalize whatever came back into clean [`RankedItem`]s.
//!
//! Models drift on field names and types for this task (rank arrives as
//! "priority" or "order", genres as "genre_tags" or a single "group",
//! ratings as numbers). The primary path is schema-constrained extraction;
//! the fallback is a plain completion salvaged with a lenient parser that
//! accepts all of the drifted forms.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use ai_client::{extract, Completion};
use factweave_common::{salvage, Category, RankedItem, TimePeriod};

use crate::prompts;

pub const DEFAULT_COUNT: usize = 50;

const SYSTEM: &str = "You are an expert curator who creates definitive ranked lists. \
Respond with the structured list only.";

#[derive(Debug, Clone)]
pub struct ListRequest {
    pub category: Category,
    pub count: usize,
    pub period: TimePeriod,
}

impl ListRequest {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            count: DEFAULT_COUNT,
            period: TimePeriod::AllTime,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_period(mut self, period: TimePeriod) -> Self {
        self.period = period;
        self
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RankedListWire {
    items: Vec<ItemWire>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ItemWire {
    title: String,
    creator: String,
    year: Option<i32>,
    description: Option<String>,
    genres: Vec<String>,
    rank: u32,
    estimated_time: Option<String>,
    rating: Option<String>,
    accolades: Vec<String>,
}

/// Field-drift-tolerant form used on the salvage path.
#[derive(Debug, Default, Deserialize)]
struct LenientItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    creator: String,
    #[serde(default)]
    year: Option<Value>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "genre_tags")]
    genres: Vec<String>,
    #[serde(default)]
    group: Option<String>,
    #[serde(default, alias = "priority", alias = "order")]
    rank: Option<Value>,
    #[serde(default)]
    estimated_time: Option<String>,
    #[serde(default)]
    rating: Option<Value>,
    #[serde(default, alias = "awards")]
    accolades: Vec<Value>,
    #[serde(default)]
    image_url: Option<String>,
}

pub struct ListGenerator {
    model: Arc<dyn Completion>,
}

impl ListGenerator {
    pub fn new(model: Arc<dyn Completion>) -> Self {
        Self { model }
    }

    /// Generate a ranked list. Items come back sorted by rank, renumbered
    /// 1..=n, and capped at the requested count.
    pub async fn generate(&self, request: &ListRequest) -> Result<Vec<RankedItem>> {
        info!(
            category = %request.category,
            count = request.count,
            period = %request.period,
            "Generating ranked list"
        );
        let user = prompts::list_prompt(&request.category, request.count, request.period);

        let items = match extract::<RankedListWire>(self.model.as_ref(), SYSTEM, &user).await {
            Ok(wire) => wire.items.into_iter().map(RankedItem::from).collect(),
            Err(extract_err) => {
                warn!(error = %extract_err, "Structured list extraction failed, salvaging");
                let text = self.model.complete(SYSTEM, &user).await?;
                salvage_items(&text)
                    .ok_or_else(|| anyhow!("Model returned no parseable list: {extract_err}"))?
            }
        };

        let normalized = normalize(items, request.count);
        if normalized.is_empty() {
            return Err(anyhow!("Model returned an empty list"));
        }
        info!(items = normalized.len(), "List generated");
        Ok(normalized)
    }
}

impl From<ItemWire> for RankedItem {
    fn from(wire: ItemWire) -> Self {
        RankedItem {
            title: wire.title,
            creator: wire.creator,
            year: wire.year,
            description: wire.description,
            genres: wire.genres,
            rank: wire.rank,
            estimated_time: wire.estimated_time,
            rating: wire.rating,
            accolades: wire.accolades,
            image_url: None,
            image_status: Default::default(),
        }
    }
}

/// Pull a JSON array out of a plain completion and convert element by
/// element, skipping anything that will not parse even leniently.
fn salvage_items(text: &str) -> Option<Vec<RankedItem>> {
    let elements = salvage::extract_json_array(text)?;

    let items: Vec<RankedItem> = elements
        .iter()
        .filter_map(|el| serde_json::from_value::<LenientItem>(el.clone()).ok())
        .enumerate()
        .map(|(i, lenient)| lenient.into_item(i as u32 + 1))
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

impl LenientItem {
    fn into_item(self, fallback_rank: u32) -> RankedItem {
        let mut genres = self.genres;
        if genres.is_empty() {
            if let Some(group) = self.group {
                genres.push(group);
            }
        }

        RankedItem {
            title: self.title,
            creator: self.creator,
            year: self.year.as_ref().and_then(coerce_year),
            description: self.description,
            genres,
            rank: self.rank.as_ref().and_then(coerce_rank).unwrap_or(fallback_rank),
            estimated_time: self.estimated_time,
            rating: self.rating.as_ref().map(coerce_string),
            accolades: self.accolades.iter().map(coerce_string).collect(),
            image_url: self.image_url.filter(|u| !u.trim().is_empty()),
            image_status: Default::default(),
        }
    }
}

fn coerce_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().map(|y| y as i32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_rank(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().map(|r| r as u32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Drop unusable entries, order by rank, cap, and renumber from 1.
fn normalize(items: Vec<RankedItem>, count: usize) -> Vec<RankedItem> {
    let mut items: Vec<RankedItem> = items
        .into_iter()
        .filter(|item| !item.title.trim().is_empty() && !item.creator.trim().is_empty())
        .collect();

    items.sort_by_key(|item| item.rank);
    items.truncate(count);
    for (i, item) in items.iter_mut().enumerate() {
        item.rank = i as u32 + 1;
    }
    items
}
