//! # Audience Demographics
//!
//! Three share-of-audience maps (countries, age groups, gender). The same
//! data arrives in several shapes:
//!
//! - an item array: `[{"country": "US", "percentage": 25}, ..]`
//! - a wrapper whose `value` holds an item array or a map
//! - a plain map: `{"US": 25, "GB": "15"}`
//!
//! Item labels and values are read through [`Category`] probe tables. A
//! label that shows up more than once is summed into the same key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::probe::{as_number, probe_label, probe_number};

/// Candidate keys for an item's share value.
pub const VALUE_PROBES: &[&str] = &["percentage", "value", "percent"];

/// Share-of-audience breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub countries: BTreeMap<String, f64>,
    pub age_groups: BTreeMap<String, f64>,
    pub gender: BTreeMap<String, f64>,
}

impl Demographics {
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty() && self.age_groups.is_empty() && self.gender.is_empty()
    }

    pub fn bucket_mut(&mut self, category: Category) -> &mut BTreeMap<String, f64> {
        match category {
            Category::Country => &mut self.countries,
            Category::AgeGroup => &mut self.age_groups,
            Category::Gender => &mut self.gender,
        }
    }
}

/// One of the three demographic breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Country,
    AgeGroup,
    Gender,
}

impl Category {
    /// Candidate keys for an item's label, most specific first.
    pub fn label_probes(&self) -> &'static [&'static str] {
        match self {
            Self::Country => &["country", "country_code", "label", "name"],
            Self::AgeGroup => &["age_group", "age", "label", "name", "group"],
            Self::Gender => &["gender", "label", "name", "group"],
        }
    }
}

/// Add `share` to `key`, summing with any earlier reading.
pub fn accumulate(bucket: &mut BTreeMap<String, f64>, key: String, share: f64) {
    *bucket.entry(key).or_insert(0.0) += share;
}

/// Fold an item array into `bucket`.
///
/// Items without a recognisable label are skipped. A labelled item with no
/// usable value counts as zero.
pub fn collect_items(
    bucket: &mut BTreeMap<String, f64>,
    items: &[Value],
    label_probes: &[&str],
    value_probes: &[&str],
) {
    for item in items.iter().filter_map(Value::as_object) {
        if let Some(label) = probe_label(item, label_probes) {
            let share = probe_number(item, value_probes).unwrap_or(0.0);
            accumulate(bucket, label, share);
        }
    }
}

/// Fold a `{label: share}` map into `bucket`. Entries whose value is not
/// numeric are skipped.
pub fn collect_map(bucket: &mut BTreeMap<String, f64>, map: &Map<String, Value>) {
    for (label, value) in map {
        match as_number(value) {
            Some(share) => accumulate(bucket, label.clone(), share),
            None => tracing::debug!(label = %label, "skipping non-numeric demographic entry"),
        }
    }
}

/// JavaScript-style truthiness for scalar wrapper values.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Fold any of the accepted shapes for `category` into `demographics`.
pub fn collect_any(demographics: &mut Demographics, category: Category, source: &Value) {
    let bucket = demographics.bucket_mut(category);
    match source {
        Value::Array(items) => collect_items(bucket, items, category.label_probes(), VALUE_PROBES),
        Value::Object(map) => match map.get("value") {
            Some(Value::Array(items)) => {
                collect_items(bucket, items, category.label_probes(), VALUE_PROBES)
            }
            Some(Value::Object(inner)) => collect_map(bucket, inner),
            // A set scalar wrapper carries no breakdown.
            Some(value) if is_truthy(value) => {
                tracing::debug!("skipping demographic wrapper with scalar value");
            }
            _ => collect_map(bucket, map),
        },
        _ => {}
    }
}
