//! Size / colour classification of option entries.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use preset_export_core::{slugify_value, strip_tags, title_slug};

use crate::hooks::ExportHooks;
use crate::options::OptionEntry;

/// Lowercase, trimmed, single-spaced label used for override matching.
pub fn normalize_layer_label(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// A manual mapping of one axis onto a layer label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerOverride {
    pub raw: String,
    pub normalized: String,
    pub slug: String,
}

impl LayerOverride {
    /// Build an override from user input; blank input gives an unset override.
    pub fn new(input: &str) -> Self {
        let raw = strip_tags(input).trim().to_string();
        if raw.is_empty() {
            return Self::default();
        }
        Self {
            normalized: normalize_layer_label(&raw),
            slug: title_slug(&raw),
            raw,
        }
    }

    pub fn is_set(&self) -> bool {
        !self.raw.is_empty()
    }

    /// Case/whitespace-insensitive label equality, or equal non-empty slugs.
    pub fn matches(&self, label: &str) -> bool {
        if !self.is_set() {
            return false;
        }
        if normalize_layer_label(label) == self.normalized {
            return true;
        }
        let slug = title_slug(label);
        !slug.is_empty() && slug == self.slug
    }
}

/// Overrides for both axes, built once per export request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantLayerOverrides {
    pub size: LayerOverride,
    pub colour: LayerOverride,
}

impl VariantLayerOverrides {
    pub fn new(size: &str, colour: &str) -> Self {
        Self {
            size: LayerOverride::new(size),
            colour: LayerOverride::new(colour),
        }
    }

    pub fn any(&self) -> bool {
        self.size.is_set() || self.colour.is_set()
    }
}

/// An option assigned to a canonical axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedOption {
    #[serde(rename = "name")]
    pub label: String,
    pub value: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedOptions {
    pub size: Option<ClassifiedOption>,
    pub colour: Option<ClassifiedOption>,
    pub other: Vec<OptionEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Size,
    Colour,
    Other,
}

fn axis_of(label: &str) -> Axis {
    let label = label.to_lowercase();
    if label.contains("size") {
        Axis::Size
    } else if label.contains("colour") || label.contains("color") {
        Axis::Colour
    } else {
        Axis::Other
    }
}

fn size_option(entry: &OptionEntry) -> ClassifiedOption {
    ClassifiedOption {
        label: entry.label.clone(),
        value: entry.value.clone(),
        slug: slugify_value(&entry.value),
    }
}

fn colour_option(entry: &OptionEntry, hooks: &ExportHooks) -> ClassifiedOption {
    let slug = hooks.colour_slug(slugify_value(&entry.value), &entry.value, entry);
    ClassifiedOption {
        label: entry.label.clone(),
        value: entry.value.clone(),
        slug,
    }
}

/// Split entries into size, colour and everything else.
///
/// Overrides are resolved first; remaining entries are classified by label
/// substring, first match per axis. Entries with a blank label or value are
/// ignored entirely. Extra same-axis candidates land in `other`.
pub fn classify_options(
    entries: &[OptionEntry],
    overrides: &VariantLayerOverrides,
    hooks: &ExportHooks,
) -> ClassifiedOptions {
    let mut result = ClassifiedOptions::default();
    let mut consumed: HashSet<(&str, &str, i64)> = HashSet::new();

    let usable = || entries.iter().filter(|e| !e.label.is_empty() && !e.value.is_empty());

    if overrides.any() {
        for entry in usable() {
            let key = (entry.label.as_str(), entry.value.as_str(), entry.order);

            if result.size.is_none() && overrides.size.matches(&entry.label) {
                result.size = Some(size_option(entry));
                consumed.insert(key);
                continue;
            }

            if result.colour.is_none() && overrides.colour.matches(&entry.label) {
                result.colour = Some(colour_option(entry, hooks));
                consumed.insert(key);
            }
        }
    }

    for entry in usable() {
        if consumed.contains(&(entry.label.as_str(), entry.value.as_str(), entry.order)) {
            continue;
        }

        match axis_of(&entry.label) {
            Axis::Size if result.size.is_none() => result.size = Some(size_option(entry)),
            Axis::Colour if result.colour.is_none() => {
                result.colour = Some(colour_option(entry, hooks));
            }
            _ => result.other.push(entry.clone()),
        }
    }

    result
}
