//! Category filter
//!
//! Derives the options of the category dropdown from the loaded places.

use crate::config::CategoryConfig;
use crate::place::Place;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Value of the synthetic entry that shows every place
pub const ALL_VALUE: &str = "all";

/// One option of the category dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    /// Value used for filtering (the raw category, or [`ALL_VALUE`])
    pub value: String,
    /// Text shown to the user
    pub label: String,
}

/// Current filter selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No filtering
    #[default]
    All,
    /// Only places whose category equals this value exactly
    Only(String),
}

impl CategoryFilter {
    /// Parse a dropdown value
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        if value == ALL_VALUE {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    /// Dropdown value for this filter
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::All => ALL_VALUE,
            Self::Only(c) => c,
        }
    }

    /// Whether a place passes this filter
    #[inline]
    #[must_use]
    pub fn matches(&self, place: &Place) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => place.category.as_deref() == Some(c.as_str()),
        }
    }
}

/// Compute the ordered dropdown options for a set of places
///
/// The first option is always the "all" entry, even for an empty set. A
/// place category spelled exactly like [`ALL_VALUE`] is not offered as a
/// separate option; such places are only shown unfiltered.
#[must_use]
pub fn compute_categories(places: &[Place], config: &CategoryConfig) -> Vec<CategoryOption> {
    let distinct: BTreeSet<&str> = places
        .iter()
        .filter_map(|p| p.category.as_deref())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .filter(|c| {
            let reserved = *c == ALL_VALUE;
            if reserved {
                tracing::warn!(category = *c, "category collides with the \"all\" option, not offered");
            }
            !reserved
        })
        .collect();

    let mut sorted: Vec<&str> = distinct.into_iter().collect();
    sorted.sort_by(|a, b| compare_categories(a, b, &config.priority));

    let mut options = Vec::with_capacity(sorted.len() + 1);
    options.push(CategoryOption {
        value: ALL_VALUE.to_string(),
        label: config.all_label.clone(),
    });
    options.extend(sorted.into_iter().map(|c| CategoryOption {
        value: c.to_string(),
        label: config.labels.get(c).cloned().unwrap_or_else(|| c.to_string()),
    }));
    options
}

/// Position of a category in the priority list, ignoring case
#[must_use]
pub fn priority_rank(category: &str, priority: &[String]) -> Option<usize> {
    let lowered = category.to_lowercase();
    priority.iter().position(|p| p.to_lowercase() == lowered)
}

/// Ordering used for the dropdown
///
/// Ranked categories come first by rank; unranked ones follow in
/// alphabetical order.
#[must_use]
pub fn compare_categories(a: &str, b: &str, priority: &[String]) -> Ordering {
    match (priority_rank(a, priority), priority_rank(b, priority)) {
        (Some(ra), Some(rb)) => ra.cmp(&rb).then_with(|| collate(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => collate(a, b),
    }
}

/// Case-insensitive alphabetical comparison with a stable tie-break
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn place(name: &str, category: Option<&str>) -> Place {
        let p = Place::new(name);
        match category {
            Some(c) => p.with_category(c),
            None => p,
        }
    }

    fn values(options: &[CategoryOption]) -> Vec<&str> {
        options.iter().map(|o| o.value.as_str()).collect()
    }

    #[test]
    fn empty_store_has_only_all() {
        let options = compute_categories(&[], &CategoryConfig::hebrew());
        assert_eq!(values(&options), vec!["all"]);
        assert_eq!(options[0].label, "כל השעות");
    }

    #[test]
    fn priority_beats_input_order() {
        let places = vec![
            place("a", Some("Not TLV")),
            place("b", Some("Brunch")),
            place("c", Some("Until 19:00")),
            place("d", Some("After 20:00")),
        ];
        let options = compute_categories(&places, &CategoryConfig::english());
        assert_eq!(
            values(&options),
            vec!["all", "Until 19:00", "After 20:00", "Not TLV", "Brunch"]
        );
    }

    #[test]
    fn priority_match_ignores_case() {
        let priority = CategoryConfig::hebrew().priority;
        assert_eq!(priority_rank("UNTIL 19:30", &priority), Some(1));
        assert_eq!(priority_rank("weekends", &priority), Some(4));
        assert_eq!(priority_rank("Brunch", &priority), None);
    }

    #[test]
    fn unranked_sorted_alphabetically_ignoring_case() {
        let places = vec![
            place("a", Some("wine bar")),
            place("b", Some("Brunch")),
            place("c", Some("appetizers")),
        ];
        let options = compute_categories(&places, &CategoryConfig::english());
        assert_eq!(values(&options), vec!["all", "appetizers", "Brunch", "wine bar"]);
    }

    #[test]
    fn duplicates_and_blanks_removed() {
        let places = vec![
            place("a", Some("WEEKENDS")),
            place("b", Some("WEEKENDS")),
            place("c", Some("   ")),
            place("d", None),
        ];
        let options = compute_categories(&places, &CategoryConfig::english());
        assert_eq!(values(&options), vec!["all", "WEEKENDS"]);
    }

    #[test]
    fn category_named_all_does_not_duplicate_the_all_option() {
        let places = vec![place("a", Some("all")), place("b", Some("WEEKENDS"))];
        let options = compute_categories(&places, &CategoryConfig::english());
        assert_eq!(values(&options), vec!["all", "WEEKENDS"]);
    }

    #[test]
    fn labels_come_from_config() {
        let places = vec![place("a", Some("WEEKENDS")), place("b", Some("Brunch"))];
        let options = compute_categories(&places, &CategoryConfig::hebrew());
        assert_eq!(options[1].label, "סופ״ש");
        assert_eq!(options[2].label, "Brunch");
    }

    #[test]
    fn filter_round_trips_value() {
        assert_eq!(CategoryFilter::from_value("all"), CategoryFilter::All);
        let f = CategoryFilter::from_value("WEEKENDS");
        assert_eq!(f.value(), "WEEKENDS");
        assert!(f.matches(&place("a", Some("WEEKENDS"))));
        assert!(!f.matches(&place("b", Some("weekends"))));
        assert!(!f.matches(&place("c", None)));
    }
}
