//! Filtering of sanction entries and the counts derived from a filtered view.

use crate::constants::{ALL_TYPES_ALIASES, ENTITY_ALIASES, MIN_NAME_QUERY_CHARS, PERSON_ALIASES};
use crate::errors::{AppError, AppResult};
use crate::models::{EntryType, SanctionEntry};
use std::collections::{BTreeMap, BTreeSet};

/// User-chosen criteria narrowing the displayed entries.
///
/// The default value filters nothing. All active criteria must hold for an entry
/// to be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Countries to keep, compared case-insensitively. Empty keeps every country.
    pub countries: Vec<String>,
    /// Entry type to keep, `None` keeps both.
    pub entry_type: Option<EntryType>,
    /// Case-insensitive name substring, ignored below three characters.
    pub name_query: String,
}

impl FilterSpec {
    /// Lowercased name query when it is long enough to be applied.
    pub fn active_name_query(&self) -> Option<String> {
        if self.name_query.chars().count() >= MIN_NAME_QUERY_CHARS {
            Some(self.name_query.to_lowercase())
        } else {
            None
        }
    }

    /// True for a non-empty query that is too short to be applied.
    pub fn name_query_too_short(&self) -> bool {
        !self.name_query.is_empty() && self.active_name_query().is_none()
    }

    /// True when no criterion is active.
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty() && self.entry_type.is_none() && self.active_name_query().is_none()
    }
}

/// Lowercased, trimmed country keys; `None` when no country filter applies.
fn country_keys(countries: &[String]) -> Option<BTreeSet<String>> {
    let keys: BTreeSet<String> = countries
        .iter()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect();
    if keys.is_empty() {
        None
    } else {
        Some(keys)
    }
}

/// Filtered view over a full entry sequence.
///
/// Borrows the entries it keeps and lives only as long as one render or export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult<'a> {
    entries: Vec<&'a SanctionEntry>,
}

impl<'a> FilterResult<'a> {
    pub fn entries(&self) -> &[&'a SanctionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Per-type counts of the kept entries.
    pub fn counts(&self) -> EntryCounts {
        count_by_type(self.entries.iter().copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a SanctionEntry> + '_ {
        self.entries.iter().copied()
    }
}

/// Applies `spec` to `entries` in a single stable pass.
///
/// Kept entries appear in the same relative order as in `entries`.
pub fn apply_filter<'a>(entries: &'a [SanctionEntry], spec: &FilterSpec) -> FilterResult<'a> {
    let countries = country_keys(&spec.countries);
    let name_query = spec.active_name_query();

    let entries = entries
        .iter()
        .filter(|entry| {
            countries
                .as_ref()
                .map_or(true, |keys| keys.contains(&entry.country.trim().to_lowercase()))
        })
        .filter(|entry| spec.entry_type.map_or(true, |t| entry.entry_type == t))
        .filter(|entry| {
            name_query
                .as_ref()
                .map_or(true, |q| entry.name.to_lowercase().contains(q.as_str()))
        })
        .collect();

    FilterResult { entries }
}

/// Number of entries per type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryCounts {
    pub persons: usize,
    pub entities: usize,
}

impl EntryCounts {
    pub fn get(&self, entry_type: EntryType) -> usize {
        match entry_type {
            EntryType::Person => self.persons,
            EntryType::Entity => self.entities,
        }
    }

    pub fn total(&self) -> usize {
        self.persons + self.entities
    }
}

/// Counts entries per type.
pub fn count_by_type<'a>(entries: impl IntoIterator<Item = &'a SanctionEntry>) -> EntryCounts {
    entries
        .into_iter()
        .fold(EntryCounts::default(), |mut counts, entry| {
            match entry.entry_type {
                EntryType::Person => counts.persons += 1,
                EntryType::Entity => counts.entities += 1,
            }
            counts
        })
}

/// Sorted distinct non-empty countries with the number of entries in each.
pub fn distinct_countries(entries: &[SanctionEntry]) -> BTreeMap<String, usize> {
    let mut countries = BTreeMap::new();
    for entry in entries.iter().filter(|e| !e.country.is_empty()) {
        *countries.entry(entry.country.clone()).or_insert(0) += 1;
    }
    countries
}

/// Entry types present among the entries of the given countries.
///
/// An empty country list considers every entry.
pub fn available_types(entries: &[SanctionEntry], countries: &[String]) -> BTreeSet<EntryType> {
    let spec = FilterSpec {
        countries: countries.to_vec(),
        ..FilterSpec::default()
    };
    apply_filter(entries, &spec)
        .iter()
        .map(|e| e.entry_type)
        .collect()
}

/// Parses a user-supplied type filter; `all` means no type filter.
///
/// # Errors
///
/// Returns `InvalidInput` for values that are neither a type nor `all`.
pub fn parse_type_filter(value: &str) -> AppResult<Option<EntryType>> {
    let lower = value.trim().to_lowercase();
    if PERSON_ALIASES.contains(&lower.as_str()) {
        Ok(Some(EntryType::Person))
    } else if ENTITY_ALIASES.contains(&lower.as_str()) {
        Ok(Some(EntryType::Entity))
    } else if lower.is_empty() || ALL_TYPES_ALIASES.contains(&lower.as_str()) {
        Ok(None)
    } else {
        Err(AppError::InvalidInput(format!(
            "Unknown entry type '{value}', expected person, entity or all"
        )))
    }
}
