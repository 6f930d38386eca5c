use chrono::NaiveDate;
use std::fmt;

/// Kind of sanctioned party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryType {
    Person,
    Entity,
}

impl EntryType {
    /// All variants in display order.
    pub const ALL: [EntryType; 2] = [EntryType::Person, EntryType::Entity];

    /// Returns a human-readable name for the entry type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Person => "Person",
            Self::Entity => "Entity",
        }
    }

    /// Returns true when `code` is one of the feed's canonical subject type codes.
    pub fn is_known_code(code: &str) -> bool {
        matches!(
            code.trim().to_lowercase().as_str(),
            "person" | "enterprise" | "entity"
        )
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<&str> for EntryType {
    /// Maps a feed `subjectType` code onto the two known variants.
    ///
    /// `person` is a person; everything else (`enterprise`, missing codes and
    /// any code the feed may add later) is an entity.
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("person") {
            Self::Person
        } else {
            Self::Entity
        }
    }
}

/// One sanctioned person or entity as published in the feed.
///
/// Entries are created by the parser and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanctionEntry {
    pub eu_reference_number: String,
    pub name: String,
    pub entry_type: EntryType,
    pub country: String,
    pub publication_date: Option<NaiveDate>,
    pub program: String,
    pub remarks: String,
    pub publication_url: String,
}

impl SanctionEntry {
    /// Publication date as `YYYY-MM-DD`, or an empty string when unknown.
    pub fn publication_date_text(&self) -> String {
        self.publication_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: Option<NaiveDate>) -> SanctionEntry {
        SanctionEntry {
            eu_reference_number: "EU.1.1".to_string(),
            name: "Jane Doe".to_string(),
            entry_type: EntryType::Person,
            country: "France".to_string(),
            publication_date: date,
            program: "UKR".to_string(),
            remarks: String::new(),
            publication_url: String::new(),
        }
    }

    #[test]
    fn test_entry_type_person_code() {
        assert_eq!(EntryType::from("person"), EntryType::Person);
    }

    #[test]
    fn test_entry_type_enterprise_code() {
        assert_eq!(EntryType::from("enterprise"), EntryType::Entity);
    }

    #[test]
    fn test_entry_type_case_insensitive() {
        assert_eq!(EntryType::from("PERSON"), EntryType::Person);
        assert_eq!(EntryType::from("  Person "), EntryType::Person);
    }

    #[test]
    fn test_entry_type_unknown_defaults_to_entity() {
        assert_eq!(EntryType::from("vessel"), EntryType::Entity);
        assert_eq!(EntryType::from(""), EntryType::Entity);
    }

    #[test]
    fn test_entry_type_known_codes() {
        assert!(EntryType::is_known_code("person"));
        assert!(EntryType::is_known_code("Enterprise"));
        assert!(!EntryType::is_known_code("vessel"));
    }

    #[test]
    fn test_entry_type_display_name() {
        assert_eq!(EntryType::Person.display_name(), "Person");
        assert_eq!(EntryType::Entity.to_string(), "Entity");
    }

    #[test]
    fn test_publication_date_text() {
        let date = NaiveDate::from_ymd_opt(2022, 2, 23);
        assert_eq!(entry(date).publication_date_text(), "2022-02-23");
        assert_eq!(entry(None).publication_date_text(), "");
    }
}
