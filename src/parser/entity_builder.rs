use crate::models::{EntryType, SanctionEntry};
use crate::utils::title_case;
use chrono::NaiveDate;
use tracing::debug;

/// Text-bearing elements captured inside a `sanctionEntity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TextField {
    /// `<remark>` inside the selected `<nameAlias>`
    Remark,
    /// `<publicationUrl>` inside the first `<regulation>`
    PublicationUrl,
}

/// Builder for constructing `SanctionEntry` values during XML parsing.
/// Encapsulates the state needed to parse a single `sanctionEntity` element.
pub(super) struct EntityBuilder {
    active: bool,
    eu_reference_number: Option<String>,
    name: Option<String>,
    subject_type: Option<String>,
    country: Option<String>,
    publication_date: Option<String>,
    program: Option<String>,
    remarks: Option<String>,
    publication_url: Option<String>,
    in_selected_alias: bool,
    in_first_regulation: bool,
    regulation_seen: bool,
    current_field: Option<TextField>,
    text: String,
}

impl EntityBuilder {
    pub(super) fn new() -> Self {
        Self {
            active: false,
            eu_reference_number: None,
            name: None,
            subject_type: None,
            country: None,
            publication_date: None,
            program: None,
            remarks: None,
            publication_url: None,
            in_selected_alias: false,
            in_first_regulation: false,
            regulation_seen: false,
            current_field: None,
            text: String::new(),
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    /// Starts a new record, discarding anything left from the previous one.
    pub(super) fn begin(&mut self, eu_reference_number: Option<String>) {
        self.reset();
        self.active = true;
        self.eu_reference_number = eu_reference_number;
    }

    pub(super) fn is_active(&self) -> bool {
        self.active
    }

    /// Handles a `<nameAlias>` child. The first alias with a non-empty
    /// `wholeName` provides the name and the remarks.
    pub(super) fn name_alias(&mut self, whole_name: Option<String>) {
        if self.name.is_some() {
            return;
        }
        if let Some(name) = whole_name.map(|n| n.trim().to_string()) {
            if !name.is_empty() {
                self.name = Some(name);
                self.in_selected_alias = true;
            }
        }
    }

    pub(super) fn subject_type(&mut self, code: Option<String>) {
        if self.subject_type.is_none() {
            self.subject_type = code;
        }
    }

    /// Handles a `<regulation>` child; only the first one is used.
    pub(super) fn regulation(&mut self, publication_date: Option<String>, programme: Option<String>) {
        if self.regulation_seen {
            return;
        }
        self.regulation_seen = true;
        self.in_first_regulation = true;
        self.publication_date = publication_date;
        self.program = programme;
    }

    /// Handles an `<address>` child; the first one naming a country wins.
    pub(super) fn address(&mut self, country_description: Option<String>) {
        if self.country.is_some() {
            return;
        }
        if let Some(desc) = country_description.map(|d| d.trim().to_string()) {
            if !desc.is_empty() {
                self.country = Some(title_case(&desc));
            }
        }
    }

    /// Called when a direct child of `sanctionEntity` closes.
    pub(super) fn close_child(&mut self) {
        self.in_selected_alias = false;
        self.in_first_regulation = false;
        self.current_field = None;
        self.text.clear();
    }

    /// Begins capturing text for `field` when the surrounding element is the one
    /// the field is read from and the field is still unset.
    pub(super) fn start_text(&mut self, field: TextField) {
        let wanted = match field {
            TextField::Remark => self.in_selected_alias && self.remarks.is_none(),
            TextField::PublicationUrl => {
                self.in_first_regulation && self.publication_url.is_none()
            }
        };
        if wanted {
            self.current_field = Some(field);
            self.text.clear();
        }
    }

    pub(super) fn is_capturing_text(&self) -> bool {
        self.current_field.is_some()
    }

    pub(super) fn push_text(&mut self, text: &str) {
        if self.current_field.is_some() {
            self.text.push_str(text);
        }
    }

    pub(super) fn end_text(&mut self) {
        if let Some(field) = self.current_field.take() {
            let value = self.text.trim().to_string();
            match field {
                TextField::Remark => self.remarks = Some(value),
                TextField::PublicationUrl => self.publication_url = Some(value),
            }
        }
        self.text.clear();
    }

    /// Finishes the current record.
    ///
    /// Returns `None` when no usable name was found; every other missing field
    /// becomes empty text.
    pub(super) fn build(&mut self) -> Option<SanctionEntry> {
        self.active = false;
        let name = self.name.take()?;

        let code = self.subject_type.take().unwrap_or_default();
        if !EntryType::is_known_code(&code) {
            debug!(code = code.as_str(), name = name.as_str(), "Unrecognized subject type, treating as entity");
        }

        let publication_date = self.publication_date.take().and_then(|raw| {
            let raw = raw.trim();
            let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
            if parsed.is_none() && !raw.is_empty() {
                debug!(value = raw, name = name.as_str(), "Ignoring unparseable publication date");
            }
            parsed
        });

        Some(SanctionEntry {
            eu_reference_number: self.eu_reference_number.take().unwrap_or_default(),
            entry_type: EntryType::from(code.as_str()),
            country: self.country.take().unwrap_or_default(),
            publication_date,
            program: self.program.take().unwrap_or_default(),
            remarks: self.remarks.take().unwrap_or_default(),
            publication_url: self.publication_url.take().unwrap_or_default(),
            name,
        })
    }
}
