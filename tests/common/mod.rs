//! Common test utilities for integration tests

use eu_sanctions_cli::models::{EntryType, SanctionEntry};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Helper function to create a test XML file in a directory
#[allow(dead_code)]
pub fn create_test_xml_file(path: &Path, content: &str) {
    let parent = path.parent().unwrap();
    fs::create_dir_all(parent).unwrap();
    fs::File::create(path)
        .unwrap()
        .write_all(content.as_bytes())
        .unwrap();
}

/// Builds an entry with only the fields the filter looks at.
#[allow(dead_code)]
pub fn entry(name: &str, entry_type: EntryType, country: &str) -> SanctionEntry {
    SanctionEntry {
        eu_reference_number: String::new(),
        name: name.to_string(),
        entry_type,
        country: country.to_string(),
        publication_date: None,
        program: String::new(),
        remarks: String::new(),
        publication_url: String::new(),
    }
}

/// Sample export with three entities, in the shape of the published feed
#[allow(dead_code)]
pub const SAMPLE_EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<export xmlns="http://eu.europa.ec/fpi/fsd/export" generationDate="2024-05-01T10:00:00.000+02:00">
  <sanctionEntity designationDate="2022-02-23" euReferenceNumber="EU.1.1" logicalId="1">
    <regulation programme="UKR" publicationDate="2022-02-23" regulationType="regulation">
      <publicationUrl>https://eur-lex.europa.eu/eli/reg/2022/260/oj</publicationUrl>
    </regulation>
    <subjectType classificationCode="P" code="person"/>
    <nameAlias firstName="Jane" lastName="Doe" wholeName="Jane Doe">
      <remark>Deputy minister, "acting"</remark>
    </nameAlias>
    <address countryDescription="FRANCE" city="Lyon"/>
  </sanctionEntity>
  <sanctionEntity euReferenceNumber="EU.2.2" logicalId="2">
    <regulation programme="RUS" publicationDate="2023-06-23">
      <publicationUrl>https://eur-lex.europa.eu/eli/reg/2023/1214/oj</publicationUrl>
    </regulation>
    <subjectType classificationCode="E" code="enterprise"/>
    <nameAlias wholeName="Acme Corp, Ltd"/>
    <address countryDescription="GERMANY"/>
  </sanctionEntity>
  <sanctionEntity euReferenceNumber="EU.3.3" logicalId="3">
    <regulation programme="UKR" publicationDate="2022-03-15"/>
    <subjectType classificationCode="P" code="person"/>
    <nameAlias wholeName="Jan Doe"/>
    <address countryDescription="FRANCE"/>
  </sanctionEntity>
</export>"#;

/// Export without any entities
#[allow(dead_code)]
pub const EMPTY_EXPORT: &str = r#"<?xml version="1.0"?>
<export xmlns="http://eu.europa.ec/fpi/fsd/export">
</export>"#;
