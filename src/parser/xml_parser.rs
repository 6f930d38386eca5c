use super::entity_builder::{EntityBuilder, TextField};
use crate::errors::{AppError, AppResult};
use crate::models::SanctionEntry;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::reader::Reader;
use std::fmt::Display;
use tracing::{debug, warn};

const ROOT_ELEMENT: &[u8] = b"export";
const ENTITY_ELEMENT: &[u8] = b"sanctionEntity";

// Depths of the elements we read, counting the root as 1.
const ROOT_DEPTH: usize = 1;
const ENTITY_DEPTH: usize = 2;
const CHILD_DEPTH: usize = 3;
const GRANDCHILD_DEPTH: usize = 4;

/// Parses a sanctions export document provided as bytes.
///
/// Every `sanctionEntity` element becomes one [`SanctionEntry`], in document order.
/// Elements are matched by local name, so both the default namespace used by the
/// published export and prefixed variants are accepted.
///
/// # Errors
///
/// Returns `ParseError` when the input is not well-formed XML, has no root element,
/// or its root element is not `export`. Missing sub-fields are never an error.
pub fn parse_document(content: &[u8]) -> AppResult<Vec<SanctionEntry>> {
    let mut reader = Reader::from_reader(content);

    // Estimate capacity from content length (heuristic: ~1 entity per 2 KB)
    let mut result = Vec::with_capacity(content.len() / 2048);
    let mut buf = Vec::with_capacity(8192);

    let mut builder = EntityBuilder::new();
    let mut depth: usize = 0;
    let mut root_seen = false;
    let mut dropped: usize = 0;

    loop {
        buf.clear();
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_error(&reader, e))?;
        match event {
            Event::Start(e) => {
                depth += 1;
                handle_open(&reader, &e, depth, &mut root_seen, &mut builder)?;
            }
            Event::Empty(e) => {
                handle_open(&reader, &e, depth + 1, &mut root_seen, &mut builder)?;
                handle_close(e.local_name().as_ref(), depth + 1, &mut builder, &mut result, &mut dropped);
            }
            Event::End(e) => {
                handle_close(e.local_name().as_ref(), depth, &mut builder, &mut result, &mut dropped);
                depth = depth.saturating_sub(1);
            }
            Event::Text(e) if builder.is_capturing_text() => {
                let txt = e.decode().map_err(|e| {
                    AppError::ParseError(format!("Failed to decode XML text: {e}"))
                })?;
                builder.push_text(&txt);
            }
            Event::CData(e) if builder.is_capturing_text() => {
                builder.push_text(&String::from_utf8_lossy(&e));
            }
            Event::GeneralRef(e) if builder.is_capturing_text() => {
                builder.push_text(&resolve_reference(&e)?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen {
        return Err(AppError::ParseError(
            "Document contains no root element".to_string(),
        ));
    }
    if depth != 0 {
        return Err(AppError::ParseError(
            "Unexpected end of document inside an open element".to_string(),
        ));
    }

    if dropped > 0 {
        warn!(dropped, "Skipped sanction entities without a name");
    }
    debug!(entries = result.len(), "Parsed sanctions document");

    Ok(result)
}

fn handle_open(
    reader: &Reader<&[u8]>,
    e: &BytesStart,
    depth: usize,
    root_seen: &mut bool,
    builder: &mut EntityBuilder,
) -> AppResult<()> {
    let local_name = e.local_name();
    let name = local_name.as_ref();

    match depth {
        ROOT_DEPTH => {
            if name != ROOT_ELEMENT {
                return Err(AppError::ParseError(format!(
                    "Unexpected root element <{}>, expected <export>",
                    String::from_utf8_lossy(name)
                )));
            }
            *root_seen = true;
        }
        ENTITY_DEPTH if name == ENTITY_ELEMENT => {
            builder.begin(attribute(reader, e, b"euReferenceNumber")?);
        }
        CHILD_DEPTH if builder.is_active() => match name {
            b"nameAlias" => builder.name_alias(attribute(reader, e, b"wholeName")?),
            b"subjectType" => builder.subject_type(attribute(reader, e, b"code")?),
            b"regulation" => builder.regulation(
                attribute(reader, e, b"publicationDate")?,
                attribute(reader, e, b"programme")?,
            ),
            b"address" => builder.address(attribute(reader, e, b"countryDescription")?),
            _ => {}
        },
        GRANDCHILD_DEPTH if builder.is_active() => match name {
            b"remark" => builder.start_text(TextField::Remark),
            b"publicationUrl" => builder.start_text(TextField::PublicationUrl),
            _ => {}
        },
        _ => {}
    }
    Ok(())
}

fn handle_close(
    name: &[u8],
    depth: usize,
    builder: &mut EntityBuilder,
    result: &mut Vec<SanctionEntry>,
    dropped: &mut usize,
) {
    if !builder.is_active() {
        return;
    }
    match depth {
        ENTITY_DEPTH if name == ENTITY_ELEMENT => match builder.build() {
            Some(entry) => result.push(entry),
            None => *dropped += 1,
        },
        CHILD_DEPTH => builder.close_child(),
        GRANDCHILD_DEPTH => builder.end_text(),
        _ => {}
    }
}

/// Reads and unescapes an attribute value, `None` when the attribute is absent.
fn attribute(reader: &Reader<&[u8]>, e: &BytesStart, key: &[u8]) -> AppResult<Option<String>> {
    match e.try_get_attribute(key).map_err(|e| xml_error(reader, e))? {
        Some(attr) => {
            let value = attr
                .decode_and_unescape_value(reader.decoder())
                .map_err(|e| xml_error(reader, e))?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

/// Resolves `&amp;`-style and numeric character references inside text.
fn resolve_reference(e: &BytesRef) -> AppResult<String> {
    if let Some(ch) = e
        .resolve_char_ref()
        .map_err(|e| AppError::ParseError(format!("Invalid character reference: {e}")))?
    {
        return Ok(ch.to_string());
    }
    let name = e
        .decode()
        .map_err(|e| AppError::ParseError(format!("Failed to decode XML reference: {e}")))?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| AppError::ParseError(format!("Unknown entity reference &{name};")))
}

fn xml_error(reader: &Reader<&[u8]>, err: impl Display) -> AppError {
    AppError::ParseError(format!(
        "Malformed XML at byte {}: {err}",
        reader.error_position()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;
    use chrono::NaiveDate;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<export xmlns="http://eu.europa.ec/fpi/fsd/export" generationDate="2024-05-01T10:00:00">
  <sanctionEntity designationDate="2022-02-23" euReferenceNumber="EU.7200.3">
    <remark>Entity level remark</remark>
    <regulation programme="UKR" publicationDate="2022-02-23" regulationType="regulation">
      <publicationUrl>
        https://eur-lex.europa.eu/legal-content/EN/TXT/?uri=OJ:L:2022:042I:FULL
      </publicationUrl>
    </regulation>
    <subjectType classificationCode="P" code="person"/>
    <nameAlias firstName="Jane" lastName="Doe" wholeName="Jane Doe">
      <remark>Member of the State Duma</remark>
    </nameAlias>
    <nameAlias wholeName="J. Doe"/>
    <address city="Lyon" countryDescription="FRANCE"/>
  </sanctionEntity>
  <sanctionEntity euReferenceNumber="EU.100.1">
    <regulation programme="RUS" publicationDate="2023-06-23"/>
    <subjectType code="enterprise"/>
    <nameAlias wholeName="Acme Corp &amp; Sons"/>
    <address countryDescription="GERMANY"/>
  </sanctionEntity>
</export>"#;

    #[test]
    fn test_parse_document_extracts_all_fields() {
        let result = parse_document(SAMPLE.as_bytes()).unwrap();
        assert_eq!(result.len(), 2);

        let jane = &result[0];
        assert_eq!(jane.eu_reference_number, "EU.7200.3");
        assert_eq!(jane.name, "Jane Doe");
        assert_eq!(jane.entry_type, EntryType::Person);
        assert_eq!(jane.country, "France");
        assert_eq!(jane.publication_date, NaiveDate::from_ymd_opt(2022, 2, 23));
        assert_eq!(jane.program, "UKR");
        assert_eq!(jane.remarks, "Member of the State Duma");
        assert_eq!(
            jane.publication_url,
            "https://eur-lex.europa.eu/legal-content/EN/TXT/?uri=OJ:L:2022:042I:FULL"
        );

        let acme = &result[1];
        assert_eq!(acme.name, "Acme Corp & Sons");
        assert_eq!(acme.entry_type, EntryType::Entity);
        assert_eq!(acme.country, "Germany");
        assert_eq!(acme.remarks, "");
        assert_eq!(acme.publication_url, "");
    }

    #[test]
    fn test_parse_document_prefixed_namespace() {
        let xml = r#"<fsd:export xmlns:fsd="http://eu.europa.ec/fpi/fsd/export">
  <fsd:sanctionEntity euReferenceNumber="EU.1.1">
    <fsd:nameAlias wholeName="Prefixed Name"/>
  </fsd:sanctionEntity>
</fsd:export>"#;
        let result = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Prefixed Name");
    }

    #[test]
    fn test_parse_document_resolves_references_in_remarks() {
        let xml = r#"<export>
  <sanctionEntity>
    <nameAlias wholeName="Jan Doe"><remark>Owner of A &amp; B &#8211; Ltd</remark></nameAlias>
  </sanctionEntity>
</export>"#;
        let result = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(result[0].remarks, "Owner of A & B \u{2013} Ltd");
    }

    #[test]
    fn test_parse_document_cdata_remark() {
        let xml = r#"<export>
  <sanctionEntity>
    <nameAlias wholeName="Jan Doe"><remark><![CDATA[a <b> c]]></remark></nameAlias>
  </sanctionEntity>
</export>"#;
        let result = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(result[0].remarks, "a <b> c");
    }

    #[test]
    fn test_parse_document_drops_nameless_entities() {
        let xml = r#"<export>
  <sanctionEntity euReferenceNumber="EU.1"><subjectType code="person"/></sanctionEntity>
  <sanctionEntity euReferenceNumber="EU.2"><nameAlias wholeName="Named"/></sanctionEntity>
</export>"#;
        let result = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].eu_reference_number, "EU.2");
    }

    #[test]
    fn test_parse_document_ignores_nested_lookalikes() {
        // A nameAlias nested deeper than a direct child must not provide the name.
        let xml = r#"<export>
  <sanctionEntity>
    <identification><nameAlias wholeName="Wrong"/></identification>
    <nameAlias wholeName="Right"/>
  </sanctionEntity>
</export>"#;
        let result = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(result[0].name, "Right");
    }

    #[test]
    fn test_parse_document_empty_export() {
        let xml = r#"<?xml version="1.0"?><export xmlns="http://eu.europa.ec/fpi/fsd/export"/>"#;
        assert!(parse_document(xml.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_document_wrong_root() {
        let xml = r#"<feed><entry><id>1</id></entry></feed>"#;
        let err = parse_document(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
        assert!(err.to_string().contains("feed"));
    }

    #[test]
    fn test_parse_document_empty_input() {
        assert!(matches!(
            parse_document(b""),
            Err(AppError::ParseError(_))
        ));
        assert!(matches!(
            parse_document(b"not xml at all"),
            Err(AppError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_document_malformed() {
        let xml = r#"<export>
  <sanctionEntity>
    <nameAlias wholeName="Unclosed">
  </sanctionEntity>
</export>"#;
        assert!(matches!(
            parse_document(xml.as_bytes()),
            Err(AppError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_document_truncated() {
        let xml = r#"<export><sanctionEntity><nameAlias wholeName="Cut"/>"#;
        assert!(parse_document(xml.as_bytes()).is_err());
    }
}
