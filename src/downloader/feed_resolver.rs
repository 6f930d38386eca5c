use crate::constants::XML_ENCLOSURE_TYPE;
use crate::errors::{AppError, AppResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use url::Url;

/// Finds the XML export announced by the sanctions RSS feed.
///
/// Returns the first enclosure whose `type` is `application/xml`, in document order.
/// RSS `<enclosure url=".."/>` elements and Atom `<link rel="enclosure" href=".."/>`
/// elements are both recognized. Relative links are resolved against `base_url`.
///
/// # Errors
///
/// Returns `FetchError` when the feed is not readable XML, announces no XML
/// enclosure, or its enclosure link cannot be resolved.
pub fn parse_enclosure_url(feed: &[u8], base_url: &Url) -> AppResult<Url> {
    let mut reader = Reader::from_reader(feed);
    let mut buf = Vec::with_capacity(4096);

    loop {
        buf.clear();
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| AppError::FetchError(format!("Unreadable RSS feed: {e}")))?;
        match event {
            Event::Start(e) | Event::Empty(e) => {
                if let Some(href) = enclosure_href(&reader, &e)? {
                    return base_url.join(href.trim()).map_err(|e| {
                        AppError::FetchError(format!("Invalid XML link in the RSS feed: {e}"))
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Err(AppError::FetchError(
        "No XML link found in the RSS feed".to_string(),
    ))
}

fn enclosure_href(reader: &Reader<&[u8]>, e: &BytesStart) -> AppResult<Option<String>> {
    let href_key: &[u8] = match e.local_name().as_ref() {
        b"enclosure" => b"url",
        b"link" if attribute(reader, e, b"rel")?.as_deref() == Some("enclosure") => b"href",
        _ => return Ok(None),
    };

    let is_xml = attribute(reader, e, b"type")?
        .is_some_and(|t| t.trim().eq_ignore_ascii_case(XML_ENCLOSURE_TYPE));
    if !is_xml {
        return Ok(None);
    }

    // Some feeds write `href` on RSS enclosures as well.
    let href = match attribute(reader, e, href_key)? {
        Some(href) => Some(href),
        None => attribute(reader, e, b"href")?,
    };
    Ok(href.filter(|h| !h.trim().is_empty()))
}

fn attribute(reader: &Reader<&[u8]>, e: &BytesStart, key: &[u8]) -> AppResult<Option<String>> {
    let attr = e
        .try_get_attribute(key)
        .map_err(|err| AppError::FetchError(format!("Unreadable RSS feed: {err}")))?;
    match attr {
        Some(attr) => Ok(Some(
            attr.decode_and_unescape_value(reader.decoder())
                .map_err(|err| AppError::FetchError(format!("Unreadable RSS feed: {err}")))?
                .into_owned(),
        )),
        None => Ok(None),
    }
}
