use quick_xml::encoding::Decoder;
use quick_xml::events::BytesStart;

use super::ListxError;

/// Helper function to get a decoded, unescaped attribute value from a BytesStart
pub(super) fn get_attribute(
    e: &BytesStart,
    name: &str,
    decoder: Decoder,
) -> Result<Option<String>, ListxError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr
                .decode_and_unescape_value(decoder)
                .map_err(ListxError::from_xml)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Like [`get_attribute`], but the attribute must be present
pub(super) fn require_attribute(
    e: &BytesStart,
    element: &'static str,
    attribute: &'static str,
    decoder: Decoder,
) -> Result<String, ListxError> {
    get_attribute(e, attribute, decoder)?.ok_or(ListxError::MissingAttribute { element, attribute })
}
