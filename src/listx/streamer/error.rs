/// Errors that can occur while reading -listx XML
#[derive(Debug, thiserror::Error)]
pub enum ListxError {
    /// Error parsing XML
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// I/O error while reading the source
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid -listx document structure
    #[error("Invalid -listx structure: {0}")]
    InvalidStructure(String),

    /// Required XML attribute is missing
    #[error("Missing required attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        /// Element name
        element: &'static str,
        /// Attribute name
        attribute: &'static str,
    },
}

impl ListxError {
    /// Lift quick-xml I/O failures into [`ListxError::IoError`]
    ///
    /// quick-xml wraps reader failures in `Error::Io`; callers need to tell
    /// those apart from malformed input.
    pub(super) fn from_xml(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(io) => ListxError::IoError(
                std::sync::Arc::try_unwrap(io)
                    .unwrap_or_else(|shared| std::io::Error::new(shared.kind(), shared.to_string())),
            ),
            other => ListxError::XmlError(other),
        }
    }

    /// True when the failure came from the underlying reader
    pub fn is_io(&self) -> bool {
        matches!(self, ListxError::IoError(_))
    }
}

impl From<quick_xml::events::attributes::AttrError> for ListxError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ListxError::XmlError(quick_xml::Error::from(err))
    }
}

impl From<quick_xml::encoding::EncodingError> for ListxError {
    fn from(err: quick_xml::encoding::EncodingError) -> Self {
        ListxError::XmlError(quick_xml::Error::from(err))
    }
}
