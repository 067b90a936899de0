use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};

use super::helpers::{get_attribute, require_attribute};
use super::{ListxError, ListxStreamer};
use crate::listx::models::{Description, Table, Tag};

impl<R: BufRead> ListxStreamer<R> {
    /// Parse a single table element, including all of its tags
    ///
    /// `empty` is set for a self-closing `<table/>`, which has no children.
    pub(super) fn parse_table(
        &mut self,
        start_event: &BytesStart,
        empty: bool,
    ) -> Result<Table, ListxError> {
        let decoder = self.reader.decoder();
        let name = require_attribute(start_event, "table", "name", decoder)?;
        if name.is_empty() {
            return Err(ListxError::InvalidStructure(
                "<table> with an empty name".to_string(),
            ));
        }

        let mut table = Table {
            name,
            g0: get_attribute(start_event, "g0", decoder)?,
            g1: get_attribute(start_event, "g1", decoder)?,
            g2: get_attribute(start_event, "g2", decoder)?,
            ..Default::default()
        };

        if empty {
            return Ok(table);
        }

        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"tag" => {
                        let tag = self.parse_tag(e, false)?;
                        table.tags.push(tag);
                    }
                    b"desc" => {
                        table.description = Some(self.parse_desc(e, false)?);
                    }
                    _ => self.skip_element(e)?,
                },
                Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"tag" => {
                        let tag = self.parse_tag(e, true)?;
                        table.tags.push(tag);
                    }
                    b"desc" => {
                        table.description = Some(self.parse_desc(e, true)?);
                    }
                    _ => {}
                },
                // Only </table> can get here, quick-xml checks end names
                Ok(Event::End(_)) => break,
                Ok(Event::Eof) => {
                    return Err(ListxError::InvalidStructure(format!(
                        "unexpected end of document inside <table name=\"{}\">",
                        table.name
                    )));
                }
                Err(e) => return Err(ListxError::from_xml(e)),
                _ => {}
            }
            buf.clear();
        }

        log::debug!("Decoded table {} ({} tags)", table.name, table.tags.len());
        Ok(table)
    }

    /// Parse a tag element and its descriptions
    fn parse_tag(&mut self, start_event: &BytesStart, empty: bool) -> Result<Tag, ListxError> {
        let decoder = self.reader.decoder();
        let mut tag = Tag {
            id: get_attribute(start_event, "id", decoder)?,
            name: require_attribute(start_event, "tag", "name", decoder)?,
            tag_type: require_attribute(start_event, "tag", "type", decoder)?,
            writable: get_attribute(start_event, "writable", decoder)?.unwrap_or_default(),
            g2: get_attribute(start_event, "g2", decoder)?,
            descriptions: Vec::new(),
        };

        if empty {
            return Ok(tag);
        }

        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    if e.local_name().as_ref() == b"desc" {
                        let desc = self.parse_desc(e, false)?;
                        tag.descriptions.push(desc);
                    } else {
                        self.skip_element(e)?;
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    if e.local_name().as_ref() == b"desc" {
                        let desc = self.parse_desc(e, true)?;
                        tag.descriptions.push(desc);
                    }
                }
                Ok(Event::End(_)) => break,
                Ok(Event::Eof) => {
                    return Err(ListxError::InvalidStructure(format!(
                        "unexpected end of document inside <tag name=\"{}\">",
                        tag.name
                    )));
                }
                Err(e) => return Err(ListxError::from_xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(tag)
    }

    /// Parse a desc element, concatenating all of its character data
    fn parse_desc(
        &mut self,
        start_event: &BytesStart,
        empty: bool,
    ) -> Result<Description, ListxError> {
        let lang = get_attribute(start_event, "lang", self.reader.decoder())?.unwrap_or_default();
        let mut text = String::new();

        if empty {
            return Ok(Description { lang, text });
        }

        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Text(ref t)) => {
                    text.push_str(&t.unescape().map_err(ListxError::from_xml)?);
                }
                Ok(Event::CData(ref c)) => {
                    text.push_str(&c.decode()?);
                }
                Ok(Event::Start(ref e)) => self.skip_element(e)?,
                Ok(Event::End(_)) => break,
                Ok(Event::Eof) => {
                    return Err(ListxError::InvalidStructure(
                        "unexpected end of document inside <desc>".to_string(),
                    ));
                }
                Err(e) => return Err(ListxError::from_xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(Description { lang, text })
    }

    /// Skip an element we do not consume, including its whole sub-tree
    fn skip_element(&mut self, start_event: &BytesStart) -> Result<(), ListxError> {
        let end = start_event.to_end().into_owned();
        let mut buf = Vec::new();
        self.reader
            .read_to_end_into(end.name(), &mut buf)
            .map_err(ListxError::from_xml)?;
        Ok(())
    }
}
