use super::*;
use crate::listx::models::Description;
use std::io::Cursor;

const MINIMAL_LISTX: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<!-- Generated by Image::ExifTool 12.76 -->
<taginfo>

<table name='EXIF' g0='EXIF' g1='IFD0' g2='Image'>
 <desc lang='en'>Exif</desc>
 <tag id='271' name='Make' type='string' writable='true' g2='Camera'>
  <desc lang='en'>Make</desc>
  <desc lang='de'>Hersteller</desc>
 </tag>
 <tag id='272' name='Model' type='string' writable='false'/>
</table>

<table name='Empty' g0='File' g1='File' g2='Other'>
 <desc lang='en'>Nothing here</desc>
</table>

</taginfo>
"#;

fn open_str(xml: &str) -> ListxStreamer<Cursor<&[u8]>> {
    ListxStreamer::new(Cursor::new(xml.as_bytes()))
}

#[test]
fn test_parse_minimal_listx() {
    let mut streamer = open_str(MINIMAL_LISTX);

    let table = streamer.next_table().unwrap().unwrap();
    assert_eq!(table.name, "EXIF");
    assert_eq!(table.g0.as_deref(), Some("EXIF"));
    assert_eq!(table.g1.as_deref(), Some("IFD0"));
    assert_eq!(table.g2.as_deref(), Some("Image"));
    assert_eq!(table.description, Some(Description::new("en", "Exif")));
    assert_eq!(table.tag_count(), 2);

    let make = &table.tags[0];
    assert_eq!(make.id.as_deref(), Some("271"));
    assert_eq!(make.name, "Make");
    assert_eq!(make.tag_type, "string");
    assert_eq!(make.writable, "true");
    assert_eq!(make.g2.as_deref(), Some("Camera"));
    assert_eq!(
        make.descriptions,
        vec![
            Description::new("en", "Make"),
            Description::new("de", "Hersteller")
        ]
    );

    let model = &table.tags[1];
    assert_eq!(model.name, "Model");
    assert_eq!(model.writable, "false");
    assert!(model.descriptions.is_empty());

    let empty = streamer.next_table().unwrap().unwrap();
    assert_eq!(empty.name, "Empty");
    assert!(empty.is_empty());

    assert!(streamer.next_table().unwrap().is_none());
    assert_eq!(streamer.tables_read(), 2);
    // Further calls keep reporting the end
    assert!(streamer.next_table().unwrap().is_none());
}

#[test]
fn test_table_iterator() {
    let names: Vec<String> = open_str(MINIMAL_LISTX)
        .tables()
        .map(|t| t.unwrap().name)
        .collect();
    assert_eq!(names, vec!["EXIF", "Empty"]);
}

#[test]
fn test_no_tables() {
    let mut streamer = open_str("<?xml version='1.0'?><taginfo></taginfo>");
    assert!(streamer.next_table().unwrap().is_none());

    let mut streamer = open_str("");
    assert!(streamer.next_table().unwrap().is_none());
}

#[test]
fn test_self_closing_table() {
    let mut streamer = open_str("<taginfo><table name='Bare'/></taginfo>");
    let table = streamer.next_table().unwrap().unwrap();
    assert_eq!(table.name, "Bare");
    assert!(table.is_empty());
    assert!(streamer.next_table().unwrap().is_none());
}

#[test]
fn test_entities_and_whitespace_in_desc() {
    let xml = r#"<taginfo><table name='T'>
<tag name='A' type='string' writable='true'><desc lang='en'> Tom &amp; Jerry </desc><desc lang='fr'><![CDATA[a<b]]></desc></tag>
</table></taginfo>"#;
    let table = open_str(xml).next_table().unwrap().unwrap();
    let descs = &table.tags[0].descriptions;
    assert_eq!(descs[0].text, " Tom & Jerry ");
    assert_eq!(descs[1].text, "a<b");
}

#[test]
fn test_unknown_children_are_skipped() {
    let xml = r#"<taginfo><table name='T'>
<values><key id='1'><val lang='en'>One</val></key></values>
<tag name='A' type='int8u' writable='false'><values><key/></values><desc lang='en'>A</desc></tag>
</table></taginfo>"#;
    let table = open_str(xml).next_table().unwrap().unwrap();
    assert_eq!(table.tag_count(), 1);
    assert_eq!(table.tags[0].descriptions, vec![Description::new("en", "A")]);
}

#[test]
fn test_missing_writable_is_empty() {
    let xml = "<taginfo><table name='T'><tag name='A' type='string'/></table></taginfo>";
    let table = open_str(xml).next_table().unwrap().unwrap();
    assert_eq!(table.tags[0].writable, "");
}

#[test]
fn test_missing_required_attributes() {
    let err = open_str("<table><tag name='A' type='x' writable='true'/></table>")
        .next_table()
        .unwrap_err();
    assert!(matches!(
        err,
        ListxError::MissingAttribute {
            element: "table",
            attribute: "name"
        }
    ));

    let err = open_str("<table name='T'><tag name='A' writable='true'/></table>")
        .next_table()
        .unwrap_err();
    assert!(matches!(
        err,
        ListxError::MissingAttribute {
            element: "tag",
            attribute: "type"
        }
    ));

    let err = open_str("<table name=''/>").next_table().unwrap_err();
    assert!(matches!(err, ListxError::InvalidStructure(_)));
}

#[test]
fn test_unclosed_table() {
    let xml = "<taginfo><table name='EXIF'><tag name='Make' type='string' writable='true'/>";
    let err = open_str(xml).next_table().unwrap_err();
    assert!(matches!(
        err,
        ListxError::InvalidStructure(_) | ListxError::XmlError(_)
    ));
    assert!(!err.is_io());
}

#[test]
fn test_unclosed_root() {
    let mut streamer = open_str("<taginfo><table name='T'/>");
    assert!(streamer.next_table().unwrap().is_some());
    let err = streamer.next_table().unwrap_err();
    assert!(!err.is_io());
}

#[test]
fn test_mismatched_end_tag() {
    let xml = "<taginfo><table name='T'><tag name='A' type='x' writable='true'></desc></table></taginfo>";
    let err = open_str(xml).next_table().unwrap_err();
    assert!(matches!(err, ListxError::XmlError(_)));
}

#[test]
fn test_iterator_stops_after_error() {
    let mut tables = open_str("<taginfo><table name='T'></taginfo>").tables();
    assert!(tables.next().unwrap().is_err());
    assert!(tables.next().is_none());
}
