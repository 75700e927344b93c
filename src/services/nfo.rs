//! NFO metadata emitter
//!
//! Serializes a [MovieRecord] into the fixed-schema `movie.nfo` document
//! consumed by media-library software. Absent optional fields are written as
//! empty elements so the document shape stays the same regardless of what
//! the source page carried.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::ScrapeError;
use crate::services::catalog::MovieRecord;

pub const NFO_FILENAME: &str = "movie.nfo";

/// Write the metadata document for `record` to `path`.
pub fn write_nfo(record: &MovieRecord, path: &Path) -> Result<(), ScrapeError> {
    let mut xml = render(record)?;
    xml.push('\n');
    fs::write(path, xml)?;
    Ok(())
}

/// Render the metadata document: title as `"CODE Title"`, the scalar fields,
/// a nested set grouping for the series, then one element per genre and one
/// per actor.
fn render(record: &MovieRecord) -> Result<String, ScrapeError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("movie")))?;

    write_text(
        &mut writer,
        "title",
        &format!("{} {}", record.code, record.title),
    )?;
    write_text(
        &mut writer,
        "premiered",
        &record
            .premiered
            .map(|d| d.to_string())
            .unwrap_or_default(),
    )?;
    write_text(
        &mut writer,
        "runtime",
        &record.runtime.map(|r| r.to_string()).unwrap_or_default(),
    )?;
    write_text(&mut writer, "director", record.director.as_deref().unwrap_or_default())?;
    write_text(&mut writer, "studio", record.studio.as_deref().unwrap_or_default())?;

    writer.write_event(Event::Start(BytesStart::new("set")))?;
    write_text(&mut writer, "name", record.series.as_deref().unwrap_or_default())?;
    writer.write_event(Event::End(BytesEnd::new("set")))?;

    for genre in &record.genres {
        write_text(&mut writer, "genre", genre)?;
    }

    for actor in &record.actors {
        writer.write_event(Event::Start(BytesStart::new("actor")))?;
        write_text(&mut writer, "name", &actor.name)?;
        write_text(
            &mut writer,
            "role",
            actor.role.map(|r| r.label()).unwrap_or_default(),
        )?;
        writer.write_event(Event::End(BytesEnd::new("actor")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("movie")))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

fn write_text<W: std::io::Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> Result<(), ScrapeError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
