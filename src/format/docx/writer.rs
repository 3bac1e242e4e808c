//! DOCX package writer.

use std::fmt::Write as _;
use std::io::{Cursor, Write};

use chrono::{SecondsFormat, Utc};
use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{CORE_PART, DOCUMENT_PART};
use crate::error::Result;
use crate::model::{Block, Document, Metadata, Run};
use crate::style::StyleProfile;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

const DOCUMENT_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

const DOCUMENT_CLOSE: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#;

/// Serialize a document as a DOCX package.
pub(super) fn write_package(doc: &Document, profile: &StyleProfile) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(ROOT_RELS.as_bytes())?;

    zip.start_file(DOCUMENT_PART, options)?;
    zip.write_all(document_xml(doc, profile).as_bytes())?;

    zip.start_file(CORE_PART, options)?;
    zip.write_all(core_xml(&doc.metadata).as_bytes())?;

    let cursor = zip.finish()?;
    log::debug!("wrote DOCX package: {} blocks", doc.block_count());
    Ok(cursor.into_inner())
}

fn document_xml(doc: &Document, profile: &StyleProfile) -> String {
    let mut xml = String::from(DOCUMENT_OPEN);
    for block in &doc.blocks {
        write_paragraph(&mut xml, block, profile);
    }
    xml.push_str(DOCUMENT_CLOSE);
    xml
}

fn write_paragraph(xml: &mut String, block: &Block, profile: &StyleProfile) {
    let style = profile.complete_block(&block.style);
    xml.push_str("<w:p><w:pPr>");
    if let Some(spacing) = style.spacing {
        let _ = write!(
            xml,
            r#"<w:spacing w:before="{}" w:after="{}" w:line="{}" w:lineRule="auto"/>"#,
            spacing.before, spacing.after, spacing.line
        );
    }
    if let Some(alignment) = style.alignment {
        let _ = write!(xml, r#"<w:jc w:val="{}"/>"#, alignment.as_ooxml());
    }
    xml.push_str("</w:pPr>");

    for run in &block.runs {
        write_run(xml, run, profile);
    }
    xml.push_str("</w:p>");
}

fn write_run(xml: &mut String, run: &Run, profile: &StyleProfile) {
    let style = profile.complete(&run.style);

    xml.push_str("<w:r><w:rPr>");
    if let Some(font) = &style.font {
        let font = escape(font.as_str());
        let _ = write!(
            xml,
            r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:cs="{0}"/>"#,
            font
        );
    }
    if style.bold {
        xml.push_str("<w:b/>");
    }
    if style.italic {
        xml.push_str("<w:i/>");
    }
    if let Some(size) = style.size {
        let _ = write!(xml, r#"<w:sz w:val="{}"/>"#, size);
    }
    if style.underline {
        xml.push_str(r#"<w:u w:val="single"/>"#);
    }
    xml.push_str("</w:rPr>");

    write_run_text(xml, &run.text);
    xml.push_str("</w:r>");
}

/// Text goes into `w:t` pieces; tabs and line breaks become elements.
fn write_run_text(xml: &mut String, text: &str) {
    let mut piece = String::new();
    let flush = |xml: &mut String, piece: &mut String| {
        if !piece.is_empty() {
            let _ = write!(
                xml,
                r#"<w:t xml:space="preserve">{}</w:t>"#,
                escape(piece.as_str())
            );
            piece.clear();
        }
    };

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\t' => {
                flush(xml, &mut piece);
                xml.push_str("<w:tab/>");
            }
            '\r' => {
                flush(xml, &mut piece);
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                xml.push_str("<w:br/>");
            }
            '\n' => {
                flush(xml, &mut piece);
                xml.push_str("<w:br/>");
            }
            _ => piece.push(ch),
        }
    }
    flush(xml, &mut piece);
}

fn core_xml(metadata: &Metadata) -> String {
    let now = Utc::now();
    let created = metadata.created.unwrap_or(now);
    let modified = metadata.modified.unwrap_or(now);

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    );
    if let Some(title) = &metadata.title {
        let _ = write!(xml, "<dc:title>{}</dc:title>", escape(title.as_str()));
    }
    if let Some(subject) = &metadata.subject {
        let _ = write!(xml, "<dc:subject>{}</dc:subject>", escape(subject.as_str()));
    }
    if let Some(creator) = &metadata.creator {
        let _ = write!(xml, "<dc:creator>{}</dc:creator>", escape(creator.as_str()));
    }
    let _ = write!(
        xml,
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>"#,
        created.to_rfc3339_opts(SecondsFormat::Secs, true),
        modified.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    xml.push_str("</cp:coreProperties>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, BlockStyle, TextStyle};

    #[test]
    fn test_run_text_elements() {
        let mut xml = String::new();
        write_run_text(&mut xml, "A.\t\"Affiliate\" <x>\r\nnext");
        assert_eq!(
            xml,
            "<w:t xml:space=\"preserve\">A.</w:t><w:tab/>\
             <w:t xml:space=\"preserve\">&quot;Affiliate&quot; &lt;x&gt;</w:t><w:br/>\
             <w:t xml:space=\"preserve\">next</w:t>"
        );
    }

    #[test]
    fn test_paragraph_uses_profile_for_gaps() {
        let block = Block::from_runs(
            vec![Run::styled(
                "Heading",
                TextStyle {
                    bold: true,
                    ..Default::default()
                },
            )],
            BlockStyle {
                spacing: None,
                alignment: Some(Alignment::Center),
            },
        );
        let mut xml = String::new();
        write_paragraph(&mut xml, &block, &StyleProfile::fallback());

        assert!(xml.contains(r#"<w:spacing w:before="240" w:after="240" w:line="360""#));
        assert!(xml.contains(r#"<w:jc w:val="center"/>"#));
        assert!(xml.contains(r#"w:ascii="Times New Roman""#));
        assert!(xml.contains(r#"<w:sz w:val="24"/>"#));
        assert!(xml.contains("<w:b/>"));
        assert!(!xml.contains("<w:u "));
    }

    #[test]
    fn test_core_xml_escapes_metadata() {
        let metadata = Metadata {
            title: Some("R&D <Agreement>".into()),
            ..Default::default()
        };
        let xml = core_xml(&metadata);
        assert!(xml.contains("<dc:title>R&amp;D &lt;Agreement&gt;</dc:title>"));
        assert!(xml.contains("<dcterms:modified"));
        assert!(!xml.contains("<dc:creator>"));
    }
}
