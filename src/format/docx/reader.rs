//! DOCX package reader.

use std::io::{Cursor, Read, Seek};

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use super::{CORE_PART, DOCUMENT_PART};
use crate::error::{Error, Result};
use crate::model::{Alignment, Block, Document, Metadata, Run, Spacing};

/// Parse a DOCX package.
pub(super) fn read_package(bytes: &[u8]) -> Result<Document> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let document_xml = read_part(&mut archive, DOCUMENT_PART)?.ok_or_else(|| {
        Error::InvalidDocumentStructure(format!("package has no {}", DOCUMENT_PART))
    })?;
    let blocks = parse_body(&document_xml)?;

    let metadata = match read_part(&mut archive, CORE_PART)? {
        Some(core_xml) => parse_core(&core_xml)?,
        None => Metadata::default(),
    };

    log::debug!("read DOCX package: {} blocks", blocks.len());
    Ok(Document { metadata, blocks })
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    part.read_to_string(&mut content)?;
    Ok(Some(content))
}

/// Extract an attribute value by key.
fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(|a| a.ok())
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

fn get_attr_u32(e: &BytesStart, key: &[u8]) -> Option<u32> {
    get_attr(e, key).and_then(|s| s.parse().ok())
}

/// Whether `w:val` switches a toggle property off.
fn val_off(e: &BytesStart) -> bool {
    matches!(get_attr(e, b"w:val").as_deref(), Some("0" | "false" | "off"))
}

/// A paragraph being read. Its block is written to `index` when it closes.
struct OpenParagraph {
    index: usize,
    block: Block,
    run: Option<Run>,
    in_paragraph_props: bool,
    in_run_props: bool,
    in_text: bool,
}

impl OpenParagraph {
    fn new(index: usize) -> Self {
        Self {
            index,
            block: Block::new(),
            run: None,
            in_paragraph_props: false,
            in_run_props: false,
            in_text: false,
        }
    }
}

/// Walk state for `word/document.xml`.
///
/// Paragraphs nest when a run holds a text box, so open paragraphs form a
/// stack. Each paragraph keeps the slot it was opened in, so blocks come
/// out in the order their paragraphs start.
#[derive(Default)]
struct BodyState {
    blocks: Vec<Block>,
    open: Vec<OpenParagraph>,
    /// Depth inside `mc:Fallback`, which repeats the `mc:Choice` content
    fallback_depth: usize,
}

impl BodyState {
    fn start_element(&mut self, e: &BytesStart, empty: bool) {
        let name = e.name();
        let name = name.as_ref();
        if name == b"mc:Fallback" {
            if !empty {
                self.fallback_depth += 1;
            }
            return;
        }
        if self.fallback_depth > 0 {
            return;
        }

        if name == b"w:p" {
            self.blocks.push(Block::new());
            if !empty {
                self.open.push(OpenParagraph::new(self.blocks.len() - 1));
            }
            return;
        }

        let Some(paragraph) = self.open.last_mut() else {
            return;
        };
        match name {
            b"w:pPr" if !empty && paragraph.run.is_none() => paragraph.in_paragraph_props = true,
            b"w:r" if !empty => paragraph.run = Some(Run::new("")),
            b"w:rPr" if paragraph.run.is_some() && !empty => paragraph.in_run_props = true,
            b"w:t" if paragraph.run.is_some() && !empty => paragraph.in_text = true,
            _ if paragraph.in_run_props => run_property(paragraph, e),
            _ if paragraph.in_paragraph_props => paragraph_property(paragraph, e),
            b"w:tab" => push_text(paragraph, "\t"),
            b"w:br" | b"w:cr" => push_text(paragraph, "\n"),
            _ => {}
        }
    }

    fn end_element(&mut self, name: &[u8]) {
        if name == b"mc:Fallback" {
            self.fallback_depth = self.fallback_depth.saturating_sub(1);
            return;
        }
        if self.fallback_depth > 0 {
            return;
        }

        if name == b"w:p" {
            if let Some(mut paragraph) = self.open.pop() {
                if let Some(run) = paragraph.run.take() {
                    push_run(&mut paragraph.block, run);
                }
                self.blocks[paragraph.index] = paragraph.block;
            }
            return;
        }

        let Some(paragraph) = self.open.last_mut() else {
            return;
        };
        match name {
            b"w:pPr" => paragraph.in_paragraph_props = false,
            b"w:r" => {
                if let Some(run) = paragraph.run.take() {
                    push_run(&mut paragraph.block, run);
                }
                paragraph.in_run_props = false;
            }
            b"w:rPr" => paragraph.in_run_props = false,
            b"w:t" => paragraph.in_text = false,
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.fallback_depth > 0 {
            return;
        }
        if let Some(paragraph) = self.open.last_mut() {
            if paragraph.in_text {
                push_text(paragraph, text);
            }
        }
    }
}

fn push_text(paragraph: &mut OpenParagraph, text: &str) {
    if let Some(run) = paragraph.run.as_mut() {
        run.text.push_str(text);
    }
}

fn run_property(paragraph: &mut OpenParagraph, e: &BytesStart) {
    let Some(run) = paragraph.run.as_mut() else {
        return;
    };
    let style = &mut run.style;
    match e.name().as_ref() {
        b"w:b" => style.bold = !val_off(e),
        b"w:i" => style.italic = !val_off(e),
        b"w:u" => {
            style.underline = !matches!(get_attr(e, b"w:val").as_deref(), Some("none"))
                && !val_off(e)
        }
        b"w:rFonts" => {
            if let Some(font) = get_attr(e, b"w:ascii").or_else(|| get_attr(e, b"w:hAnsi")) {
                style.font = Some(font);
            }
        }
        b"w:sz" => {
            if let Some(size) = get_attr_u32(e, b"w:val") {
                style.size = Some(size);
            }
        }
        _ => {}
    }
}

fn paragraph_property(paragraph: &mut OpenParagraph, e: &BytesStart) {
    let block = &mut paragraph.block;
    match e.name().as_ref() {
        b"w:spacing" => {
            let default = Spacing::default();
            block.style.spacing = Some(Spacing::new(
                get_attr_u32(e, b"w:before").unwrap_or(default.before),
                get_attr_u32(e, b"w:after").unwrap_or(default.after),
                get_attr_u32(e, b"w:line").unwrap_or(default.line),
            ));
        }
        b"w:jc" => {
            if let Some(alignment) =
                get_attr(e, b"w:val").and_then(|v| Alignment::from_ooxml(&v))
            {
                block.style.alignment = Some(alignment);
            }
        }
        _ => {}
    }
}

/// Runs without text carry nothing the pipeline uses.
fn push_run(block: &mut Block, run: Run) {
    if !run.text.is_empty() {
        block.add_run(run);
    }
}

/// Parse the paragraphs of `word/document.xml` in document order.
///
/// Blocks are ordered by where their paragraph starts: table cell paragraphs
/// read in place, and a text-box paragraph follows the paragraph anchoring
/// it. The `mc:Fallback` copy of alternate content is skipped.
fn parse_body(xml: &str) -> Result<Vec<Block>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut state = BodyState::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => state.start_element(&e, false),
            Event::Empty(e) => state.start_element(&e, true),
            Event::End(e) => state.end_element(e.name().as_ref()),
            Event::Text(e) => {
                let text = e.unescape()?;
                state.text(&text);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e);
                state.text(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(state.blocks)
}

/// Parse `docProps/core.xml`.
fn parse_core(xml: &str) -> Result<Metadata> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut metadata = Metadata::default();
    let mut current: Option<Vec<u8>> = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => current = Some(e.name().as_ref().to_vec()),
            Event::End(_) => current = None,
            Event::Text(e) => {
                let text = e.unescape()?.trim().to_string();
                if text.is_empty() {
                    continue;
                }
                match current.as_deref() {
                    Some(b"dc:title") => metadata.title = Some(text),
                    Some(b"dc:creator") => metadata.creator = Some(text),
                    Some(b"dc:subject") => metadata.subject = Some(text),
                    Some(b"dcterms:created") => metadata.created = parse_datetime(&text),
                    Some(b"dcterms:modified") => metadata.modified = parse_datetime(&text),
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(metadata)
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
