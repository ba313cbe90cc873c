use super::fonts::{self, Font, PT_PER_MM};
use super::{ExportOptions, SESSION_TITLE};
use crate::error::{PhiloError, Result};
use crate::history::HistoryEntry;
use std::fmt::Write as _;

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN: f64 = 10.0;
const BOTTOM_MARGIN: f64 = 15.0;
/// Horizontal padding inside a cell.
const CELL_PADDING: f64 = 1.0;
const LINE_HEIGHT: f64 = 10.0;
const ENTRY_SPACING: f64 = 10.0;
const BODY_SIZE: f64 = 12.0;
const TITLE_SIZE: f64 = 16.0;

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FIRST_FONT_ID: usize = 3;
const INFO_ID: usize = FIRST_FONT_ID + Font::ALL.len();
const FIRST_PAGE_ID: usize = INFO_ID + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

/// Entry text already encoded for the page fonts.
struct EncodedEntry {
    heading: Vec<u8>,
    body: Vec<u8>,
}

/// Renders a single-column A4 document with automatic page breaks into
/// memory. Nothing touches the filesystem.
pub fn render(entries: &[HistoryEntry], options: &ExportOptions) -> Result<Vec<u8>> {
    let layout = layout(entries, options)?;
    tracing::debug!(pages = layout.pages.len(), "Laid out PDF export");
    Ok(serialize(&layout.pages))
}

/// Encodes everything up front so an unencodable character fails the export
/// before any page exists.
fn encode_entries(entries: &[HistoryEntry], options: &ExportOptions) -> Result<Vec<EncodedEntry>> {
    let policy = options.unsupported_chars;
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let n = i + 1;
            let heading = fonts::encode(&entry.heading(), policy, &format!("entry {} heading", n))?;
            let mut body = b"Input: ".to_vec();
            body.extend(fonts::encode(&entry.input, policy, &format!("entry {} input", n))?);
            body.extend_from_slice(b"\n\nOutput:\n");
            body.extend(fonts::encode(&entry.output, policy, &format!("entry {} output", n))?);
            Ok(EncodedEntry { heading, body })
        })
        .collect()
}

fn layout(entries: &[HistoryEntry], options: &ExportOptions) -> Result<PageLayout> {
    let encoded = encode_entries(entries, options)?;
    let title = fonts::encode(SESSION_TITLE, options.unsupported_chars, "title")?;

    let mut doc = PageLayout::new();
    doc.add_page();
    doc.set_font(Font::HelveticaBold, TITLE_SIZE);
    doc.cell(LINE_HEIGHT, &title, Align::Center);

    for entry in &encoded {
        doc.ln(ENTRY_SPACING);
        doc.set_font(Font::HelveticaBold, BODY_SIZE);
        doc.multi_cell(LINE_HEIGHT, &entry.heading)?;
        doc.set_font(Font::Helvetica, BODY_SIZE);
        doc.multi_cell(LINE_HEIGHT, &entry.body)?;
    }

    Ok(doc)
}

/// Cursor-driven page builder. Coordinates are millimetres from the top-left
/// corner; they are converted to PDF points only when text is emitted.
struct PageLayout {
    pages: Vec<Vec<u8>>,
    x: f64,
    y: f64,
    font: Font,
    size_pt: f64,
}

impl PageLayout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            x: MARGIN,
            y: MARGIN,
            font: Font::Helvetica,
            size_pt: BODY_SIZE,
        }
    }

    fn add_page(&mut self) {
        self.pages.push(Vec::new());
        self.x = MARGIN;
        self.y = MARGIN;
    }

    fn set_font(&mut self, font: Font, size_pt: f64) {
        self.font = font;
        self.size_pt = size_pt;
    }

    fn ln(&mut self, h: f64) {
        self.x = MARGIN;
        self.y += h;
    }

    fn content_width(&self) -> f64 {
        PAGE_WIDTH - MARGIN - self.x
    }

    fn page_break_trigger() -> f64 {
        PAGE_HEIGHT - BOTTOM_MARGIN
    }

    /// Writes one line spanning the remaining width and moves to the next line.
    fn cell(&mut self, h: f64, text: &[u8], align: Align) {
        if self.y + h > Self::page_break_trigger() {
            self.add_page();
        }

        let w = self.content_width();
        if !text.is_empty() {
            let text_x = match align {
                Align::Left => self.x + CELL_PADDING,
                Align::Center => self.x + (w - self.font.string_width(text, self.size_pt)) / 2.0,
            };
            let size_mm = self.size_pt / PT_PER_MM;
            let baseline = self.y + 0.5 * h + 0.3 * size_mm;
            self.show_text(text_x, baseline, text);
        }

        self.ln(h);
    }

    fn show_text(&mut self, x_mm: f64, baseline_mm: f64, text: &[u8]) {
        let mut op = Vec::with_capacity(text.len() + 48);
        op.extend_from_slice(
            format!(
                "BT /{} {:.2} Tf {:.2} {:.2} Td (",
                self.font.resource_name(),
                self.size_pt,
                x_mm * PT_PER_MM,
                (PAGE_HEIGHT - baseline_mm) * PT_PER_MM
            )
            .as_bytes(),
        );
        escape_into(&mut op, text);
        op.extend_from_slice(b") Tj ET\n");

        if let Some(page) = self.pages.last_mut() {
            page.extend(op);
        }
    }

    /// Word-wraps `text` to the page width, one cell per line.
    fn multi_cell(&mut self, h: f64, text: &[u8]) -> Result<()> {
        let max_width = self.content_width() - 2.0 * CELL_PADDING;
        let lines = wrap(text, self.font, self.size_pt, max_width)?;
        for line in lines {
            self.cell(h, &line, Align::Left);
        }
        Ok(())
    }
}

/// Splits on `\n`, then greedily packs words into lines no wider than
/// `max_width`. Spacing inside a line and a paragraph's leading indent are
/// kept as written; the spaces at a wrap point are consumed by the break. A
/// word wider than a whole line is broken between characters.
fn wrap(text: &[u8], font: Font, size_pt: f64, max_width: f64) -> Result<Vec<Vec<u8>>> {
    let width = |bytes: &[u8]| font.string_width(bytes, size_pt);
    let mut lines = Vec::new();

    for paragraph in text.split(|b| *b == b'\n') {
        let mut line: Vec<u8> = Vec::new();
        let mut wrapped = false;

        for (gap, word) in segments(paragraph) {
            if !line.is_empty() {
                let mut candidate = line.clone();
                candidate.extend_from_slice(gap);
                candidate.extend_from_slice(word);
                if width(&candidate[..]) <= max_width {
                    line = candidate;
                    continue;
                }
                lines.push(std::mem::take(&mut line));
                wrapped = true;
            }

            let mut piece = Vec::with_capacity(gap.len() + word.len());
            if !wrapped {
                piece.extend_from_slice(gap);
            }
            piece.extend_from_slice(word);

            if width(&piece[..]) <= max_width {
                line = piece;
                continue;
            }

            for byte in piece {
                if width(std::slice::from_ref(&byte)) > max_width {
                    return Err(PhiloError::ExportRender(
                        "a single character is wider than the page".to_string(),
                    ));
                }
                line.push(byte);
                if width(&line[..]) > max_width {
                    line.pop();
                    lines.push(std::mem::take(&mut line));
                    wrapped = true;
                    line.push(byte);
                }
            }
        }

        lines.push(line);
    }

    Ok(lines)
}

/// `(spaces, word)` pairs covering `paragraph` exactly. The last word may be
/// empty when the paragraph ends in spaces.
fn segments(paragraph: &[u8]) -> Vec<(&[u8], &[u8])> {
    let mut out = Vec::new();
    let mut rest = paragraph;
    while !rest.is_empty() {
        let gap_len = rest.iter().take_while(|b| **b == b' ').count();
        let (gap, tail) = rest.split_at(gap_len);
        let word_len = tail.iter().take_while(|b| **b != b' ').count();
        let (word, tail) = tail.split_at(word_len);
        out.push((gap, word));
        rest = tail;
    }
    out
}

fn escape_into(out: &mut Vec<u8>, text: &[u8]) {
    for &byte in text {
        if matches!(byte, b'\\' | b'(' | b')') {
            out.push(b'\\');
        }
        out.push(byte);
    }
}

/// Assembles the object graph and cross-reference table.
fn serialize(pages: &[Vec<u8>]) -> Vec<u8> {
    let mut writer = ObjectWriter::new();
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| FIRST_PAGE_ID + 2 * i).collect();

    writer.object(CATALOG_ID, format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID).as_bytes());

    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");
    writer.object(
        PAGES_ID,
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages.len()).as_bytes(),
    );

    for (i, font) in Font::ALL.iter().enumerate() {
        writer.object(
            FIRST_FONT_ID + i,
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_font()
            )
            .as_bytes(),
        );
    }

    let created = chrono::Local::now().format("%Y%m%d%H%M%S");
    writer.object(
        INFO_ID,
        format!(
            "<< /Title ({}) /Producer (philo {}) /CreationDate (D:{}) >>",
            SESSION_TITLE,
            env!("CARGO_PKG_VERSION"),
            created
        )
        .as_bytes(),
    );

    let mut font_resources = String::new();
    for (i, font) in Font::ALL.iter().enumerate() {
        let _ = write!(font_resources, "/{} {} 0 R ", font.resource_name(), FIRST_FONT_ID + i);
    }

    for (content, page_id) in pages.iter().zip(&page_ids) {
        let content_id = page_id + 1;
        writer.object(
            *page_id,
            format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources << /Font << {}>> >> /Contents {} 0 R >>",
                PAGES_ID,
                PAGE_WIDTH * PT_PER_MM,
                PAGE_HEIGHT * PT_PER_MM,
                font_resources,
                content_id
            )
            .as_bytes(),
        );
        writer.stream(content_id, content);
    }

    writer.finish(CATALOG_ID, INFO_ID)
}

struct ObjectWriter {
    buf: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl ObjectWriter {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, id: usize, body: &[u8]) {
        self.offsets.push((id, self.buf.len()));
        self.buf.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, id: usize, data: &[u8]) {
        let mut body = format!("<< /Length {} >>\nstream\n", data.len()).into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(b"\nendstream");
        self.object(id, &body);
    }

    fn finish(mut self, root: usize, info: usize) -> Vec<u8> {
        self.offsets.sort_unstable();
        let size = self.offsets.len() + 1;
        let xref_offset = self.buf.len();

        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for (_, offset) in &self.offsets {
            let _ = write!(xref, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, root, info, xref_offset
        );

        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}
