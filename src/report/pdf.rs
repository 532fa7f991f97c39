//! Paginated PDF rendering.
//!
//! Layout is computed first as plain data ([`layout`]) and then drawn with
//! printpdf's built-in Helvetica, so pagination can be checked without
//! parsing PDF output.

use crate::error::{Error, Result};
use printpdf::{BuiltinFont, Mm, PdfDocument};

pub const TITLE: &str = "Hardware Compatibility Report";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const TOP_MM: f32 = PAGE_HEIGHT_MM - 20.0;
const BOTTOM_MM: f32 = 15.0;

const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;
const TITLE_GAP_MM: f32 = 15.0;
const LINE_HEIGHT_MM: f32 = 6.5;
const PARAGRAPH_GAP_MM: f32 = 2.5;

// Helvetica averages a little over half an em per glyph.
const AVG_GLYPH_EM: f32 = 0.55;
const PT_TO_MM: f32 = 0.3528;

/// One run of text at a fixed position. Coordinates are in millimetres from
/// the bottom-left corner of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
    pub size: f32,
    pub bold: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub items: Vec<PlacedText>,
}

fn text_width_mm(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_EM * PT_TO_MM
}

/// Characters that fit between the margins at body size.
pub fn wrap_columns() -> usize {
    let usable = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    (usable / (BODY_SIZE * AVG_GLYPH_EM * PT_TO_MM)).floor() as usize
}

/// Restrict `text` to what the built-in fonts can draw.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '—' | '–' => out.push('-'),
            '✅' => out.push_str("[OK]"),
            '❌' => out.push_str("[FAIL]"),
            '\u{fe0f}' => {}
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            '\t' => out.push(' '),
            _ => out.push('?'),
        }
    }
    out
}

/// Greedy word wrap at `columns` characters. Words longer than a row are
/// split. Always returns at least one row.
pub fn wrap(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > columns {
            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
            }
            rows.push(word.drain(..columns).collect());
        }
        if word.is_empty() {
            continue;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > columns {
            rows.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

/// Place a centered title and one paragraph per line, starting a new page
/// whenever the next row would cross the bottom margin.
pub fn layout(title: &str, lines: &[String]) -> Vec<PageLayout> {
    let mut pages = vec![PageLayout::default()];

    let title = transliterate(title);
    let title_x = ((PAGE_WIDTH_MM - text_width_mm(&title, TITLE_SIZE)) / 2.0).max(MARGIN_MM);
    pages[0].items.push(PlacedText {
        text: title,
        x_mm: title_x,
        y_mm: TOP_MM,
        size: TITLE_SIZE,
        bold: true,
    });

    let columns = wrap_columns();
    let mut y = TOP_MM - TITLE_GAP_MM;

    for line in lines {
        for row in wrap(&transliterate(line), columns) {
            if y < BOTTOM_MM {
                pages.push(PageLayout::default());
                y = TOP_MM;
            }
            if let Some(page) = pages.last_mut() {
                page.items.push(PlacedText {
                    text: row,
                    x_mm: MARGIN_MM,
                    y_mm: y,
                    size: BODY_SIZE,
                    bold: false,
                });
            }
            y -= LINE_HEIGHT_MM;
        }
        y -= PARAGRAPH_GAP_MM;
    }

    pages
}

fn document_error(e: impl std::fmt::Display) -> Error {
    Error::Document(e.to_string())
}

/// Render `lines` as an A4 PDF document titled `title`.
pub fn render(title: &str, lines: &[String]) -> Result<Vec<u8>> {
    let pages = layout(title, lines);

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(document_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(document_error)?;

    for (i, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for item in &page.items {
            let font = if item.bold { &bold } else { &regular };
            layer.use_text(
                item.text.clone(),
                item.size,
                Mm(item.x_mm),
                Mm(item.y_mm),
                font,
            );
        }
    }

    doc.save_to_bytes().map_err(document_error)
}
