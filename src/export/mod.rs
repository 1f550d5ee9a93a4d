// PDF export of the generated screenplay

use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const DOCUMENT_TITLE: &str = "Generated Screenplay";
pub const EXPORT_FILE_NAME: &str = "screenplay.pdf";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const LEFT_MARGIN_MM: f32 = 15.0;
const TITLE_TOP_MM: f32 = 20.0;
const BODY_TOP_MM: f32 = 30.0;
const LINE_HEIGHT_MM: f32 = 5.0;
const TITLE_FONT_SIZE: f32 = 16.0;
const BODY_FONT_SIZE: f32 = 12.0;

/// Courier 12pt glyphs are 7.2pt wide, so a 180mm text block holds 70 columns.
pub const WRAP_COLUMNS: usize = 70;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    EmptyDocument,
    #[error("screenplay is still being generated")]
    NotReady,
    #[error("failed to build PDF: {0}")]
    Pdf(#[from] printpdf::Error),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Word-wrapped text split into pages, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLayout {
    pub title: String,
    pub pages: Vec<Vec<String>>,
}

impl DocumentLayout {
    pub fn new(text: &str) -> Result<Self, ExportError> {
        if text.trim().is_empty() {
            return Err(ExportError::EmptyDocument);
        }

        let lines = wrap_text(text, WRAP_COLUMNS);
        Ok(Self {
            title: DOCUMENT_TITLE.to_string(),
            pages: paginate(lines),
        })
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }
}

// Baselines run from the top offset down to 20mm above the page edge in 5mm
// steps: 30..=275 on page one, 20..=275 after that.
/// Body lines on the first page, below the title.
pub const FIRST_PAGE_LINES: usize = 50;
/// Body lines on every following page.
pub const PAGE_LINES: usize = 52;

fn paginate(lines: Vec<String>) -> Vec<Vec<String>> {
    let mut pages = Vec::new();
    let mut rest = lines.into_iter().peekable();

    let first: Vec<String> = rest.by_ref().take(FIRST_PAGE_LINES).collect();
    pages.push(first);

    while rest.peek().is_some() {
        pages.push(rest.by_ref().take(PAGE_LINES).collect());
    }

    pages
}

/// Wrap `text` to `columns` display cells.
///
/// Explicit newlines and blank lines are kept. Lines that already fit are left
/// untouched so screenplay indentation survives; longer ones wrap at spaces
/// and keep their leading indent on the first row only. Words wider than a
/// full row are split.
pub fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut out = Vec::new();

    for raw in text.split('\n') {
        let line = raw.trim_end_matches('\r').replace('\t', "    ");
        if line.width() <= columns || line.trim().is_empty() {
            out.push(line.trim_end().to_string());
            continue;
        }

        let indent_len = line.len() - line.trim_start().len();
        let mut current = line[..indent_len].to_string();
        let mut current_width = current.width();
        let mut row_has_word = false;

        for word in line.split_whitespace() {
            let word_width = word.width();
            let needed = if row_has_word { word_width + 1 } else { word_width };

            if current_width + needed <= columns {
                if row_has_word {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += needed;
                row_has_word = true;
                continue;
            }

            if row_has_word {
                out.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            current_width = 0;

            if word_width <= columns {
                current.push_str(word);
                current_width = word_width;
                row_has_word = true;
                continue;
            }

            for c in word.chars() {
                let w = c.width().unwrap_or(0);
                if current_width + w > columns && current_width > 0 {
                    out.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(c);
                current_width += w;
            }
            row_has_word = current_width > 0;
        }

        if row_has_word {
            out.push(current);
        }
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Body,
}

/// One run of text at a fixed spot on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement<'a> {
    pub page: usize,
    pub style: TextStyle,
    pub text: &'a str,
    /// Baseline distance from the top edge of the page
    pub top_mm: f32,
}

impl DocumentLayout {
    /// Everything to draw, page by page. Blank lines take up space but emit
    /// nothing.
    pub fn placements(&self) -> Vec<TextPlacement<'_>> {
        let mut out = Vec::with_capacity(self.line_count() + 1);

        for (page, page_lines) in self.pages.iter().enumerate() {
            let mut top = if page == 0 {
                out.push(TextPlacement {
                    page,
                    style: TextStyle::Title,
                    text: &self.title,
                    top_mm: TITLE_TOP_MM,
                });
                BODY_TOP_MM
            } else {
                TITLE_TOP_MM
            };

            for line in page_lines {
                if !line.is_empty() {
                    out.push(TextPlacement {
                        page,
                        style: TextStyle::Body,
                        text: line,
                        top_mm: top,
                    });
                }
                top += LINE_HEIGHT_MM;
            }
        }

        out
    }
}

/// Render a laid-out document to PDF bytes.
pub fn render_pdf(layout: &DocumentLayout) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        &layout.title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let title_font = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let body_font = doc.add_builtin_font(BuiltinFont::Courier)?;

    let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..layout.pages.len() {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        layers.push(doc.get_page(page).get_layer(layer));
    }

    for placement in layout.placements() {
        let (font, size) = match placement.style {
            TextStyle::Title => (&title_font, TITLE_FONT_SIZE),
            TextStyle::Body => (&body_font, BODY_FONT_SIZE),
        };
        layers[placement.page].use_text(
            placement.text,
            size,
            Mm(LEFT_MARGIN_MM),
            Mm(PAGE_HEIGHT_MM - placement.top_mm),
            font,
        );
    }

    Ok(doc.save_to_bytes()?)
}

/// Lay out `text`, render it, and write `screenplay.pdf` into `dir`.
pub fn export_screenplay(text: &str, dir: &Path) -> Result<PathBuf, ExportError> {
    let layout = DocumentLayout::new(text)?;
    let bytes = render_pdf(&layout)?;

    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        pages = layout.pages.len(),
        lines = layout.line_count(),
        "screenplay exported"
    );
    Ok(path)
}
