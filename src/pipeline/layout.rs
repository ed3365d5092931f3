//! Page layout: a top-down cursor that places text rows and one image on
//! fixed-size pages, breaking to a new page whenever the next element would
//! cross the bottom margin.
//!
//! All state for one render lives in a [`Layout`] value owned by the caller,
//! so concurrent renders never share anything.
//!
//! Coordinates are millimetres measured from the **top-left** page corner;
//! the writer flips them into PDF user space.

use crate::error::Md2PdfError;
use crate::pipeline::metrics::{is_drawable, FontStyle};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fixed page geometry shared by every page of a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    /// Horizontal padding inside text cells.
    pub cell_padding_mm: f32,
}

impl PageGeometry {
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    pub fn content_height_mm(&self) -> f32 {
        self.page_height_mm - 2.0 * self.margin_mm
    }

    /// Y position below which nothing may extend.
    pub fn break_limit_mm(&self) -> f32 {
        self.page_height_mm - self.margin_mm
    }

    /// Width available to text inside a full-width cell.
    pub fn text_width_mm(&self) -> f32 {
        self.content_width_mm() - 2.0 * self.cell_padding_mm
    }
}

/// Horizontal alignment of a text row inside its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One drawn line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x_mm: f32,
    /// Baseline position from the top edge of the page.
    pub baseline_mm: f32,
    pub text: String,
    pub font: FontStyle,
    /// Fill gray level, 0 = black.
    pub gray: u8,
    pub width_mm: f32,
}

/// Where the embedded image landed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSlot {
    /// 0-based page index.
    pub page: usize,
    pub x_mm: f32,
    /// Top edge from the top of the page.
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextRun),
    Image(ImageSlot),
}

/// A page: elements in placement order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(t) => Some(t),
            Element::Image(_) => None,
        })
    }
}

/// Cursor state threaded through every placement call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub content_width_mm: f32,
    pub y_mm: f32,
    /// 0-based index of the page currently being filled.
    pub page_index: usize,
}

/// Text style for a [`Layout::multi_cell`] call.
#[derive(Debug, Clone, Copy)]
pub struct CellStyle {
    pub font: FontStyle,
    pub line_height_mm: f32,
    pub align: Align,
    pub gray: u8,
}

/// Page builder for a single render call.
#[derive(Debug)]
pub struct Layout {
    geometry: PageGeometry,
    cursor: Cursor,
    pages: Vec<Page>,
    rows: usize,
}

impl Layout {
    /// Start a layout with one empty page and the cursor at the top margin.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            cursor: Cursor {
                content_width_mm: geometry.content_width_mm(),
                y_mm: geometry.margin_mm,
                page_index: 0,
            },
            pages: vec![Page::default()],
            rows: 0,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Number of text rows emitted so far (including empty rows).
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Finish layout and hand over the pages.
    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }

    /// Move the cursor down without drawing. Never breaks a page by itself;
    /// the next placed element does if needed.
    pub fn ln(&mut self, h_mm: f32) {
        self.cursor.y_mm += h_mm;
    }

    /// Start a fresh page and reset the cursor to the top margin.
    pub fn add_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor.page_index = self.pages.len() - 1;
        self.cursor.y_mm = self.geometry.margin_mm;
        debug!("Page break → page {}", self.pages.len());
    }

    fn at_page_top(&self) -> bool {
        self.cursor.y_mm <= self.geometry.margin_mm + f32::EPSILON
    }

    fn current_page(&mut self) -> &mut Page {
        let idx = self.cursor.page_index;
        &mut self.pages[idx]
    }

    /// Break the page if an element `h_mm` tall does not fit below the cursor.
    fn ensure_room(&mut self, h_mm: f32, element: &str) -> Result<(), Md2PdfError> {
        let available = self.geometry.content_height_mm();
        if h_mm > available {
            return Err(Md2PdfError::LayoutOverflow {
                element: element.to_string(),
                height_mm: h_mm,
                available_mm: available,
            });
        }
        if self.cursor.y_mm + h_mm > self.geometry.break_limit_mm() && !self.at_page_top() {
            self.add_page();
        }
        Ok(())
    }

    /// Auto-wrapping, auto-breaking text block spanning the content width.
    ///
    /// `\n` forces a row break; otherwise rows wrap at the last space that
    /// fits, or mid-word when a single word is wider than the cell. Each row
    /// advances the cursor by `style.line_height_mm`. Returns the number of
    /// rows emitted.
    pub fn multi_cell(&mut self, text: &str, style: CellStyle) -> Result<usize, Md2PdfError> {
        let avail = self.geometry.text_width_mm();
        let rows: Vec<String> = text
            .split('\n')
            .flat_map(|segment| wrap_segment(segment, &style.font, avail))
            .collect();

        for row in &rows {
            self.ensure_room(style.line_height_mm, "text row")?;
            if !row.is_empty() {
                let width_mm = style.font.text_width_mm(row);
                let left = self.geometry.margin_mm;
                let x_mm = match style.align {
                    Align::Left => left + self.geometry.cell_padding_mm,
                    Align::Center => left + (self.cursor.content_width_mm - width_mm) / 2.0,
                };
                let baseline_mm =
                    self.cursor.y_mm + 0.5 * style.line_height_mm + 0.3 * style.font.size_mm();
                let run = TextRun {
                    x_mm,
                    baseline_mm,
                    text: row.clone(),
                    font: style.font,
                    gray: style.gray,
                    width_mm,
                };
                self.current_page().elements.push(Element::Text(run));
            }
            self.cursor.y_mm += style.line_height_mm;
            self.rows += 1;
        }
        Ok(rows.len())
    }

    /// Place a block image scaled to the content width.
    ///
    /// `aspect` is `pixel_height / pixel_width`. An image taller than the
    /// content area is shrunk to fit it and centered. When the image plus
    /// `reserve_mm` does not fit below the cursor, it moves whole to a new
    /// page. The cursor ends `gap_mm` below the image.
    pub fn place_image(
        &mut self,
        aspect: f32,
        reserve_mm: f32,
        gap_mm: f32,
    ) -> Result<ImageSlot, Md2PdfError> {
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(Md2PdfError::Internal(format!(
                "image aspect ratio must be positive, got {aspect}"
            )));
        }
        let content_w = self.cursor.content_width_mm;
        let max_h = self.geometry.content_height_mm();
        let (mut width_mm, mut height_mm) = (content_w, content_w * aspect);
        if height_mm > max_h {
            height_mm = max_h;
            width_mm = max_h / aspect;
        }

        if self.cursor.y_mm + height_mm + reserve_mm > self.geometry.break_limit_mm()
            && !self.at_page_top()
        {
            self.add_page();
        }

        let slot = ImageSlot {
            page: self.cursor.page_index,
            x_mm: self.geometry.margin_mm + (content_w - width_mm) / 2.0,
            y_mm: self.cursor.y_mm,
            width_mm,
            height_mm,
        };
        self.current_page().elements.push(Element::Image(slot));
        self.cursor.y_mm += height_mm + gap_mm;
        Ok(slot)
    }
}

/// Word-wrap one `\n`-free segment into rows no wider than `avail_mm`.
///
/// Undrawable characters are dropped first. An empty segment yields one
/// empty row, matching a bare line break.
fn wrap_segment(segment: &str, font: &FontStyle, avail_mm: f32) -> Vec<String> {
    let chars: Vec<char> = segment.chars().filter(|c| is_drawable(*c)).collect();
    let n = chars.len();
    let mut rows = Vec::new();
    let mut start = 0;
    let mut last_space: Option<usize> = None;
    let mut width = 0.0f32;
    let mut i = 0;

    while i < n {
        let c = chars[i];
        let cw = font.char_width_mm(c);
        let overflows = width + cw > avail_mm && i > start;

        if c == ' ' {
            if overflows {
                // The space itself is the break: drop it.
                rows.push(chars[start..i].iter().collect());
                i += 1;
                start = i;
                width = 0.0;
                last_space = None;
                continue;
            }
            last_space = Some(i);
        } else if overflows {
            match last_space {
                Some(sp) if sp > start => {
                    rows.push(chars[start..sp].iter().collect());
                    start = sp + 1;
                }
                _ => {
                    rows.push(chars[start..i].iter().collect());
                    start = i;
                }
            }
            last_space = None;
            width = chars[start..i].iter().map(|c| font.char_width_mm(*c)).sum();
            // Re-test the same character against the new row.
            continue;
        }

        width += cw;
        i += 1;
    }
    rows.push(chars[start..].iter().collect());
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::metrics::FontWeight;

    fn a4() -> PageGeometry {
        PageGeometry {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 15.0,
            cell_padding_mm: 1.0,
        }
    }

    fn body() -> CellStyle {
        CellStyle {
            font: FontStyle::helvetica(FontWeight::Regular, 10.0),
            line_height_mm: 5.5,
            align: Align::Left,
            gray: 0,
        }
    }

    #[test]
    fn short_text_is_one_row() {
        let mut l = Layout::new(a4());
        let rows = l.multi_cell("Clear lung fields", body()).unwrap();
        assert_eq!(rows, 1);
        assert!((l.cursor().y_mm - 20.5).abs() < 1e-4);
        let pages = l.into_pages();
        let run = pages[0].text_runs().next().unwrap();
        assert_eq!(run.text, "Clear lung fields");
        assert!((run.x_mm - 16.0).abs() < 1e-4);
    }

    #[test]
    fn newline_forces_rows_and_empty_rows_advance() {
        let mut l = Layout::new(a4());
        let rows = l.multi_cell("a\n\nb", body()).unwrap();
        assert_eq!(rows, 3);
        let pages = l.into_pages();
        assert_eq!(pages[0].text_runs().count(), 2);
    }

    #[test]
    fn wraps_at_spaces_within_width() {
        let font = FontStyle::helvetica(FontWeight::Regular, 10.0);
        let text = "word ".repeat(80);
        let rows = wrap_segment(text.trim_end(), &font, 100.0);
        assert!(rows.len() > 1);
        for row in &rows {
            assert!(font.text_width_mm(row) <= 100.0 + 1e-3, "{row:?}");
            assert!(!row.starts_with(' ') && !row.ends_with(' '), "{row:?}");
        }
        assert_eq!(rows.join(" "), text.trim_end());
    }

    #[test]
    fn unbreakable_word_falls_back_to_characters() {
        let font = FontStyle::helvetica(FontWeight::Bold, 16.0);
        let word = "W".repeat(60);
        let rows = wrap_segment(&word, &font, 178.0);
        assert!(rows.len() > 1);
        assert_eq!(rows.concat(), word);
        for row in &rows {
            assert!(font.text_width_mm(row) <= 178.0 + 1e-3);
        }
    }

    #[test]
    fn char_wider_than_cell_still_progresses() {
        let font = FontStyle::helvetica(FontWeight::Regular, 10.0);
        let rows = wrap_segment("MMM", &font, 0.5);
        assert_eq!(rows, vec!["M", "M", "M"]);
    }

    #[test]
    fn empty_segment_is_one_empty_row() {
        let font = FontStyle::helvetica(FontWeight::Regular, 10.0);
        assert_eq!(wrap_segment("", &font, 50.0), vec![String::new()]);
    }

    #[test]
    fn centered_row_is_centered() {
        let mut l = Layout::new(a4());
        let style = CellStyle {
            font: FontStyle::helvetica(FontWeight::Bold, 16.0),
            line_height_mm: 10.0,
            align: Align::Center,
            gray: 0,
        };
        l.multi_cell("Title", style).unwrap();
        let pages = l.into_pages();
        let run = pages[0].text_runs().next().unwrap();
        let left_gap = run.x_mm - 15.0;
        let right_gap = 195.0 - (run.x_mm + run.width_mm);
        assert!((left_gap - right_gap).abs() < 1e-3);
    }

    #[test]
    fn rows_break_onto_new_pages() {
        let mut l = Layout::new(a4());
        // 267mm of content / 5.5mm rows = 48 rows per page.
        let text = vec!["row"; 100].join("\n");
        l.multi_cell(&text, body()).unwrap();
        assert_eq!(l.page_count(), 3);
        let pages = l.into_pages();
        assert_eq!(pages[0].text_runs().count(), 48);
        assert_eq!(pages[1].text_runs().count(), 48);
        assert_eq!(pages[2].text_runs().count(), 4);
        for page in &pages {
            for run in page.text_runs() {
                assert!(run.baseline_mm < 282.0);
            }
        }
    }

    #[test]
    fn image_scaled_to_content_width() {
        let mut l = Layout::new(a4());
        let slot = l.place_image(600.0 / 800.0, 8.0, 4.0).unwrap();
        assert_eq!(slot.page, 0);
        assert!((slot.width_mm - 180.0).abs() < 1e-4);
        assert!((slot.height_mm - 135.0).abs() < 1e-4);
        assert!((l.cursor().y_mm - (15.0 + 135.0 + 4.0)).abs() < 1e-4);
    }

    #[test]
    fn image_moves_whole_to_next_page() {
        let mut l = Layout::new(a4());
        l.ln(200.0);
        let slot = l.place_image(0.75, 8.0, 4.0).unwrap();
        assert_eq!(slot.page, 1);
        assert!((slot.y_mm - 15.0).abs() < 1e-4);
        let pages = l.into_pages();
        assert!(pages[0].elements.is_empty());
        assert!(matches!(pages[1].elements[0], Element::Image(_)));
    }

    #[test]
    fn tall_image_is_shrunk_to_fit_one_page() {
        let mut l = Layout::new(a4());
        let slot = l.place_image(10.0, 8.0, 4.0).unwrap();
        assert_eq!(slot.page, 0);
        assert!((slot.height_mm - 267.0).abs() < 1e-3);
        assert!((slot.width_mm - 26.7).abs() < 1e-3);
        // Horizontally centered.
        assert!((slot.x_mm - (15.0 + (180.0 - 26.7) / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn row_taller_than_page_is_fatal() {
        let mut l = Layout::new(a4());
        let style = CellStyle {
            line_height_mm: 400.0,
            ..body()
        };
        let err = l.multi_cell("x", style).unwrap_err();
        assert!(matches!(err, Md2PdfError::LayoutOverflow { .. }));
    }

    #[test]
    fn bad_aspect_is_rejected() {
        let mut l = Layout::new(a4());
        assert!(l.place_image(0.0, 8.0, 4.0).is_err());
        assert!(l.place_image(f32::NAN, 8.0, 4.0).is_err());
    }
}
