//! Render entry points: metadata + markdown + image → PDF bytes.
//!
//! The report is always assembled in the same order:
//!
//! ```text
//! title ─▶ metadata rows ─▶ image ─▶ body lines ─▶ disclaimer ─▶ serialise
//! ```
//!
//! [`compose`] performs every step up to serialisation and returns the laid
//! out pages, which is what tests inspect. [`render`] adds the PDF bytes.
//! Nothing is written to disk here.

use crate::config::RenderConfig;
use crate::error::Md2PdfError;
use crate::metadata::ReportMetadata;
use crate::output::{ImageOutcome, RenderOutput, RenderStats};
use crate::pipeline::classify::classify;
use crate::pipeline::embed::{self, EmbeddedImage};
use crate::pipeline::layout::{Align, CellStyle, Layout, Page, PageGeometry};
use crate::pipeline::metrics::{FontStyle, FontWeight};
use crate::pipeline::sanitize::{sanitize, soft_wrap_tokens};
use crate::pipeline::writer;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

const TITLE_FONT: FontStyle = FontStyle::helvetica(FontWeight::Bold, 16.0);
const METADATA_FONT: FontStyle = FontStyle::helvetica(FontWeight::Regular, 11.0);
const FOOTER_FONT: FontStyle = FontStyle::helvetica(FontWeight::Regular, 9.0);
const FOOTER_GRAY: u8 = 120;

/// A fully laid out report, before serialisation.
#[derive(Debug, Clone)]
pub struct Composition {
    pub pages: Vec<Page>,
    pub geometry: PageGeometry,
    pub image: ImageOutcome,
    pub stats: RenderStats,
    /// Decoded image data, present exactly when `image` is `Placed`.
    pub embedded: Option<EmbeddedImage>,
}

impl Composition {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lay out the report without producing PDF bytes.
///
/// # Errors
/// - [`Md2PdfError::InvalidConfig`] when `config` fails validation
/// - [`Md2PdfError::LayoutOverflow`] when a row can never fit on a page
///
/// An unreadable image is not an error; see [`ImageOutcome::Skipped`].
pub fn compose(
    metadata: &ReportMetadata,
    markdown: &str,
    image_path: &Path,
    config: &RenderConfig,
) -> Result<Composition, Md2PdfError> {
    config.validate()?;

    let geometry = PageGeometry {
        page_width_mm: config.page_width_mm,
        page_height_mm: config.page_height_mm,
        margin_mm: config.margin_mm,
        cell_padding_mm: config.cell_padding_mm,
    };
    let mut layout = Layout::new(geometry);
    let mut stats = RenderStats::default();

    // ── Title and metadata ───────────────────────────────────────────────
    layout.multi_cell(
        &sanitize(&config.title),
        CellStyle {
            font: TITLE_FONT,
            line_height_mm: config.title_height_mm,
            align: Align::Center,
            gray: 0,
        },
    )?;

    let meta_style = CellStyle {
        font: METADATA_FONT,
        line_height_mm: config.line_height_mm,
        align: Align::Left,
        gray: 0,
    };
    layout.multi_cell(&metadata.patient_line(), meta_style)?;
    layout.multi_cell(&metadata.study_date_line(), meta_style)?;
    layout.ln(config.metadata_gap_mm);

    // ── Image ────────────────────────────────────────────────────────────
    let (image, embedded) = match embed::load_image(image_path, config.enhance_image) {
        Ok(img) => {
            let slot = layout.place_image(
                img.aspect(),
                config.image_reserve_mm,
                config.image_gap_mm,
            )?;
            debug!(
                "Image placed on page {} at y={:.1}mm ({:.1}x{:.1}mm)",
                slot.page + 1,
                slot.y_mm,
                slot.width_mm,
                slot.height_mm
            );
            let outcome = ImageOutcome::Placed {
                page: slot.page + 1,
                x_mm: slot.x_mm,
                y_mm: slot.y_mm,
                width_mm: slot.width_mm,
                height_mm: slot.height_mm,
                pixel_width: img.pixel_width,
                pixel_height: img.pixel_height,
            };
            (outcome, Some(img))
        }
        Err(error) => {
            warn!("Rendering report without image: {}", error);
            (ImageOutcome::Skipped { error }, None)
        }
    };

    // ── Body ─────────────────────────────────────────────────────────────
    for raw in split_lines(markdown) {
        let line = classify(raw);
        stats.record(line.kind);

        match line.font {
            None => layout.ln(config.blank_gap_mm),
            Some(font) => {
                let text = soft_wrap_tokens(&line.text, config.soft_wrap_len);
                layout.multi_cell(
                    &text,
                    CellStyle {
                        font,
                        line_height_mm: config.line_height_mm,
                        align: Align::Left,
                        gray: 0,
                    },
                )?;
            }
        }
    }
    debug!(
        "Body laid out: {} headings, {} bullets, {} ordered, {} paragraphs, {} blank",
        stats.headings, stats.bullets, stats.ordered_items, stats.paragraphs, stats.blank_lines
    );

    // ── Footer ───────────────────────────────────────────────────────────
    layout.ln(config.footer_gap_mm);
    layout.multi_cell(
        &soft_wrap_tokens(&sanitize(&config.disclaimer), config.soft_wrap_len),
        CellStyle {
            font: FOOTER_FONT,
            line_height_mm: config.footer_line_height_mm,
            align: Align::Left,
            gray: FOOTER_GRAY,
        },
    )?;

    stats.text_rows = layout.rows();
    Ok(Composition {
        pages: layout.into_pages(),
        geometry,
        image,
        stats,
        embedded,
    })
}

/// Split markdown into lines on `\n`, `\r\n` or a lone `\r`.
fn split_lines(markdown: &str) -> impl Iterator<Item = &str> {
    markdown
        .lines()
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// Render a report to PDF bytes.
///
/// This is the primary entry point for the library.
///
/// # Example
/// ```rust,no_run
/// use edgequake_md2pdf::{render, RenderConfig, ReportMetadata};
///
/// let meta = ReportMetadata::new("Jane Doe", "42", "F", "2024-03-01");
/// let md = "### Primary finding\nNo acute abnormality.";
/// let out = render(&meta, md, "scan.png", &RenderConfig::default()).unwrap();
/// assert!(out.pdf.starts_with(b"%PDF-"));
/// ```
///
/// # Errors
/// Same as [`compose`]. No bytes are produced unless layout succeeds.
pub fn render(
    metadata: &ReportMetadata,
    markdown: &str,
    image_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<RenderOutput, Md2PdfError> {
    let start = Instant::now();
    let image_path = image_path.as_ref();
    info!(
        "Rendering report: {} markdown bytes, image {}",
        markdown.len(),
        image_path.display()
    );

    let composition = compose(metadata, markdown, image_path, config)?;
    let pdf = writer::write_pdf(
        &composition.pages,
        &composition.geometry,
        composition.embedded.as_ref(),
        &config.title,
        config.compress,
    );

    let mut stats = composition.stats;
    stats.duration_ms = start.elapsed().as_millis() as u64;
    let page_count = composition.pages.len();

    info!(
        "Render complete: {} pages, {} bytes, image {}, {}ms",
        page_count,
        pdf.len(),
        if composition.image.is_placed() {
            "placed"
        } else {
            "skipped"
        },
        stats.duration_ms
    );

    Ok(RenderOutput {
        pdf,
        page_count,
        image: composition.image,
        stats,
    })
}

/// Async wrapper around [`render`].
///
/// Image decoding and layout are CPU-bound, so the work runs on tokio's
/// blocking pool instead of a runtime worker thread.
pub async fn render_async(
    metadata: ReportMetadata,
    markdown: String,
    image_path: PathBuf,
    config: RenderConfig,
) -> Result<RenderOutput, Md2PdfError> {
    tokio::task::spawn_blocking(move || render(&metadata, &markdown, &image_path, &config))
        .await
        .map_err(|e| Md2PdfError::Internal(format!("Render task panicked: {}", e)))?
}
