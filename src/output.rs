//! Output types returned by a render.

use crate::error::ImageError;
use crate::pipeline::classify::LineKind;
use serde::{Deserialize, Serialize};

/// The result of a successful render.
///
/// `pdf` is skipped during serialisation so `--json` prints only the
/// summary, not megabytes of binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOutput {
    /// Complete PDF document, starting with `%PDF-`.
    #[serde(skip)]
    pub pdf: Vec<u8>,

    /// Number of pages in the document (always ≥ 1).
    pub page_count: usize,

    /// What happened to the requested image.
    pub image: ImageOutcome,

    pub stats: RenderStats,
}

impl RenderOutput {
    /// Whether the image made it into the document.
    pub fn image_placed(&self) -> bool {
        self.image.is_placed()
    }
}

/// Fate of the single embedded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageOutcome {
    /// Drawn on `page` (1-based) at the given position, in millimetres from
    /// the top-left page corner.
    Placed {
        page: usize,
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
        height_mm: f32,
        pixel_width: u32,
        pixel_height: u32,
    },
    /// Left out; the report was rendered without it.
    Skipped { error: ImageError },
}

impl ImageOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, ImageOutcome::Placed { .. })
    }
}

/// Counters collected while composing the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Heading lines of any level.
    pub headings: usize,
    pub bullets: usize,
    pub ordered_items: usize,
    pub paragraphs: usize,
    pub blank_lines: usize,
    /// Text rows emitted after wrapping, including title, metadata and
    /// footer rows.
    pub text_rows: usize,
    /// Wall-clock time of the whole render.
    pub duration_ms: u64,
}

impl RenderStats {
    /// Count one classified body line.
    pub fn record(&mut self, kind: LineKind) {
        let counter = if kind.is_heading() {
            &mut self.headings
        } else {
            match kind {
                LineKind::Bullet => &mut self.bullets,
                LineKind::OrderedItem => &mut self.ordered_items,
                LineKind::Paragraph => &mut self.paragraphs,
                _ => &mut self.blank_lines,
            }
        };
        *counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn json_omits_pdf_bytes() {
        let out = RenderOutput {
            pdf: b"%PDF-1.7".to_vec(),
            page_count: 1,
            image: ImageOutcome::Skipped {
                error: ImageError::NotFound {
                    path: PathBuf::from("scan.png"),
                },
            },
            stats: RenderStats::default(),
        };
        assert!(!out.image_placed());

        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("pdf").is_none());
        assert_eq!(json["page_count"], 1);
        assert_eq!(json["image"]["status"], "skipped");
    }

    #[test]
    fn record_counts_each_kind() {
        let mut stats = RenderStats::default();
        for kind in LineKind::ALL {
            stats.record(kind);
        }
        assert_eq!(stats.headings, 4);
        assert_eq!(stats.bullets, 1);
        assert_eq!(stats.ordered_items, 1);
        assert_eq!(stats.paragraphs, 1);
        assert_eq!(stats.blank_lines, 1);
        assert_eq!(stats.text_rows, 0);
    }

    #[test]
    fn placed_outcome() {
        let o = ImageOutcome::Placed {
            page: 1,
            x_mm: 15.0,
            y_mm: 40.0,
            width_mm: 180.0,
            height_mm: 135.0,
            pixel_width: 800,
            pixel_height: 600,
        };
        assert!(o.is_placed());
        let json = serde_json::to_value(&o).unwrap();
        assert_eq!(json["status"], "placed");
        assert_eq!(json["pixel_width"], 800);
    }
}
