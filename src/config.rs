//! Configuration types for Markdown-to-PDF report rendering.
//!
//! All layout behaviour is controlled through [`RenderConfig`], built via its
//! [`RenderConfigBuilder`]. The defaults reproduce the reference report
//! layout exactly: A4, 15 mm margins, Helvetica 10 pt body on 5.5 mm rows.
//!
//! Every length is in millimetres. The writer converts to PDF points only
//! when serialising.

use crate::error::Md2PdfError;
use serde::{Deserialize, Serialize};

/// ISO A4 width in millimetres.
pub const A4_WIDTH_MM: f32 = 210.0;
/// ISO A4 height in millimetres.
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Default report title, drawn centered on the first page.
pub const DEFAULT_TITLE: &str = "Medical Imaging Report";

/// Default small-print footer drawn after the body.
pub const DEFAULT_DISCLAIMER: &str =
    "AI-assisted report for educational purposes. Please have a qualified clinician review.";

/// Configuration for a report render.
///
/// Built via [`RenderConfig::builder()`] or using [`RenderConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_md2pdf::RenderConfig;
///
/// let config = RenderConfig::builder()
///     .margin_mm(20.0)
///     .enhance_image(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.content_width_mm(), 170.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Page width in mm. Default: 210 (A4).
    pub page_width_mm: f32,

    /// Page height in mm. Default: 297 (A4).
    pub page_height_mm: f32,

    /// Margin applied on all four sides, in mm. Default: 15.
    ///
    /// The bottom margin doubles as the auto page-break trigger: a row whose
    /// bottom edge would pass `page_height_mm - margin_mm` goes to a new page.
    pub margin_mm: f32,

    /// Row height for metadata and body text, in mm. Default: 5.5.
    pub line_height_mm: f32,

    /// Height of the centered title cell, in mm. Default: 10.
    pub title_height_mm: f32,

    /// Row height for the disclaimer footer, in mm. Default: 5.
    pub footer_line_height_mm: f32,

    /// Vertical gap emitted for a blank markdown line, in mm. Default: 2.
    pub blank_gap_mm: f32,

    /// Gap after the metadata block, in mm. Default: 2.
    pub metadata_gap_mm: f32,

    /// Gap below the embedded image, in mm. Default: 4.
    pub image_gap_mm: f32,

    /// Extra room required below the image for it to stay on the current
    /// page, in mm. Default: 8.
    pub image_reserve_mm: f32,

    /// Gap before the disclaimer footer, in mm. Default: 4.
    pub footer_gap_mm: f32,

    /// Horizontal padding inside each text cell, in mm. Default: 1.
    pub cell_padding_mm: f32,

    /// Maximum unbroken token length before soft wrapping. Default: 60.
    /// `0` disables soft wrapping.
    pub soft_wrap_len: usize,

    /// Title text. Default: [`DEFAULT_TITLE`].
    pub title: String,

    /// Footer text. Default: [`DEFAULT_DISCLAIMER`].
    pub disclaimer: String,

    /// Apply autocontrast, sharpening and a slight contrast boost to the
    /// image before embedding. Default: false.
    pub enhance_image: bool,

    /// Deflate content streams. Default: true.
    ///
    /// Turning this off yields larger files whose text operators can be
    /// inspected with a plain text editor.
    pub compress: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            margin_mm: 15.0,
            line_height_mm: 5.5,
            title_height_mm: 10.0,
            footer_line_height_mm: 5.0,
            blank_gap_mm: 2.0,
            metadata_gap_mm: 2.0,
            image_gap_mm: 4.0,
            image_reserve_mm: 8.0,
            footer_gap_mm: 4.0,
            cell_padding_mm: 1.0,
            soft_wrap_len: 60,
            title: DEFAULT_TITLE.to_string(),
            disclaimer: DEFAULT_DISCLAIMER.to_string(),
            enhance_image: false,
            compress: true,
        }
    }
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
        }
    }

    /// Usable width between the left and right margins.
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    /// Usable height between the top and bottom margins.
    pub fn content_height_mm(&self) -> f32 {
        self.page_height_mm - 2.0 * self.margin_mm
    }

    /// Check geometric constraints. Called by [`RenderConfigBuilder::build`]
    /// and again at the start of every render, since the fields are public.
    pub fn validate(&self) -> Result<(), Md2PdfError> {
        let finite = [
            self.page_width_mm,
            self.page_height_mm,
            self.margin_mm,
            self.line_height_mm,
            self.title_height_mm,
            self.footer_line_height_mm,
            self.blank_gap_mm,
            self.metadata_gap_mm,
            self.image_gap_mm,
            self.image_reserve_mm,
            self.footer_gap_mm,
            self.cell_padding_mm,
        ];
        if finite.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(Md2PdfError::InvalidConfig(
                "lengths must be finite and non-negative".into(),
            ));
        }
        if self.content_width_mm() <= 2.0 * self.cell_padding_mm {
            return Err(Md2PdfError::InvalidConfig(format!(
                "margin {}mm leaves no content width on a {}mm wide page",
                self.margin_mm, self.page_width_mm
            )));
        }
        let content_h = self.content_height_mm();
        if content_h <= 0.0 {
            return Err(Md2PdfError::InvalidConfig(format!(
                "margin {}mm leaves no content height on a {}mm tall page",
                self.margin_mm, self.page_height_mm
            )));
        }
        for (name, h) in [
            ("line_height_mm", self.line_height_mm),
            ("title_height_mm", self.title_height_mm),
            ("footer_line_height_mm", self.footer_line_height_mm),
        ] {
            if h <= 0.0 || h > content_h {
                return Err(Md2PdfError::InvalidConfig(format!(
                    "{name} must be in (0, {content_h}], got {h}"
                )));
            }
        }
        Ok(())
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn page_size_mm(mut self, width: f32, height: f32) -> Self {
        self.config.page_width_mm = width;
        self.config.page_height_mm = height;
        self
    }

    pub fn margin_mm(mut self, mm: f32) -> Self {
        self.config.margin_mm = mm.max(0.0);
        self
    }

    pub fn line_height_mm(mut self, mm: f32) -> Self {
        self.config.line_height_mm = mm;
        self
    }

    pub fn title_height_mm(mut self, mm: f32) -> Self {
        self.config.title_height_mm = mm;
        self
    }

    pub fn footer_line_height_mm(mut self, mm: f32) -> Self {
        self.config.footer_line_height_mm = mm;
        self
    }

    pub fn blank_gap_mm(mut self, mm: f32) -> Self {
        self.config.blank_gap_mm = mm.max(0.0);
        self
    }

    pub fn image_gap_mm(mut self, mm: f32) -> Self {
        self.config.image_gap_mm = mm.max(0.0);
        self
    }

    pub fn image_reserve_mm(mut self, mm: f32) -> Self {
        self.config.image_reserve_mm = mm.max(0.0);
        self
    }

    pub fn soft_wrap_len(mut self, n: usize) -> Self {
        self.config.soft_wrap_len = n;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn disclaimer(mut self, text: impl Into<String>) -> Self {
        self.config.disclaimer = text.into();
        self
    }

    pub fn enhance_image(mut self, v: bool) -> Self {
        self.config.enhance_image = v;
        self
    }

    pub fn compress(mut self, v: bool) -> Self {
        self.config.compress = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenderConfig, Md2PdfError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_a4_with_15mm_margins() {
        let c = RenderConfig::default();
        assert_eq!(c.content_width_mm(), 180.0);
        assert_eq!(c.content_height_mm(), 267.0);
        assert_eq!(c.soft_wrap_len, 60);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn margin_swallowing_page_is_rejected() {
        let err = RenderConfig::builder().margin_mm(105.0).build().unwrap_err();
        assert!(matches!(err, Md2PdfError::InvalidConfig(_)), "got {err:?}");
    }

    #[test]
    fn line_taller_than_page_is_rejected() {
        let err = RenderConfig::builder()
            .page_size_mm(100.0, 40.0)
            .margin_mm(10.0)
            .line_height_mm(25.0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("line_height_mm"), "got {err}");
    }

    #[test]
    fn nan_length_is_rejected() {
        let err = RenderConfig::builder()
            .line_height_mm(f32::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(err, Md2PdfError::InvalidConfig(_)));
    }

    #[test]
    fn config_round_trips_through_json() {
        let c = RenderConfig::builder()
            .title("Chest X-ray")
            .compress(false)
            .build()
            .unwrap();
        let json = serde_json::to_string(&c).unwrap();
        let back: RenderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
