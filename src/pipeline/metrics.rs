//! Font metrics for the two standard fonts the report uses.
//!
//! Helvetica and Helvetica-Bold are among the 14 standard PDF fonts: every
//! viewer ships them, so nothing is embedded and only their advance widths
//! are needed to wrap text. Widths are the Adobe AFM values in 1/1000 em,
//! indexed by `WinAnsiEncoding` byte, which coincides with Latin-1 for the
//! printable ranges 0x20–0x7E and 0xA0–0xFF.

use serde::{Deserialize, Serialize};

/// Millimetres per PDF point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Typeface family. The report only ever draws Helvetica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    Helvetica,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// A concrete font selection: family, weight and size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    pub family: FontFamily,
    pub weight: FontWeight,
    pub size_pt: f32,
}

impl FontStyle {
    pub const fn helvetica(weight: FontWeight, size_pt: f32) -> Self {
        Self {
            family: FontFamily::Helvetica,
            weight,
            size_pt,
        }
    }

    /// PostScript name of the standard font.
    pub fn base_font(&self) -> &'static str {
        match (self.family, self.weight) {
            (FontFamily::Helvetica, FontWeight::Regular) => "Helvetica",
            (FontFamily::Helvetica, FontWeight::Bold) => "Helvetica-Bold",
        }
    }

    /// Font size expressed in millimetres.
    pub fn size_mm(&self) -> f32 {
        self.size_pt * MM_PER_PT
    }

    /// Advance width of one character in mm. Non-drawable characters are 0.
    pub fn char_width_mm(&self, c: char) -> f32 {
        f32::from(glyph_units(self.weight, c)) * self.size_mm() / 1000.0
    }

    /// Advance width of a string in mm.
    pub fn text_width_mm(&self, text: &str) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| u32::from(glyph_units(self.weight, c)))
            .sum();
        units as f32 * self.size_mm() / 1000.0
    }
}

/// Whether `c` has a glyph in the WinAnsi standard fonts as used here.
///
/// Control characters (C0, DEL, C1) and anything above U+00FF are not drawn.
pub fn is_drawable(c: char) -> bool {
    matches!(u32::from(c), 0x20..=0x7E | 0xA0..=0xFF)
}

/// Encode drawable characters to their single-byte WinAnsi codes, skipping
/// the rest.
pub fn to_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .filter(|c| is_drawable(*c))
        .map(|c| u32::from(c) as u8)
        .collect()
}

fn glyph_units(weight: FontWeight, c: char) -> u16 {
    let code = u32::from(c);
    let (ascii, latin1) = match weight {
        FontWeight::Regular => (&HELVETICA_ASCII, &HELVETICA_LATIN1),
        FontWeight::Bold => (&HELVETICA_BOLD_ASCII, &HELVETICA_BOLD_LATIN1),
    };
    match code {
        0x20..=0x7E => ascii[(code - 0x20) as usize],
        0xA0..=0xFF => latin1[(code - 0xA0) as usize],
        _ => 0,
    }
}

#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_LATIN1: [u16; 96] = [
    // A0-AF
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // B0-BF
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // C0-CF
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // D0-DF
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // E0-EF
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    // F0-FF
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    333, 333, 584, 584, 584, 611, 975,
    // A-Z
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    333, 278, 333, 584, 556, 333,
    // a-z
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    // { | } ~
    389, 280, 389, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_LATIN1: [u16; 96] = [
    // A0-AF
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // B0-BF
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // C0-CF
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // D0-DF
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // E0-EF
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    // F0-FF
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];
