//! Line grammar: map one markdown line to exactly one [`LineKind`].
//!
//! The dialect is deliberately tiny. Four heading levels, `-`/`*` bullets,
//! `1.`/`1)` ordered items, paragraphs and blank lines. Inline markup
//! (`**bold**`, links, code spans) is not interpreted and passes through as
//! literal characters; indentation never nests lists.
//!
//! Rules are evaluated first-match-wins against the sanitised line with
//! trailing whitespace removed. Longer heading prefixes are tested before
//! shorter ones so `#### x` is never mistaken for `# ...`.

use crate::pipeline::metrics::{FontStyle, FontWeight};
use crate::pipeline::sanitize::sanitize;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*]\s+").unwrap());
static RE_ORDERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]\s+").unwrap());

/// Line classes of the report dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Bullet,
    OrderedItem,
    Paragraph,
    /// Whitespace-only line: vertical gap, no text run.
    Blank,
}

impl LineKind {
    /// Every variant, in table order.
    pub const ALL: [LineKind; 8] = [
        LineKind::Heading1,
        LineKind::Heading2,
        LineKind::Heading3,
        LineKind::Heading4,
        LineKind::Bullet,
        LineKind::OrderedItem,
        LineKind::Paragraph,
        LineKind::Blank,
    ];

    /// Typography for this kind; `None` for [`LineKind::Blank`].
    pub fn font(self) -> Option<FontStyle> {
        let (weight, size_pt) = match self {
            LineKind::Heading1 => (FontWeight::Bold, 16.0),
            LineKind::Heading2 => (FontWeight::Bold, 14.0),
            LineKind::Heading3 => (FontWeight::Bold, 12.0),
            LineKind::Heading4 => (FontWeight::Bold, 11.0),
            LineKind::Bullet | LineKind::OrderedItem | LineKind::Paragraph => {
                (FontWeight::Regular, 10.0)
            }
            LineKind::Blank => return None,
        };
        Some(FontStyle::helvetica(weight, size_pt))
    }

    pub fn is_heading(self) -> bool {
        matches!(
            self,
            LineKind::Heading1 | LineKind::Heading2 | LineKind::Heading3 | LineKind::Heading4
        )
    }
}

/// One classified input line, ready for layout.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLine {
    pub kind: LineKind,
    /// Sanitised text after the kind's transform. Empty for `Blank`.
    pub text: String,
    /// `None` exactly when `kind == Blank`.
    pub font: Option<FontStyle>,
}

impl RenderedLine {
    fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            font: kind.font(),
        }
    }
}

/// Classify a raw markdown line.
///
/// Sanitises first, so the grammar only ever sees Latin-1 text.
pub fn classify(raw: &str) -> RenderedLine {
    let sanitized = sanitize(raw);
    let s = sanitized.trim_end();

    if s.trim().is_empty() {
        return RenderedLine::new(LineKind::Blank, "");
    }

    const HEADINGS: [(&str, LineKind); 4] = [
        ("#### ", LineKind::Heading4),
        ("### ", LineKind::Heading3),
        ("## ", LineKind::Heading2),
        ("# ", LineKind::Heading1),
    ];
    for (prefix, kind) in HEADINGS {
        if let Some(rest) = s.strip_prefix(prefix) {
            return RenderedLine::new(kind, rest.trim());
        }
    }

    if let Some(m) = RE_BULLET.find(s) {
        return RenderedLine::new(LineKind::Bullet, format!("- {}", s[m.end()..].trim()));
    }

    if RE_ORDERED.is_match(s) {
        return RenderedLine::new(LineKind::OrderedItem, s);
    }

    RenderedLine::new(LineKind::Paragraph, s)
}
