//! The analysis prompt whose answers this crate renders.
//!
//! The model call itself happens elsewhere. The prompt lives here so the
//! headings it asks for and the line grammar in
//! [`crate::pipeline::classify`] stay in step, and so `md2pdf --print-prompt`
//! can hand it to whatever tool runs the model.

/// Instruction sent with the image to the imaging model.
///
/// Answers use `###` headings, `1)` numbered sections and `-` bullets, all of
/// which [`crate::pipeline::classify::classify`] understands.
pub const ANALYSIS_PROMPT: &str = "You are a medical imaging expert. Analyze the attached image and write a concise, structured markdown report with these sections:
### Primary finding: <finding> (<confidence>% confidence)
1) Image Type & Region (modality, region, positioning, quality)
2) Key Findings (bulleted; include confidence %)
3) Diagnostic Assessment (primary diagnosis with confidence; differentials with brief rationale)
4) Patient-Friendly Explanation (plain language)
5) References (2-3 items)
Be precise and avoid unsupported claims.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::classify::{classify, LineKind};

    #[test]
    fn prompt_examples_match_line_grammar() {
        let kinds: Vec<LineKind> = ANALYSIS_PROMPT.lines().map(|l| classify(l).kind).collect();
        assert_eq!(kinds[0], LineKind::Paragraph);
        assert_eq!(kinds[1], LineKind::Heading3);
        assert!(kinds[2..7].iter().all(|k| *k == LineKind::OrderedItem));
    }

    #[test]
    fn prompt_is_latin1() {
        assert!(ANALYSIS_PROMPT.chars().all(|c| u32::from(c) <= 0xFF));
    }
}
