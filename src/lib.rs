//! # edgequake-md2pdf
//!
//! Render a short markdown imaging report, with one embedded scan, into a
//! paginated A4 PDF.
//!
//! ## Why this crate?
//!
//! Imaging models answer in a small, predictable markdown dialect: a few
//! heading levels, bullet and numbered lists, plain paragraphs. This crate
//! turns such an answer into a printable document without a browser, a
//! LaTeX toolchain or any native library. It uses only the standard PDF
//! fonts, so output is small and opens everywhere.
//!
//! ## Pipeline Overview
//!
//! ```text
//! markdown + metadata + image path
//!  │
//!  ├─ 1. Sanitize  fold text into Latin-1, split runaway tokens
//!  ├─ 2. Classify  one LineKind per line (headings, lists, paragraphs)
//!  ├─ 3. Image     decode, optional enhancement, DCT/Flate encoding
//!  ├─ 4. Layout    word wrap and page breaks on A4 in millimetres
//!  └─ 5. Write     pdf-writer serialisation → Vec<u8>
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_md2pdf::{render, RenderConfig, ReportMetadata};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let meta = ReportMetadata::new("Jane Doe", "42", "F", "2024-03-01");
//!     let markdown = std::fs::read_to_string("report.md")?;
//!     let output = render(&meta, &markdown, "scan.png", &RenderConfig::default())?;
//!     std::fs::write("report.pdf", &output.pdf)?;
//!     eprintln!("{} pages, image placed: {}", output.page_count, output.image_placed());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2pdf` binary (clap + anyhow + tracing-subscriber + chrono) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! edgequake-md2pdf = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod render;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RenderConfig, RenderConfigBuilder};
pub use error::{ImageError, Md2PdfError};
pub use metadata::ReportMetadata;
pub use output::{ImageOutcome, RenderOutput, RenderStats};
pub use pipeline::classify::{classify, LineKind, RenderedLine};
pub use pipeline::sanitize::{sanitize, soft_wrap_tokens};
pub use render::{compose, render, render_async, Composition};
