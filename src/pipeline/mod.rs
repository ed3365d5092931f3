//! Pipeline stages for Markdown-to-PDF report rendering.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own without building a whole document.
//!
//! ## Data Flow
//!
//! ```text
//! markdown ──▶ sanitize ──▶ classify ──▶ layout ──▶ writer ──▶ PDF bytes
//!                                          ▲
//! image path ──▶ embed (──▶ enhance) ──────┘
//! ```
//!
//! 1. [`sanitize`]: fold text into the Latin-1 repertoire, pre-split
//!    runaway tokens
//! 2. [`classify`]: map each markdown line to a [`classify::LineKind`] and
//!    its typography
//! 3. [`metrics`]: Helvetica advance widths used to measure rows
//! 4. [`embed`]: read and decode the image; [`enhance`] optionally
//!    touches up its pixels first
//! 5. [`layout`]: cursor, word wrap and page breaks in millimetres
//! 6. [`writer`]: serialise the pages with `pdf-writer`

pub mod classify;
pub mod embed;
pub mod enhance;
pub mod layout;
pub mod metrics;
pub mod sanitize;
pub mod writer;
